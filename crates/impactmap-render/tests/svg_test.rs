use impactmap_core::Snapshot;
use impactmap_render::svg::{SvgRenderOptions, render_scene_svg};
use impactmap_render::{SceneOptions, layout_snapshot};
use serde_json::json;

fn snapshot() -> Snapshot {
    Snapshot::from_value(&json!({
        "impact": {"id": "impact", "statement": "Children <thrive> & learn"},
        "outcomes": [
            {
                "id": "A",
                "statement": "Educators use active learning methods in every classroom they lead",
                "indicators": [{"id": "i1", "description": "Observed lessons"}],
                "outputs": [
                    {"id": "a1", "statement": "Lesson guides printed"},
                    {"id": "a2", "statement": "Coaching visits"}
                ]
            },
            {
                "id": "B",
                "statement": "Parents read at home",
                "outputs": [{"id": "b1", "statement": "lesson guides printed"}]
            }
        ]
    }))
    .expect("valid snapshot")
}

fn render(options: &SvgRenderOptions) -> String {
    let scene = layout_snapshot(&snapshot(), &SceneOptions::default());
    render_scene_svg(&scene, options)
}

#[test]
fn svg_root_is_an_accessible_image() {
    let svg = render(&SvgRenderOptions::default());
    assert!(svg.starts_with(r#"<svg id="impactmap""#));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r#"role="img""#));
    assert!(svg.contains(r#"aria-labelledby="impactmap-title impactmap-desc""#));
    assert!(svg.contains(r#"<title id="impactmap-title">Theory of Change</title>"#));
    assert!(svg.contains(r#"<desc id="impactmap-desc">Impact: Children &lt;thrive&gt; &amp; learn."#));
    assert!(svg.contains(r#"viewBox="0 0 1200 580""#));
}

#[test]
fn svg_draws_connectors_beneath_nodes() {
    let svg = render(&SvgRenderOptions::default());
    let connectors = svg.find(r#"<g class="connectors""#).expect("connectors group");
    let nodes = svg.find(r#"<g class="nodes">"#).expect("nodes group");
    assert!(connectors < nodes);
    let last_path = svg.rfind("<path ").expect("paths");
    assert!(last_path < nodes);
}

#[test]
fn svg_connectors_carry_shared_styling() {
    let svg = render(&SvgRenderOptions::default());
    assert_eq!(svg.matches("<path ").count(), 2 + 3);
    assert_eq!(svg.matches(r#"data-shared="true""#).count(), 2);
    assert_eq!(svg.matches(r#"stroke-dasharray="6 4""#).count(), 2);
    assert_eq!(svg.matches(r#"stroke-width="3""#).count(), 2);
    assert_eq!(svg.matches(r#"stroke-width="1.5""#).count(), 3);
}

#[test]
fn svg_nodes_are_labelled_groups_with_full_text_titles() {
    let svg = render(&SvgRenderOptions::default());
    assert_eq!(svg.matches(r#"role="group""#).count(), 1 + 2 + 2);
    assert!(svg.contains(
        r#"aria-label="Outcome: Educators use active learning methods in every classroom they lead, 1 indicator""#
    ));
    assert!(svg.contains(
        "<title>Educators use active learning methods in every classroom they lead</title>"
    ));
    assert!(svg.contains(r#"aria-label="Output (shared across 2 outcomes): Lesson guides printed""#));
    assert!(svg.contains(r#"<g class="indicator-badge" role="img" aria-label="1 indicator">"#));
    assert!(svg.contains("<tspan "));
    assert!(svg.contains('…'));
}

#[test]
fn svg_options_set_id_and_background() {
    let svg = render(&SvgRenderOptions {
        diagram_id: Some("toc-1".to_string()),
        background: Some("white".to_string()),
        ..Default::default()
    });
    assert!(svg.starts_with(r#"<svg id="toc-1""#));
    assert!(svg.contains("background-color: white;"));
    assert!(svg.contains(r#"<title id="toc-1-title">"#));
    assert!(svg.contains("#toc-1 .node rect"));
}
