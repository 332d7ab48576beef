use impactmap_core::Snapshot;
use impactmap_render::model::NodeKind;
use impactmap_render::outline::render_outline;
use impactmap_render::svg::{SvgRenderOptions, render_scene_svg};
use impactmap_render::{SceneOptions, layout_snapshot};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn load(name: &str) -> Snapshot {
    let path = workspace_root().join("fixtures").join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    Snapshot::from_json_str(&text).expect("valid fixture")
}

#[test]
fn every_fixture_lays_out_and_renders() {
    let dir = workspace_root().join("fixtures");
    let mut seen = 0;
    for entry in std::fs::read_dir(&dir).expect("fixtures dir") {
        let path = entry.expect("entry").path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let text = std::fs::read_to_string(&path).expect("fixture");
        let snapshot = Snapshot::from_json_str(&text)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        let scene = layout_snapshot(&snapshot, &SceneOptions::default());
        assert_eq!(scene.outcome_count, snapshot.outcomes.len());
        let svg = render_scene_svg(&scene, &SvgRenderOptions::default());
        assert!(svg.starts_with("<svg"), "{}", path.display());
        seen += 1;
    }
    assert!(seen >= 3);
}

#[test]
fn basic_fixture_has_no_shared_outputs() {
    let snapshot = load("basic.json");
    let scene = layout_snapshot(&snapshot, &SceneOptions::default());
    assert_eq!(scene.shared_output_count, 0);
    assert_eq!(scene.nodes_of_kind(NodeKind::Output).count(), 3);
    assert_eq!(scene.connectors.len(), 2 + 3);
    assert!(!render_outline(&snapshot).contains("[shared]"));
}

#[test]
fn shared_fixture_detects_whitespace_and_case_variants() {
    let snapshot = load("shared.json");
    let scene = layout_snapshot(&snapshot, &SceneOptions::default());
    assert_eq!(scene.shared_output_count, 1);
    assert_eq!(scene.unique_output_count, 2);
    assert_eq!(render_outline(&snapshot).matches("[shared]").count(), 2);
}

#[test]
fn empty_fixture_defaults_the_impact_id() {
    let snapshot = load("empty.json");
    assert_eq!(snapshot.impact.id, "impact");
    let scene = layout_snapshot(&snapshot, &SceneOptions::default());
    assert_eq!(scene.nodes.len(), 1);
    assert!(scene.connectors.is_empty());
}
