//! SVG adapter for a [`Scene`].
//!
//! Produces an accessible image: the root carries `role="img"` and points at a `<title>` and
//! `<desc>`; every node is a labelled group whose `<title>` holds the untruncated statement.
//! Connectors are emitted before nodes so strokes sit beneath the boxes.

use crate::connector::Curve;
use crate::model::{NodeKind, Scene, SceneConnector, SceneNode};
use std::fmt::Write as _;

const DEFAULT_DIAGRAM_ID: &str = "impactmap";
const NODE_CORNER_RADIUS: f64 = 8.0;
const KIND_LABEL_OFFSET: f64 = 18.0;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `id`, also used as a prefix for the title/description ids.
    pub diagram_id: Option<String>,
    /// CSS background color; transparent when `None`.
    pub background: Option<String>,
    pub font_size: f64,
    pub line_height_factor: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            background: None,
            font_size: 13.0,
            line_height_factor: 1.25,
        }
    }
}

fn css(diagram_id: &str, font_size: f64) -> String {
    let id = escape_xml(diagram_id);
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"#{id}{{font-family:"trebuchet ms",verdana,arial,sans-serif;font-size:{fs}px;}}#{id} .node rect{{fill:#ECECFF;stroke:#9370DB;stroke-width:1px;}}#{id} .node.impact rect{{fill:#fff5ad;stroke:#aaaa33;stroke-width:2px;}}#{id} .node.shared rect{{stroke:#6a3d9a;stroke-width:2px;}}#{id} .node-kind{{font-size:{kfs}px;fill:#555;text-anchor:middle;}}#{id} .node-label{{fill:#333;text-anchor:middle;}}#{id} .connector{{fill:none;stroke:#333;}}#{id} .connector.shared{{stroke:#6a3d9a;}}#{id} .indicator-badge circle{{fill:#2563eb;stroke:#fff;stroke-width:1px;}}#{id} .indicator-badge text{{fill:#fff;font-size:{kfs}px;text-anchor:middle;dominant-baseline:central;}}"#,
        id = id,
        fs = fmt(font_size),
        kfs = fmt((font_size - 2.0).max(1.0)),
    );
    out
}

pub fn render_scene_svg(scene: &Scene, options: &SvgRenderOptions) -> String {
    let diagram_id = options.diagram_id.as_deref().unwrap_or(DEFAULT_DIAGRAM_ID);
    let id = escape_attr(diagram_id);
    let w = scene.width.max(1.0);
    let h = scene.height.max(1.0);

    let mut style = format!("max-width: {}px;", fmt(w));
    if let Some(bg) = options
        .background
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let _ = write!(&mut style, " background-color: {};", escape_attr(bg));
    }

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" style="{style}" role="img" aria-roledescription="theory of change" aria-labelledby="{id}-title {id}-desc">"#,
        id = id,
        w = fmt(w),
        h = fmt(h),
        style = style,
    );
    let _ = write!(
        &mut out,
        r#"<title id="{id}-title">{title}</title><desc id="{id}-desc">{desc}</desc>"#,
        id = id,
        title = escape_xml(&scene.title),
        desc = escape_xml(&scene.description),
    );
    let _ = write!(&mut out, "<style>{}</style>", css(diagram_id, options.font_size));

    out.push_str(r#"<g class="connectors" aria-hidden="true">"#);
    for connector in &scene.connectors {
        render_connector(&mut out, scene, connector);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for node in &scene.nodes {
        render_node(&mut out, node, options);
    }
    out.push_str("</g>");

    out.push_str("</svg>");
    out
}

pub fn curve_path_d(curve: &Curve) -> String {
    format!(
        "M{},{} C{},{} {},{} {},{}",
        fmt_path(curve.start.x),
        fmt_path(curve.start.y),
        fmt_path(curve.control1.x),
        fmt_path(curve.control1.y),
        fmt_path(curve.control2.x),
        fmt_path(curve.control2.y),
        fmt_path(curve.end.x),
        fmt_path(curve.end.y),
    )
}

fn render_connector(out: &mut String, scene: &Scene, connector: &SceneConnector) {
    let stroke = &connector.curve.stroke;
    let from_id = scene
        .nodes
        .get(connector.from_node)
        .map(|n| n.id.as_str())
        .unwrap_or_default();
    let to_id = scene
        .nodes
        .get(connector.to_node)
        .map(|n| n.id.as_str())
        .unwrap_or_default();

    let _ = write!(
        out,
        r#"<path class="connector{shared_class}" d="{d}" stroke-width="{sw}" stroke-opacity="{op}""#,
        shared_class = if connector.is_shared { " shared" } else { "" },
        d = curve_path_d(&connector.curve),
        sw = fmt(stroke.width),
        op = fmt(stroke.opacity),
    );
    if let Some(dash) = stroke.dash_array.as_deref() {
        let _ = write!(out, r#" stroke-dasharray="{}""#, escape_attr(dash));
    }
    let _ = write!(
        out,
        r#" data-shared="{shared}" data-from="{from}" data-to="{to}"/>"#,
        shared = connector.is_shared,
        from = escape_attr(from_id),
        to = escape_attr(to_id),
    );
}

fn render_node(out: &mut String, node: &SceneNode, options: &SvgRenderOptions) {
    let b = &node.bounds;
    let center = b.center();
    let mut class = format!("node {}", node.kind.as_str());
    if node.is_shared {
        class.push_str(" shared");
    }

    let _ = write!(
        out,
        r#"<g class="{class}" id="{id}" role="group" aria-label="{aria}" data-indicators="{count}">"#,
        class = class,
        id = escape_attr(&format!("{}-{}", node.kind.as_str(), node.id)),
        aria = escape_attr(&node.aria_label),
        count = node.indicator_count,
    );
    let _ = write!(out, "<title>{}</title>", escape_xml(&node.text.full_text));
    let _ = write!(
        out,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}"/>"#,
        x = fmt(b.x),
        y = fmt(b.y),
        w = fmt(b.width),
        h = fmt(b.height),
        r = fmt(NODE_CORNER_RADIUS),
    );
    let _ = write!(
        out,
        r#"<text class="node-kind" x="{x}" y="{y}" aria-hidden="true">{label}</text>"#,
        x = fmt(center.x),
        y = fmt(b.y + KIND_LABEL_OFFSET),
        label = escape_xml(&node.label),
    );

    let lines = &node.text.display_lines;
    if !lines.is_empty() {
        let line_height = options.font_size * options.line_height_factor;
        // Centered in the space below the kind label.
        let body_center = (b.y + KIND_LABEL_OFFSET + b.bottom()) / 2.0 + options.font_size / 3.0;
        let first_y = body_center - (lines.len() as f64 - 1.0) * line_height / 2.0;
        let _ = write!(
            out,
            r#"<text class="node-label" x="{x}" y="{y}" aria-hidden="true">"#,
            x = fmt(center.x),
            y = fmt(first_y),
        );
        for (i, line) in lines.iter().enumerate() {
            let dy = if i == 0 { 0.0 } else { line_height };
            let _ = write!(
                out,
                r#"<tspan x="{x}" dy="{dy}">{text}</tspan>"#,
                x = fmt(center.x),
                dy = fmt(dy),
                text = escape_xml(line),
            );
        }
        out.push_str("</text>");
    }

    if let Some(badge) = &node.badge {
        let _ = write!(
            out,
            r#"<g class="indicator-badge" role="img" aria-label="{label}"><title>{title}</title><circle cx="{cx}" cy="{cy}" r="{r}"/><text x="{cx}" y="{cy}" aria-hidden="true">{count}</text></g>"#,
            label = escape_attr(&badge.label),
            title = escape_xml(&badge.label),
            cx = fmt(badge.center.x),
            cy = fmt(badge.center.y),
            r = fmt(badge.radius),
            count = badge.count,
        );
    }

    if node.kind == NodeKind::Output && node.is_shared {
        let _ = write!(
            out,
            r#"<desc>{}</desc>"#,
            escape_xml(&format!(
                "Contributing outcomes: {}",
                node.source_outcome_ids.join(", ")
            ))
        );
    }

    out.push_str("</g>");
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form without `-0` or tiny float noise.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn fmt_path(v: f64) -> String {
    // Path commands use at most 3 fractional digits.
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }

    let r = (v * 1000.0 + 0.5).floor() / 1000.0;
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_trims_float_noise() {
        assert_eq!(fmt(600.0), "600");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt(1.5), "1.5");
    }

    #[test]
    fn fmt_path_uses_three_decimals() {
        assert_eq!(fmt_path(230.476190476), "230.476");
        assert_eq!(fmt_path(200.0), "200");
        assert_eq!(fmt_path(0.0001), "0");
    }

    #[test]
    fn escape_xml_escapes_markup() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
