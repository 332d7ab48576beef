#![forbid(unsafe_code)]

//! `impactmap` is a headless Theory of Change diagram toolkit in Rust.
//!
//! The core crate holds the Impact → Outcomes → Outputs → Indicators model together with
//! import validation, an editable [`Document`] and Markdown/JSON export. The render side turns
//! a snapshot into a target-agnostic scene in which outputs repeated under several outcomes
//! are drawn once, then into SVG or a plain-text outline.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`impactmap::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use impactmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use impactmap_render::connector::{ConnectorStyles, Curve, StrokeStyle};
    pub use impactmap_render::layout::LayoutConfig;
    pub use impactmap_render::model::{NodeKind, Scene, SceneConnector, SceneItem, SceneNode};
    pub use impactmap_render::outline::render_outline;
    pub use impactmap_render::svg::{SvgRenderOptions, render_scene_svg};
    pub use impactmap_render::text::{FitOptions, FittedText};
    pub use impactmap_render::{SceneOptions, layout_snapshot, layout_snapshot_value};

    #[cfg(feature = "raster")]
    pub mod raster;

    use impactmap_core::{ImpactMapConfig, Snapshot};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Snapshot(#[from] impactmap_core::Error),
        #[error(transparent)]
        Render(#[from] impactmap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token.
    ///
    /// The root id prefixes the `<title>`/`<desc>` ids and scopes the embedded stylesheet, so
    /// two diagrams inlined in one page need distinct, well-formed ids. Unsupported characters
    /// become `-`, and ids that do not start with an ASCII letter get a `toc-` prefix.
    pub fn sanitize_svg_id(raw: &str) -> String {
        const UNTITLED: &str = "toc-untitled";

        let raw = raw.trim();
        if raw.is_empty() {
            return UNTITLED.to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.');
            out.push(if ok { ch } else { '-' });
        }
        if !out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.insert_str(0, "toc-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }

        let out = out.trim_matches('-');
        if out.is_empty() || out == "toc" {
            return UNTITLED.to_string();
        }
        out.to_string()
    }

    /// Parses and validates a snapshot document, then lays it out.
    pub fn layout_snapshot_json(text: &str, options: &SceneOptions) -> Result<Scene> {
        let snapshot = Snapshot::from_json_str(text)?;
        Ok(layout_snapshot(&snapshot, options))
    }

    pub fn render_svg(
        snapshot: &Snapshot,
        options: &SceneOptions,
        svg_options: &SvgRenderOptions,
    ) -> String {
        render_scene_svg(&layout_snapshot(snapshot, options), svg_options)
    }

    /// Bundles layout and SVG options so integrations make one call per diagram.
    ///
    /// All work is CPU-bound and does no I/O.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub options: SceneOptions,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builds typed options from a config; invalid geometry or stroke values are rejected.
        pub fn with_config(mut self, config: &ImpactMapConfig) -> Result<Self> {
            self.options = SceneOptions::from_config(config)?;
            Ok(self)
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn with_background(mut self, background: impl Into<String>) -> Self {
            self.svg.background = Some(background.into());
            self
        }

        pub fn scene(&self, snapshot: &Snapshot) -> Scene {
            layout_snapshot(snapshot, &self.options)
        }

        pub fn scene_from_json(&self, text: &str) -> Result<Scene> {
            layout_snapshot_json(text, &self.options)
        }

        pub fn render_svg(&self, snapshot: &Snapshot) -> String {
            render_svg(snapshot, &self.options, &self.svg)
        }

        pub fn render_svg_from_json(&self, text: &str) -> Result<String> {
            let scene = self.scene_from_json(text)?;
            Ok(render_scene_svg(&scene, &self.svg))
        }

        pub fn render_svg_with_diagram_id(&self, snapshot: &Snapshot, diagram_id: &str) -> String {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            render_svg(snapshot, &self.options, &svg)
        }

        pub fn render_outline(&self, snapshot: &Snapshot) -> String {
            render_outline(snapshot)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            snapshot: &Snapshot,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::svg_to_png(&self.render_svg(snapshot), raster)
        }
    }
}
