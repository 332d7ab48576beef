use crate::connector::Curve;
use crate::text::FittedText;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centered(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            x: center_x - width / 2.0,
            y: center_y - height / 2.0,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.bottom())
    }

    /// Strict horizontal overlap; boxes that only touch at an edge do not overlap.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Impact,
    Outcome,
    Output,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Impact => "impact",
            Self::Outcome => "outcome",
            Self::Output => "output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBadge {
    pub count: usize,
    /// Accessible label, e.g. `3 indicators`.
    pub label: String,
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    /// Id of the source item. For outputs this is the first-seen copy's id, which is only
    /// unique per outcome; use the node's index in [`Scene::nodes`] as its identity.
    pub id: String,
    pub kind: NodeKind,
    pub bounds: Rect,
    /// Human-readable kind label: `Impact`, `Outcome`, `Output`, or
    /// `Output (shared across N outcomes)`.
    pub label: String,
    pub text: FittedText,
    pub indicator_count: usize,
    pub badge: Option<IndicatorBadge>,
    pub is_shared: bool,
    /// Contributing outcome ids (outputs only), in first-seen order.
    pub source_outcome_ids: Vec<String>,
    pub aria_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConnector {
    /// Index into [`Scene::nodes`].
    pub from_node: usize,
    /// Index into [`Scene::nodes`].
    pub to_node: usize,
    pub is_shared: bool,
    pub curve: Curve,
}

impl SceneConnector {
    pub fn from_anchor(&self) -> Point {
        self.curve.start
    }

    pub fn to_anchor(&self) -> Point {
        self.curve.end
    }
}

/// Render-target-agnostic output of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub description: String,
    pub outcome_count: usize,
    pub unique_output_count: usize,
    pub shared_output_count: usize,
    pub connectors: Vec<SceneConnector>,
    pub nodes: Vec<SceneNode>,
}

#[derive(Debug, Clone, Copy)]
pub enum SceneItem<'a> {
    Connector(&'a SceneConnector),
    Node(&'a SceneNode),
}

impl Scene {
    /// Paint order: every connector before any node, so strokes sit beneath the boxes.
    pub fn draw_order(&self) -> impl Iterator<Item = SceneItem<'_>> + '_ {
        self.connectors
            .iter()
            .map(SceneItem::Connector)
            .chain(self.nodes.iter().map(SceneItem::Node))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = (usize, &SceneNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.kind == kind)
    }

    pub fn incoming(&self, node_index: usize) -> impl Iterator<Item = &SceneConnector> + '_ {
        self.connectors
            .iter()
            .filter(move |c| c.to_node == node_index)
    }

    pub fn impact(&self) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Impact)
    }
}
