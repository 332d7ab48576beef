use crate::model::Point;
use crate::{Error, Result};
use impactmap_core::ImpactMapConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub width: f64,
    pub opacity: f64,
    /// SVG dash pattern; `None` draws a solid stroke.
    pub dash_array: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStyles {
    pub shared: StrokeStyle,
    pub default: StrokeStyle,
}

impl Default for ConnectorStyles {
    fn default() -> Self {
        Self {
            shared: StrokeStyle {
                width: 3.0,
                opacity: 0.85,
                dash_array: Some("6 4".to_string()),
            },
            default: StrokeStyle {
                width: 1.5,
                opacity: 0.5,
                dash_array: None,
            },
        }
    }
}

fn stroke_from_config(
    cfg: &ImpactMapConfig,
    prefix: &str,
    fallback: &StrokeStyle,
) -> Result<StrokeStyle> {
    let width = cfg
        .get_f64(&format!("{prefix}.strokeWidth"))
        .unwrap_or(fallback.width);
    let opacity = cfg
        .get_f64(&format!("{prefix}.opacity"))
        .unwrap_or(fallback.opacity);
    if !(width.is_finite() && width > 0.0) {
        return Err(Error::InvalidConfig {
            message: format!("`{prefix}.strokeWidth` must be a positive number"),
        });
    }
    if !(0.0..=1.0).contains(&opacity) {
        return Err(Error::InvalidConfig {
            message: format!("`{prefix}.opacity` must be within 0..=1"),
        });
    }
    let dash_array = match cfg.get_str(&format!("{prefix}.dashArray")) {
        Some(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(_) => None,
        None => fallback.dash_array.clone(),
    };
    Ok(StrokeStyle {
        width,
        opacity,
        dash_array,
    })
}

impl ConnectorStyles {
    pub fn from_config(cfg: &ImpactMapConfig) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            shared: stroke_from_config(cfg, "connector.shared", &d.shared)?,
            default: stroke_from_config(cfg, "connector.default", &d.default)?,
        })
    }

    pub fn for_shared(&self, is_shared: bool) -> &StrokeStyle {
        if is_shared { &self.shared } else { &self.default }
    }
}

/// Cubic Bézier between two anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    /// Queryable independently of [`Curve::stroke`].
    pub is_shared: bool,
    pub stroke: StrokeStyle,
}

impl Curve {
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }
}

/// Vertical S-curve: both control points sit on the mid-height between the anchors, each
/// directly above/below its own anchor.
pub fn route(from: Point, to: Point, is_shared: bool, styles: &ConnectorStyles) -> Curve {
    let mid = (from.y + to.y) / 2.0;
    Curve {
        start: from,
        control1: Point::new(from.x, mid),
        control2: Point::new(to.x, mid),
        end: to,
        is_shared,
        stroke: styles.for_shared(is_shared).clone(),
    }
}
