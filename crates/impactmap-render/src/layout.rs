//! Three fixed ranks (Impact, Outcomes, Outputs), one row each, items on evenly spaced slots.
//!
//! Slots are spread across the full canvas width rather than packed, so spacing grows with the
//! canvas. An empty rank emits no boxes; only the canvas sizing treats it as one item.

use crate::model::Rect;
use crate::{Error, Result};
use impactmap_core::ImpactMapConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Target canvas width `W`; widened when the densest rank needs more room.
    pub canvas_width: f64,
    /// Vertical pitch `H` of one rank.
    pub rank_pitch: f64,
    pub box_width: f64,
    pub box_height: f64,
    /// Outer padding `P`.
    pub padding: f64,
    pub gap: f64,
    pub impact_width_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            rank_pitch: 180.0,
            box_width: 200.0,
            box_height: 80.0,
            padding: 20.0,
            gap: 40.0,
            impact_width_factor: 1.5,
        }
    }
}

fn cfg_positive(cfg: &ImpactMapConfig, path: &str, default: f64) -> Result<f64> {
    let v = cfg.get_f64(path).unwrap_or(default);
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(Error::InvalidConfig {
            message: format!("`{path}` must be a positive number (got {v})"),
        })
    }
}

fn cfg_non_negative(cfg: &ImpactMapConfig, path: &str, default: f64) -> Result<f64> {
    let v = cfg.get_f64(path).unwrap_or(default);
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(Error::InvalidConfig {
            message: format!("`{path}` must be a non-negative number (got {v})"),
        })
    }
}

impl LayoutConfig {
    pub fn from_config(cfg: &ImpactMapConfig) -> Result<Self> {
        let d = Self::default();
        let out = Self {
            canvas_width: cfg_positive(cfg, "layout.canvasWidth", d.canvas_width)?,
            rank_pitch: cfg_positive(cfg, "layout.rankPitch", d.rank_pitch)?,
            box_width: cfg_positive(cfg, "layout.boxWidth", d.box_width)?,
            box_height: cfg_positive(cfg, "layout.boxHeight", d.box_height)?,
            padding: cfg_non_negative(cfg, "layout.padding", d.padding)?,
            gap: cfg_non_negative(cfg, "layout.gap", d.gap)?,
            impact_width_factor: cfg_positive(
                cfg,
                "layout.impactWidthFactor",
                d.impact_width_factor,
            )?,
        };
        if out.box_height > out.rank_pitch {
            return Err(Error::InvalidConfig {
                message: format!(
                    "`layout.boxHeight` ({}) must not exceed `layout.rankPitch` ({})",
                    out.box_height, out.rank_pitch
                ),
            });
        }
        Ok(out)
    }

    pub fn impact_width(&self) -> f64 {
        self.box_width * self.impact_width_factor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rank {
    Impact,
    Outcomes,
    Outputs,
}

impl Rank {
    pub const ALL: [Rank; 3] = [Rank::Impact, Rank::Outcomes, Rank::Outputs];

    pub fn index(self) -> usize {
        match self {
            Self::Impact => 0,
            Self::Outcomes => 1,
            Self::Outputs => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerLayout {
    pub width: f64,
    pub height: f64,
    pub impact: Rect,
    pub outcomes: Vec<Rect>,
    pub outputs: Vec<Rect>,
}

/// Canvas width for `n` outcomes and `m` unique outputs.
///
/// `max(W, maxRow * (boxW + gap) + 2P)` with `maxRow = max(n, m, 1)`, plus a floor of
/// `(maxRow + 1) * boxW` so that a slot is never narrower than a box when `W` is configured
/// small. The floor never binds at the default `W`.
pub fn canvas_width(cfg: &LayoutConfig, outcome_count: usize, output_count: usize) -> f64 {
    let max_row = outcome_count.max(output_count).max(1) as f64;
    let packed = max_row * (cfg.box_width + cfg.gap) + 2.0 * cfg.padding;
    let slot_floor = (max_row + 1.0) * cfg.box_width;
    cfg.canvas_width
        .max(packed)
        .max(slot_floor)
        .max(cfg.impact_width() + 2.0 * cfg.padding)
}

pub fn canvas_height(cfg: &LayoutConfig) -> f64 {
    3.0 * cfg.rank_pitch + 2.0 * cfg.padding
}

/// Center x of item `i` (1-indexed) among `k` items: `(width / (k + 1)) * i`.
pub fn slot_center_x(total_width: f64, k: usize, i: usize) -> f64 {
    (total_width / (k as f64 + 1.0)) * i as f64
}

pub fn rank_center_y(cfg: &LayoutConfig, rank: Rank) -> f64 {
    cfg.padding + cfg.rank_pitch * rank.index() as f64 + cfg.rank_pitch / 2.0
}

fn layout_row(cfg: &LayoutConfig, total_width: f64, rank: Rank, k: usize) -> Vec<Rect> {
    let cy = rank_center_y(cfg, rank);
    (1..=k)
        .map(|i| {
            Rect::centered(
                slot_center_x(total_width, k, i),
                cy,
                cfg.box_width,
                cfg.box_height,
            )
        })
        .collect()
}

pub fn layout_layers(cfg: &LayoutConfig, outcome_count: usize, output_count: usize) -> LayerLayout {
    let width = canvas_width(cfg, outcome_count, output_count);
    let height = canvas_height(cfg);

    let impact = Rect::centered(
        width / 2.0,
        rank_center_y(cfg, Rank::Impact),
        cfg.impact_width(),
        cfg.box_height,
    );
    let outcomes = layout_row(cfg, width, Rank::Outcomes, outcome_count);
    let outputs = layout_row(cfg, width, Rank::Outputs, output_count);

    tracing::debug!(
        outcome_count,
        output_count,
        width,
        height,
        "laid out theory of change ranks"
    );

    LayerLayout {
        width,
        height,
        impact,
        outcomes,
        outputs,
    }
}
