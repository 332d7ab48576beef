#![forbid(unsafe_code)]

//! Headless layout for Theory of Change diagrams.
//!
//! One pass turns a [`Snapshot`] into a render-target-agnostic [`Scene`]:
//! shared-output detection ([`dedup`]) → three-rank layout ([`layout`]) → label fitting
//! ([`text`]) → connector curves ([`connector`]) → [`scene::assemble`]. The pass is pure: no
//! I/O, no state kept between calls. [`svg`] and [`outline`] are thin adapters on top.

pub mod connector;
pub mod dedup;
pub mod layout;
pub mod model;
pub mod outline;
pub mod scene;
pub mod svg;
pub mod text;

use crate::connector::ConnectorStyles;
use crate::layout::LayoutConfig;
use crate::model::Scene;
use crate::text::FitOptions;
use impactmap_core::{ImpactMapConfig, Snapshot};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] impactmap_core::Error),
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneOptions {
    pub layout: LayoutConfig,
    pub text: FitOptions,
    pub connectors: ConnectorStyles,
}

impl SceneOptions {
    pub fn from_config(cfg: &ImpactMapConfig) -> Result<Self> {
        Ok(Self {
            layout: LayoutConfig::from_config(cfg)?,
            text: FitOptions::from_config(cfg)?,
            connectors: ConnectorStyles::from_config(cfg)?,
        })
    }
}

pub fn layout_snapshot(snapshot: &Snapshot, options: &SceneOptions) -> Scene {
    scene::assemble(snapshot, options)
}

/// Validates an untyped snapshot, then lays it out. Malformed input fails before any layout.
pub fn layout_snapshot_value(value: &Value, options: &SceneOptions) -> Result<Scene> {
    let snapshot = Snapshot::from_value(value)?;
    Ok(scene::assemble(&snapshot, options))
}
