#![forbid(unsafe_code)]

//! Theory of Change data model (headless).
//!
//! - [`Snapshot`]: the Impact → Outcomes → Outputs → Indicators tree, with JSON import that
//!   fails fast on malformed input
//! - [`Document`]: an editable snapshot that notifies listeners on every mutation
//! - [`export`]: Markdown and JSON serialization
//! - [`ImpactMapConfig`]: dotted-path render configuration

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod snapshot;

pub use config::ImpactMapConfig;
pub use document::{ChangeEvent, Document, IndicatorTarget, SubscriptionId};
pub use error::{Error, Result};
pub use snapshot::{Impact, Indicator, Outcome, Output, Snapshot, validate_snapshot_value};

#[cfg(test)]
mod tests;
