//! The Impact → Outcomes → Outputs → Indicators tree.
//!
//! Outputs are owned per outcome. Two outcomes that "share" an output each hold their own copy
//! with an independently generated id; sharing is derived later from the statement text.

use crate::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_IMPACT_ID: &str = "impact";

fn default_impact_id() -> String {
    DEFAULT_IMPACT_ID.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub impact: Impact,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    #[serde(default = "default_impact_id")]
    pub id: String,
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub id: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default)]
    pub outputs: Vec<Output>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub id: String,
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
}

impl Snapshot {
    pub fn new(impact_statement: impl Into<String>) -> Self {
        Self {
            impact: Impact {
                id: default_impact_id(),
                statement: impact_statement.into(),
            },
            outcomes: Vec::new(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Validates and converts an untyped JSON document.
    ///
    /// Fails fast with [`Error::MalformedSnapshot`]; nothing is coerced.
    pub fn from_value(value: &Value) -> Result<Self> {
        validate_snapshot_value(value)?;
        Self::deserialize(value).map_err(|e| Error::malformed(e.to_string()))
    }

    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    pub fn total_output_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.outputs.len()).sum()
    }
}

impl Indicator {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// Structural checks performed before a snapshot reaches the layout pipeline.
pub fn validate_snapshot_value(value: &Value) -> Result<()> {
    let root = value
        .as_object()
        .ok_or_else(|| Error::malformed("root must be an object"))?;

    let impact = root
        .get("impact")
        .ok_or_else(|| Error::malformed("missing `impact`"))?
        .as_object()
        .ok_or_else(|| Error::malformed("`impact` must be an object"))?;
    match impact.get("statement") {
        Some(Value::String(_)) => {}
        Some(_) => return Err(Error::malformed("`impact.statement` must be a string")),
        None => return Err(Error::malformed("missing `impact.statement`")),
    }
    optional_string(impact.get("id"), "impact.id")?;

    let outcomes = root
        .get("outcomes")
        .ok_or_else(|| Error::malformed("missing `outcomes`"))?
        .as_array()
        .ok_or_else(|| Error::malformed("`outcomes` must be an array"))?;

    let mut seen_outcome_ids: FxHashSet<&str> = FxHashSet::default();
    for (i, outcome) in outcomes.iter().enumerate() {
        let path = format!("outcomes[{i}]");
        let id = validate_item(outcome, &path)?;
        if !seen_outcome_ids.insert(id) {
            return Err(Error::malformed(format!("{path}: duplicate outcome id `{id}`")));
        }
        let Some(obj) = outcome.as_object() else {
            continue;
        };
        if let Some(outputs) = obj.get("outputs") {
            let outputs = outputs
                .as_array()
                .ok_or_else(|| Error::malformed(format!("`{path}.outputs` must be an array")))?;
            for (j, output) in outputs.iter().enumerate() {
                validate_item(output, &format!("{path}.outputs[{j}]"))?;
            }
        }
    }

    Ok(())
}

/// Checks an outcome/output object: string `id`, optional string `statement`, optional
/// `indicators` array. Returns the id.
fn validate_item<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::malformed(format!("`{path}` must be an object")))?;
    let id = match obj.get("id") {
        Some(Value::String(id)) => id.as_str(),
        Some(_) => return Err(Error::malformed(format!("`{path}.id` must be a string"))),
        None => return Err(Error::malformed(format!("missing `{path}.id`"))),
    };
    optional_string(obj.get("statement"), &format!("{path}.statement"))?;

    if let Some(indicators) = obj.get("indicators") {
        let indicators = indicators
            .as_array()
            .ok_or_else(|| Error::malformed(format!("`{path}.indicators` must be an array")))?;
        for (k, indicator) in indicators.iter().enumerate() {
            let ipath = format!("{path}.indicators[{k}]");
            let iobj = indicator
                .as_object()
                .ok_or_else(|| Error::malformed(format!("`{ipath}` must be an object")))?;
            optional_string(iobj.get("id"), &format!("{ipath}.id"))?;
            optional_string(iobj.get("description"), &format!("{ipath}.description"))?;
        }
    }

    Ok(id)
}

fn optional_string(value: Option<&Value>, path: &str) -> Result<()> {
    match value {
        None | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(Error::malformed(format!("`{path}` must be a string"))),
    }
}
