use crate::SceneOptions;
use crate::connector::route;
use crate::dedup::{UniqueOutputNode, dedupe_outputs};
use crate::layout::layout_layers;
use crate::model::{IndicatorBadge, NodeKind, Point, Rect, Scene, SceneConnector, SceneNode};
use crate::text::fit_text;
use impactmap_core::Snapshot;
use rustc_hash::FxHashMap;

const BADGE_RADIUS: f64 = 12.0;
const BLANK_STATEMENT: &str = "(no statement)";

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

pub fn indicator_label(count: usize) -> String {
    plural(count, "indicator", "indicators")
}

pub fn output_label(source_count: usize) -> String {
    if source_count > 1 {
        format!("Output (shared across {source_count} outcomes)")
    } else {
        "Output".to_string()
    }
}

fn aria_label(label: &str, statement: &str, indicator_count: usize) -> String {
    let statement = statement.trim();
    let statement = if statement.is_empty() {
        BLANK_STATEMENT
    } else {
        statement
    };
    if indicator_count > 0 {
        format!("{label}: {statement}, {}", indicator_label(indicator_count))
    } else {
        format!("{label}: {statement}")
    }
}

fn badge_for(bounds: &Rect, indicator_count: usize) -> Option<IndicatorBadge> {
    (indicator_count > 0).then(|| IndicatorBadge {
        count: indicator_count,
        label: indicator_label(indicator_count),
        center: Point::new(bounds.right() - BADGE_RADIUS, bounds.y),
        radius: BADGE_RADIUS,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_node(
    options: &SceneOptions,
    id: &str,
    kind: NodeKind,
    bounds: Rect,
    label: String,
    statement: &str,
    indicator_count: usize,
    source_outcome_ids: Vec<String>,
) -> SceneNode {
    let is_shared = source_outcome_ids.len() > 1;
    SceneNode {
        id: id.to_string(),
        kind,
        bounds,
        aria_label: aria_label(&label, statement, indicator_count),
        label,
        text: fit_text(statement, &options.text),
        indicator_count,
        badge: badge_for(&bounds, indicator_count),
        is_shared,
        source_outcome_ids,
    }
}

fn describe(snapshot: &Snapshot, unique_outputs: &[UniqueOutputNode<'_>]) -> String {
    let shared = unique_outputs.iter().filter(|u| u.is_shared()).count();
    let impact = snapshot.impact.statement.trim();
    let impact = if impact.is_empty() {
        BLANK_STATEMENT
    } else {
        impact
    };
    let mut out = format!(
        "Impact: {impact}. {} and {}",
        plural(snapshot.outcomes.len(), "outcome", "outcomes"),
        plural(unique_outputs.len(), "unique output", "unique outputs"),
    );
    if shared > 0 {
        out.push_str(&format!(
            ", {} shared across outcomes",
            plural(shared, "output", "outputs")
        ));
    }
    out.push('.');
    out
}

/// Runs one full pass: dedup, rank layout, text fitting, connector routing.
///
/// Node order is Impact, then outcomes, then unique outputs in first-seen order. Connectors
/// are Impact → Outcome pairs followed by one Outcome → Output connector per contributing
/// outcome of each unique output.
pub fn assemble(snapshot: &Snapshot, options: &SceneOptions) -> Scene {
    let unique_outputs = dedupe_outputs(&snapshot.outcomes);
    let layers = layout_layers(
        &options.layout,
        snapshot.outcomes.len(),
        unique_outputs.len(),
    );

    let mut nodes: Vec<SceneNode> =
        Vec::with_capacity(1 + snapshot.outcomes.len() + unique_outputs.len());
    let mut connectors: Vec<SceneConnector> = Vec::new();

    nodes.push(build_node(
        options,
        &snapshot.impact.id,
        NodeKind::Impact,
        layers.impact,
        "Impact".to_string(),
        &snapshot.impact.statement,
        0,
        Vec::new(),
    ));
    let impact_index = 0usize;

    let mut outcome_index: FxHashMap<&str, usize> = FxHashMap::default();
    for (outcome, bounds) in snapshot.outcomes.iter().zip(&layers.outcomes) {
        let index = nodes.len();
        outcome_index.insert(outcome.id.as_str(), index);
        nodes.push(build_node(
            options,
            &outcome.id,
            NodeKind::Outcome,
            *bounds,
            "Outcome".to_string(),
            &outcome.statement,
            outcome.indicators.len(),
            Vec::new(),
        ));
        connectors.push(SceneConnector {
            from_node: impact_index,
            to_node: index,
            is_shared: false,
            curve: route(
                layers.impact.bottom_center(),
                bounds.top_center(),
                false,
                &options.connectors,
            ),
        });
    }

    for (unique, bounds) in unique_outputs.iter().zip(&layers.outputs) {
        let index = nodes.len();
        let is_shared = unique.is_shared();
        nodes.push(build_node(
            options,
            &unique.representative.id,
            NodeKind::Output,
            *bounds,
            output_label(unique.source_outcome_ids.len()),
            &unique.representative.statement,
            unique.representative.indicators.len(),
            unique
                .source_outcome_ids
                .iter()
                .map(|id| id.to_string())
                .collect(),
        ));

        for source_id in &unique.source_outcome_ids {
            let Some(&from) = outcome_index.get(source_id) else {
                tracing::warn!(outcome_id = %source_id, "output source outcome has no node");
                continue;
            };
            connectors.push(SceneConnector {
                from_node: from,
                to_node: index,
                is_shared,
                curve: route(
                    nodes[from].bounds.bottom_center(),
                    bounds.top_center(),
                    is_shared,
                    &options.connectors,
                ),
            });
        }
    }

    let shared_output_count = unique_outputs.iter().filter(|u| u.is_shared()).count();
    tracing::debug!(
        outcomes = snapshot.outcomes.len(),
        unique_outputs = unique_outputs.len(),
        shared_outputs = shared_output_count,
        connectors = connectors.len(),
        "assembled theory of change scene"
    );

    Scene {
        width: layers.width,
        height: layers.height,
        title: "Theory of Change".to_string(),
        description: describe(snapshot, &unique_outputs),
        outcome_count: snapshot.outcomes.len(),
        unique_output_count: unique_outputs.len(),
        shared_output_count,
        connectors,
        nodes,
    }
}
