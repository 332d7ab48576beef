//! Plain-text tree view of a snapshot, for terminals and screen readers.

use crate::dedup::{dedupe_outputs, normalize_statement};
use impactmap_core::{Indicator, Snapshot};
use rustc_hash::FxHashSet;
use std::fmt::Write as _;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

struct OutlineNode {
    line: String,
    children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn leaf(line: String) -> Self {
        Self {
            line,
            children: Vec::new(),
        }
    }
}

fn statement_or_blank(statement: &str) -> &str {
    let trimmed = statement.trim();
    if trimmed.is_empty() {
        "(no statement)"
    } else {
        trimmed
    }
}

fn indicator_nodes(indicators: &[Indicator]) -> Vec<OutlineNode> {
    indicators
        .iter()
        .map(|i| OutlineNode::leaf(format!("Indicator: {}", statement_or_blank(&i.description))))
        .collect()
}

fn write_children(out: &mut String, children: &[OutlineNode], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let _ = writeln!(
            out,
            "{prefix}{}{}",
            if is_last { LAST_BRANCH } else { BRANCH },
            child.line
        );
        let next_prefix = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
        write_children(out, &child.children, &next_prefix);
    }
}

/// Renders the hierarchy as an indented tree. Outputs whose statement appears under more than
/// one outcome are listed under each of them and marked `[shared]`.
pub fn render_outline(snapshot: &Snapshot) -> String {
    let shared: FxHashSet<String> = dedupe_outputs(&snapshot.outcomes)
        .into_iter()
        .filter(|u| u.is_shared())
        .map(|u| u.key)
        .collect();

    let outcomes: Vec<OutlineNode> = snapshot
        .outcomes
        .iter()
        .map(|outcome| {
            let mut children = indicator_nodes(&outcome.indicators);
            children.extend(outcome.outputs.iter().map(|output| {
                let mut line = format!("Output: {}", statement_or_blank(&output.statement));
                if shared.contains(&normalize_statement(&output.statement)) {
                    line.push_str(" [shared]");
                }
                OutlineNode {
                    line,
                    children: indicator_nodes(&output.indicators),
                }
            }));
            OutlineNode {
                line: format!("Outcome: {}", statement_or_blank(&outcome.statement)),
                children,
            }
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Impact: {}",
        statement_or_blank(&snapshot.impact.statement)
    );
    write_children(&mut out, &outcomes, "");
    out
}
