use crate::Result;
use crate::snapshot::{Indicator, Snapshot};
use std::fmt::Write as _;

const BLANK_STATEMENT: &str = "_(no statement)_";

pub fn to_json(snapshot: &Snapshot, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    Ok(out)
}

fn statement_or_placeholder(statement: &str) -> &str {
    let trimmed = statement.trim();
    if trimmed.is_empty() {
        BLANK_STATEMENT
    } else {
        trimmed
    }
}

fn write_indicators(out: &mut String, indicators: &[Indicator]) {
    if indicators.is_empty() {
        return;
    }
    out.push_str("**Indicators:**\n\n");
    for indicator in indicators {
        let _ = writeln!(out, "- {}", statement_or_placeholder(&indicator.description));
    }
    out.push('\n');
}

/// Renders the document as Markdown, one heading level per rank.
pub fn to_markdown(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str("# Theory of Change\n\n");
    out.push_str("## Impact\n\n");
    let _ = writeln!(
        &mut out,
        "{}\n",
        statement_or_placeholder(&snapshot.impact.statement)
    );

    if snapshot.outcomes.is_empty() {
        return out;
    }

    out.push_str("## Outcomes\n\n");
    for (i, outcome) in snapshot.outcomes.iter().enumerate() {
        let _ = writeln!(
            &mut out,
            "### Outcome {}: {}\n",
            i + 1,
            statement_or_placeholder(&outcome.statement)
        );
        write_indicators(&mut out, &outcome.indicators);

        for (j, output) in outcome.outputs.iter().enumerate() {
            let _ = writeln!(
                &mut out,
                "#### Output {}.{}: {}\n",
                i + 1,
                j + 1,
                statement_or_placeholder(&output.statement)
            );
            write_indicators(&mut out, &output.indicators);
        }
    }

    out
}
