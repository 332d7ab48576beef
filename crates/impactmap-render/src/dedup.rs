//! Shared-output detection.
//!
//! Outputs are copied per outcome in the data model, so "the same output under two outcomes"
//! is recovered here by statement text: trimmed and lowercased, then compared byte-for-byte.
//! Near-duplicates (inner whitespace, punctuation) stay separate, and every blank statement
//! collapses into one node.

use impactmap_core::{Outcome, Output};
use indexmap::IndexMap;

/// One distinct output across all outcomes. Borrowed from the snapshot for a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueOutputNode<'a> {
    pub key: String,
    /// First-seen occurrence. Later copies' ids and indicators are not carried over.
    pub representative: &'a Output,
    /// Contributing outcome ids, each listed once, in first-seen order.
    pub source_outcome_ids: Vec<&'a str>,
}

impl UniqueOutputNode<'_> {
    pub fn is_shared(&self) -> bool {
        self.source_outcome_ids.len() > 1
    }
}

pub fn normalize_statement(statement: &str) -> String {
    statement.to_lowercase().trim().to_string()
}

pub fn dedupe_outputs(outcomes: &[Outcome]) -> Vec<UniqueOutputNode<'_>> {
    let mut by_key: IndexMap<String, UniqueOutputNode<'_>> = IndexMap::new();

    for outcome in outcomes {
        for output in &outcome.outputs {
            let key = normalize_statement(&output.statement);
            match by_key.get_mut(&key) {
                Some(node) => {
                    // An outcome's outputs are visited consecutively, so a repeat within the
                    // same outcome always shows up as the last recorded id.
                    if node.source_outcome_ids.last() != Some(&outcome.id.as_str()) {
                        node.source_outcome_ids.push(outcome.id.as_str());
                    }
                }
                None => {
                    by_key.insert(
                        key.clone(),
                        UniqueOutputNode {
                            key,
                            representative: output,
                            source_outcome_ids: vec![outcome.id.as_str()],
                        },
                    );
                }
            }
        }
    }

    by_key.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use impactmap_core::Indicator;

    fn output(id: &str, statement: &str) -> Output {
        Output {
            id: id.to_string(),
            statement: statement.to_string(),
            indicators: vec![],
        }
    }

    fn outcome(id: &str, outputs: Vec<Output>) -> Outcome {
        Outcome {
            id: id.to_string(),
            statement: id.to_uppercase(),
            indicators: vec![],
            outputs,
        }
    }

    #[test]
    fn dedupe_merges_case_and_edge_whitespace_variants() {
        let outcomes = vec![
            outcome("a", vec![output("a1", "Shared Thing"), output("a2", "Only A")]),
            outcome("b", vec![output("b1", "  shared thing ")]),
            outcome("c", vec![output("c1", "SHARED THING")]),
        ];
        let nodes = dedupe_outputs(&outcomes);

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].key, "shared thing");
        assert_eq!(nodes[0].source_outcome_ids, vec!["a", "b", "c"]);
        assert_eq!(nodes[0].representative.id, "a1");
        assert!(nodes[0].is_shared());
        assert_eq!(nodes[1].key, "only a");
        assert!(!nodes[1].is_shared());
    }

    #[test]
    fn dedupe_lists_an_outcome_once_even_when_it_repeats_a_statement() {
        let outcomes = vec![
            outcome("a", vec![output("a1", "Train staff"), output("a2", "train staff")]),
            outcome("b", vec![output("b1", "Train staff")]),
        ];
        let nodes = dedupe_outputs(&outcomes);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].source_outcome_ids, vec!["a", "b"]);
    }

    #[test]
    fn dedupe_keeps_near_duplicates_apart() {
        let outcomes = vec![outcome(
            "a",
            vec![output("a1", "Train staff"), output("a2", "Train  staff"), output("a3", "Train staff.")],
        )];
        assert_eq!(dedupe_outputs(&outcomes).len(), 3);
    }

    #[test]
    fn dedupe_merges_all_blank_statements() {
        let outcomes = vec![
            outcome("a", vec![output("a1", "")]),
            outcome("b", vec![output("b1", "   ")]),
        ];
        let nodes = dedupe_outputs(&outcomes);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, "");
        assert!(nodes[0].is_shared());
    }

    #[test]
    fn dedupe_keeps_first_seen_indicators() {
        let mut first = output("a1", "Shared");
        first.indicators.push(Indicator::new("i1", "first"));
        let mut second = output("b1", "Shared");
        second.indicators.push(Indicator::new("i2", "second"));
        second.indicators.push(Indicator::new("i3", "third"));

        let outcomes = vec![outcome("a", vec![first]), outcome("b", vec![second])];
        let nodes = dedupe_outputs(&outcomes);
        assert_eq!(nodes[0].representative.indicators.len(), 1);
        assert_eq!(nodes[0].representative.indicators[0].description, "first");
    }

    #[test]
    fn dedupe_of_no_outcomes_is_empty() {
        assert!(dedupe_outputs(&[]).is_empty());
    }
}
