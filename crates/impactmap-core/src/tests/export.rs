use crate::export::{to_json, to_markdown};
use crate::*;

fn sample() -> Snapshot {
    Snapshot {
        impact: Impact {
            id: "impact".to_string(),
            statement: "Healthier communities".to_string(),
        },
        outcomes: vec![
            Outcome {
                id: "a".to_string(),
                statement: "Better access to care".to_string(),
                indicators: vec![Indicator::new("ia", "Visits per month")],
                outputs: vec![Output {
                    id: "a1".to_string(),
                    statement: "Clinics built".to_string(),
                    indicators: vec![Indicator::new("ia1", "Clinics open")],
                }],
            },
            Outcome {
                id: "b".to_string(),
                statement: "  ".to_string(),
                indicators: vec![],
                outputs: vec![],
            },
        ],
    }
}

#[test]
fn markdown_export_has_one_heading_level_per_rank() {
    let md = to_markdown(&sample());
    assert_eq!(
        md,
        "# Theory of Change\n\n\
## Impact\n\n\
Healthier communities\n\n\
## Outcomes\n\n\
### Outcome 1: Better access to care\n\n\
**Indicators:**\n\n\
- Visits per month\n\n\
#### Output 1.1: Clinics built\n\n\
**Indicators:**\n\n\
- Clinics open\n\n\
### Outcome 2: _(no statement)_\n\n"
    );
}

#[test]
fn markdown_export_without_outcomes_stops_after_impact() {
    let md = to_markdown(&Snapshot::new("X"));
    assert_eq!(md, "# Theory of Change\n\n## Impact\n\nX\n\n");
}

#[test]
fn json_export_round_trips_through_import() {
    let snapshot = sample();
    let text = to_json(&snapshot, true).unwrap();
    assert_eq!(Snapshot::from_json_str(&text).unwrap(), snapshot);
}
