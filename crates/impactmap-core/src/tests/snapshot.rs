use crate::*;
use serde_json::json;

fn malformed_message(value: serde_json::Value) -> String {
    match Snapshot::from_value(&value).unwrap_err() {
        Error::MalformedSnapshot { message } => message,
        other => panic!("expected MalformedSnapshot, got {other:?}"),
    }
}

#[test]
fn snapshot_from_value_fills_optional_fields() {
    let snapshot = Snapshot::from_value(&json!({
        "impact": { "statement": "Healthier communities" },
        "outcomes": [
            { "id": "a", "outputs": [ { "id": "a1", "statement": "Clinics built" } ] },
            { "id": "b", "statement": "Better nutrition", "indicators": [ { "description": "Stunting rate" } ] }
        ]
    }))
    .unwrap();

    assert_eq!(snapshot.impact.id, "impact");
    assert_eq!(snapshot.impact.statement, "Healthier communities");
    assert_eq!(snapshot.outcomes.len(), 2);
    assert_eq!(snapshot.outcomes[0].statement, "");
    assert!(snapshot.outcomes[0].indicators.is_empty());
    assert_eq!(snapshot.outcomes[0].outputs[0].statement, "Clinics built");
    assert!(snapshot.outcomes[1].outputs.is_empty());
    assert_eq!(snapshot.outcomes[1].indicators[0].id, "");
    assert_eq!(snapshot.total_output_count(), 1);
}

#[test]
fn snapshot_rejects_missing_impact_statement() {
    let message = malformed_message(json!({ "impact": { "id": "i" }, "outcomes": [] }));
    assert_eq!(message, "missing `impact.statement`");
}

#[test]
fn snapshot_rejects_non_array_outcomes() {
    let message = malformed_message(json!({ "impact": { "statement": "X" }, "outcomes": {} }));
    assert_eq!(message, "`outcomes` must be an array");

    let message = malformed_message(json!({ "impact": { "statement": "X" } }));
    assert_eq!(message, "missing `outcomes`");
}

#[test]
fn snapshot_rejects_non_object_root_and_impact() {
    assert_eq!(malformed_message(json!([])), "root must be an object");
    assert_eq!(
        malformed_message(json!({ "impact": "X", "outcomes": [] })),
        "`impact` must be an object"
    );
}

#[test]
fn snapshot_error_messages_name_the_json_path() {
    let message = malformed_message(json!({
        "impact": { "statement": "X" },
        "outcomes": [
            { "id": "a", "outputs": [] },
            { "id": "b", "outputs": [ { "statement": "no id" } ] }
        ]
    }));
    assert_eq!(message, "missing `outcomes[1].outputs[0].id`");

    let message = malformed_message(json!({
        "impact": { "statement": "X" },
        "outcomes": [ { "id": "a", "outputs": "nope" } ]
    }));
    assert_eq!(message, "`outcomes[0].outputs` must be an array");

    let message = malformed_message(json!({
        "impact": { "statement": "X" },
        "outcomes": [ { "id": "a", "indicators": [ { "description": 3 } ] } ]
    }));
    assert_eq!(message, "`outcomes[0].indicators[0].description` must be a string");
}

#[test]
fn snapshot_rejects_duplicate_outcome_ids() {
    let message = malformed_message(json!({
        "impact": { "statement": "X" },
        "outcomes": [ { "id": "a" }, { "id": "a" } ]
    }));
    assert_eq!(message, "outcomes[1]: duplicate outcome id `a`");
}

#[test]
fn snapshot_allows_duplicate_output_ids_across_outcomes() {
    let snapshot = Snapshot::from_value(&json!({
        "impact": { "statement": "X" },
        "outcomes": [
            { "id": "a", "outputs": [ { "id": "o", "statement": "Shared" } ] },
            { "id": "b", "outputs": [ { "id": "o", "statement": "Shared" } ] }
        ]
    }))
    .unwrap();
    assert_eq!(snapshot.total_output_count(), 2);
}

#[test]
fn snapshot_from_json_str_reports_syntax_errors_as_json_errors() {
    let err = Snapshot::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)), "{err:?}");
}

#[test]
fn snapshot_serializes_with_camel_case_shape() {
    let mut snapshot = Snapshot::new("X");
    snapshot.outcomes.push(Outcome {
        id: "a".to_string(),
        statement: "A".to_string(),
        indicators: vec![Indicator::new("i1", "Count")],
        outputs: vec![],
    });
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        value,
        json!({
            "impact": { "id": "impact", "statement": "X" },
            "outcomes": [
                {
                    "id": "a",
                    "statement": "A",
                    "indicators": [ { "id": "i1", "description": "Count" } ],
                    "outputs": []
                }
            ]
        })
    );
}
