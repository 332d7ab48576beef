use crate::ImpactMapConfig;
use serde_json::json;

#[test]
fn config_defaults_expose_documented_values() {
    let cfg = ImpactMapConfig::defaults();
    assert_eq!(cfg.get_f64("layout.canvasWidth"), Some(1200.0));
    assert_eq!(cfg.get_f64("layout.rankPitch"), Some(180.0));
    assert_eq!(cfg.get_f64("layout.impactWidthFactor"), Some(1.5));
    assert_eq!(cfg.get_usize("text.maxChars"), Some(60));
    assert_eq!(cfg.get_usize("text.maxLines"), Some(2));
    assert_eq!(cfg.get_str("connector.shared.dashArray"), Some("6 4"));
    assert_eq!(cfg.get_f64("layout.missing"), None);
}

#[test]
fn config_deep_merge_keeps_sibling_defaults() {
    let cfg = ImpactMapConfig::from_json_overrides(r#"{ "layout": { "boxWidth": 240 } }"#).unwrap();
    assert_eq!(cfg.get_f64("layout.boxWidth"), Some(240.0));
    assert_eq!(cfg.get_f64("layout.boxHeight"), Some(80.0));
}

#[test]
fn config_get_usize_accepts_whole_floats_only() {
    let mut cfg = ImpactMapConfig::empty_object();
    cfg.set_value("text.maxChars", json!(42.0));
    cfg.set_value("text.maxLines", json!(1.5));
    cfg.set_value("text.maxCharsPerLine", json!(-3));
    assert_eq!(cfg.get_usize("text.maxChars"), Some(42));
    assert_eq!(cfg.get_usize("text.maxLines"), None);
    assert_eq!(cfg.get_usize("text.maxCharsPerLine"), None);
}

#[test]
fn config_set_value_coerces_non_object_roots() {
    let mut cfg = ImpactMapConfig::from_value(json!("not an object"));
    cfg.set_value("layout.gap", json!(12));
    assert_eq!(cfg.as_value(), &json!({ "layout": { "gap": 12 } }));
    assert_eq!(cfg.get_bool("layout.gap"), None);
}

#[test]
fn config_set_value_replaces_scalars_on_the_path() {
    let mut cfg = ImpactMapConfig::from_value(json!({ "layout": 3, "text": { "maxLines": 2 } }));
    cfg.set_value("layout.padding.top", json!(8));
    cfg.set_value("text.maxChars", json!(40));
    assert_eq!(
        cfg.as_value(),
        &json!({
            "layout": { "padding": { "top": 8 } },
            "text": { "maxLines": 2, "maxChars": 40 }
        })
    );
}

#[test]
fn config_deep_merge_replaces_non_object_leaves() {
    let mut cfg = ImpactMapConfig::from_value(json!({ "connector": { "shared": 1 } }));
    cfg.deep_merge(&json!({ "connector": { "shared": { "dashArray": "2 2" } }, "extra": [1] }));
    assert_eq!(cfg.get_str("connector.shared.dashArray"), Some("2 2"));
    assert_eq!(cfg.as_value()["extra"], json!([1]));
}
