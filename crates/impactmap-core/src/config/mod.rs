use serde_json::{Map, Value, json};

/// Render configuration as a JSON object addressed by dotted paths (`layout.boxWidth`).
///
/// Values that are absent fall back to whatever the consumer considers its default; use
/// [`ImpactMapConfig::defaults`] to start from the documented defaults and
/// [`ImpactMapConfig::deep_merge`] to layer user overrides on top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactMapConfig(Value);

impl Default for ImpactMapConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ImpactMapConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn defaults() -> Self {
        Self(json!({
            "layout": {
                "canvasWidth": 1200.0,
                "rankPitch": 180.0,
                "boxWidth": 200.0,
                "boxHeight": 80.0,
                "padding": 20.0,
                "gap": 40.0,
                "impactWidthFactor": 1.5
            },
            "text": {
                "maxChars": 60,
                "maxCharsPerLine": 30,
                "maxLines": 2
            },
            "connector": {
                "shared": {
                    "strokeWidth": 3.0,
                    "opacity": 0.85,
                    "dashArray": "6 4"
                },
                "default": {
                    "strokeWidth": 1.5,
                    "opacity": 0.5
                }
            }
        }))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON override document and merges it over [`ImpactMapConfig::defaults`].
    pub fn from_json_overrides(text: &str) -> crate::Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        let mut cfg = Self::defaults();
        cfg.deep_merge(&overrides);
        Ok(cfg)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    /// Reads a non-negative integer; accepts whole floats such as `60.0`.
    pub fn get_usize(&self, dotted_path: &str) -> Option<usize> {
        let v = self.lookup(dotted_path)?;
        if let Some(n) = v.as_u64() {
            return usize::try_from(n).ok();
        }
        let f = v.as_f64()?;
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
            Some(f as usize)
        } else {
            None
        }
    }

    /// Writes `value` at `dotted_path`, replacing any non-object found along the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let mut cur = &mut self.0;
        for seg in dotted_path.split('.') {
            if !cur.is_object() {
                *cur = Value::Object(Map::new());
            }
            let Value::Object(map) = cur else {
                return;
            };
            cur = map.entry(seg).or_insert(Value::Null);
        }
        *cur = value;
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    if let (Value::Object(base_map), Value::Object(in_map)) = (&mut *base, incoming) {
        for (key, in_value) in in_map {
            deep_merge_value(base_map.entry(key.clone()).or_insert(Value::Null), in_value);
        }
        return;
    }
    *base = incoming.clone();
}
