use serde_json::{Map, Value};
use std::sync::OnceLock;

mod chart;

pub use chart::{CategoricalConfig, ChartConfig, Margin, ThemeConfig, TooltipConfig};

static DEFAULT_ESSAY_CONFIG: OnceLock<EssayConfig> = OnceLock::new();

/// Built-in defaults for every tunable of the chart.
pub fn default_essay_config() -> EssayConfig {
    DEFAULT_ESSAY_CONFIG
        .get_or_init(|| {
            let json_text = include_str!("default_config.json");
            let value: Value =
                serde_json::from_str(json_text).expect("bundled default config JSON is valid");
            EssayConfig::from_value(value)
        })
        .clone()
}

/// Untyped, JSON-shaped configuration with dotted-path access.
///
/// User overrides are merged onto [`default_essay_config`] and then resolved into a typed
/// [`ChartConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct EssayConfig(Value);

impl Default for EssayConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl EssayConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses a JSON document into a config object.
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(crate::Error::InvalidConfig {
                message: "config root must be a JSON object".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let v = self.get(dotted_path)?;
        v.as_f64()
            .or_else(|| v.as_i64().map(|n| n as f64))
            .or_else(|| v.as_u64().map(|n| n as f64))
    }

    pub fn get_i64(&self, dotted_path: &str) -> Option<i64> {
        let v = self.get(dotted_path)?;
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        })
    }

    /// Sets `dotted_path`, replacing any non-object value met along the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let mut cur = &mut self.0;
        for segment in dotted_path.split('.') {
            if !cur.is_object() {
                *cur = Value::Object(Map::new());
            }
            let Value::Object(map) = cur else {
                return;
            };
            cur = map.entry(segment).or_insert(Value::Null);
        }
        *cur = value;
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &EssayConfig) -> Self {
        let mut cfg = default_essay_config();
        cfg.deep_merge(overrides.as_value());
        cfg
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_expose_the_essay_year_range() {
        let cfg = default_essay_config();
        assert_eq!(cfg.get_i64("timeline.minYear"), Some(1770));
        assert_eq!(cfg.get_i64("timeline.maxYear"), Some(1815));
        assert_eq!(cfg.get_f64("timeline.dotSpacing"), Some(12.0));
        assert_eq!(cfg.get_str("theme.accentFill"), Some("#0000FF"));
    }

    #[test]
    fn deep_merge_keeps_sibling_keys() {
        let mut cfg = default_essay_config();
        cfg.deep_merge(&json!({ "timeline": { "dotSpacing": 9 } }));
        assert_eq!(cfg.get_f64("timeline.dotSpacing"), Some(9.0));
        assert_eq!(cfg.get_f64("timeline.dotRadius"), Some(5.0));
    }

    #[test]
    fn set_value_creates_intermediate_objects() {
        let mut cfg = EssayConfig::from_value(json!("not an object"));
        cfg.set_value("viewport.width", json!(800));
        assert_eq!(cfg.get_f64("viewport.width"), Some(800.0));

        cfg.set_value("viewport.width.px", json!(1));
        assert_eq!(cfg.get_i64("viewport.width.px"), Some(1));
        assert_eq!(cfg.as_value(), &json!({ "viewport": { "width": { "px": 1 } } }));
    }

    #[test]
    fn from_json_str_rejects_non_objects() {
        let err = EssayConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfig { .. }));
    }
}
