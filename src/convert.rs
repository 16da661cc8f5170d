//! Building [`Value`] trees from JSON text.
//!
//! Parsing is delegated to `serde_json` (with `preserve_order`, so object
//! members keep document order); the result is then moved into the engine's
//! own value type.

use crate::Value;

/// Parses JSON text into a [`Value`].
pub fn from_json_str(text: &str) -> Result<Value, serde_json::Error> {
    let parsed: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from(parsed))
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                // u64 beyond i64::MAX and everything with a fraction or exponent
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
