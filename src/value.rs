use indexmap::IndexMap;

/// A JSON value as seen by the query engine.
///
/// Integers and floats are kept apart so that results render the way the
/// document spelled them, but both answer to the single JSON "number" type
/// for type tests and comparisons.
///
/// Objects keep their members in document order; wildcards and descendant
/// segments visit them in that order.
///
/// # Examples
///
/// ```
/// use match_jsonpath::Value;
/// use indexmap::IndexMap;
///
/// let mut obj = IndexMap::new();
/// obj.insert("service".to_string(), Value::String("http".to_string()));
/// obj.insert("latency".to_string(), Value::Float(0.25));
/// let object = Value::Object(obj);
///
/// assert!(object.is_container());
/// assert_eq!(object.get("latency").and_then(Value::as_float), Some(0.25));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object members in insertion order
    Object(IndexMap<String, Value>),
}

/// The JSON type of a value, with integers and floats folded into `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Value {
    pub fn json_type(&self) -> JsonType {
        match self {
            Value::Null => JsonType::Null,
            Value::Boolean(_) => JsonType::Boolean,
            Value::Integer(_) | Value::Float(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// True for arrays and objects.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Object member lookup. `None` for absent keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    /// Number of direct children; zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            Value::Array(arr) => arr.len(),
            Value::Object(obj) => obj.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct children in document order: array elements or object member values.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Value::Array(arr) => Box::new(arr.iter()),
            Value::Object(obj) => Box::new(obj.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Deep structural comparison.
    ///
    /// Unlike `==`, numbers compare by numeric value regardless of whether
    /// they were stored as integers or floats.
    pub fn deep_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => a.as_float() == b.as_float(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_equals(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.deep_equals(w)))
            }
            _ => false,
        }
    }
}
