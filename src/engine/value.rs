use base64::Engine as _;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde::Serialize;

/// A single result cell as returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    // Blobs have no textual form in the playground; carry them as base64.
    pub(crate) fn from_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).into_owned()),
            ValueRef::Blob(b) => Value::Text(base64::engine::general_purpose::STANDARD.encode(b)),
        }
    }

    /// Maps a dataset JSON value onto the parameter bound for it.
    pub(crate) fn bind_json(value: &serde_json::Value) -> SqlValue {
        match value {
            serde_json::Value::Null => SqlValue::Null,
            serde_json::Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Integer(i),
                None => SqlValue::Real(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => SqlValue::Text(s.clone()),
            other => SqlValue::Text(other.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_uses_plain_number_forms() {
        assert_eq!(Value::Integer(1234567).to_string(), "1234567");
        assert_eq!(Value::Real(60000.0).to_string(), "60000");
        assert_eq!(Value::Real(24.5).to_string(), "24.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_bind_json_maps_scalar_kinds() {
        assert_eq!(Value::bind_json(&json!(null)), SqlValue::Null);
        assert_eq!(Value::bind_json(&json!(true)), SqlValue::Integer(1));
        assert_eq!(Value::bind_json(&json!(42)), SqlValue::Integer(42));
        assert_eq!(Value::bind_json(&json!(2.5)), SqlValue::Real(2.5));
        assert_eq!(
            Value::bind_json(&json!("Santiago")),
            SqlValue::Text("Santiago".to_string())
        );
        assert_eq!(
            Value::bind_json(&json!(["a", 1])),
            SqlValue::Text("[\"a\",1]".to_string())
        );
    }

    #[test]
    fn test_blob_cells_become_base64_text() {
        let value = Value::from_ref(ValueRef::Blob(&[0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(value, Value::Text("3q2+7w==".to_string()));
    }

    #[test]
    fn test_as_f64_parses_numeric_text() {
        assert_eq!(Value::Text(" 12.5 ".to_string()).as_f64(), Some(12.5));
        assert_eq!(Value::Text("abc".to_string()).as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }
}
