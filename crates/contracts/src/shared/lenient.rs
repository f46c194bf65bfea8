//! Field deserializers for browser-written logs.
//!
//! Entries in `localStorage` are written by page scripts and may hold `null`
//! or a value of the wrong type in any field. These helpers accept any JSON
//! value and fold it to the field's empty default, so one odd field never
//! drops the whole entry.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Strings as-is, numbers and booleans as their text, anything else empty
pub fn any_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Objects as-is, anything else an empty map
pub fn any_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "any_string")]
        text: String,
        #[serde(default, deserialize_with = "any_object")]
        data: Map<String, Value>,
    }

    fn read(value: Value) -> Fields {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_any_string() {
        assert_eq!(read(json!({"text": "abc"})).text, "abc");
        assert_eq!(read(json!({"text": 1705312800000u64})).text, "1705312800000");
        assert_eq!(read(json!({"text": true})).text, "true");
        assert_eq!(read(json!({"text": null})).text, "");
        assert_eq!(read(json!({"text": ["a"]})).text, "");
        assert_eq!(read(json!({})).text, "");
    }

    #[test]
    fn test_any_object() {
        assert_eq!(read(json!({"data": {"a": 1}})).data["a"], 1);
        assert!(read(json!({"data": "name=Ali"})).data.is_empty());
        assert!(read(json!({"data": null})).data.is_empty());
        assert!(read(json!({"data": [1, 2]})).data.is_empty());
    }
}
