//! Ordered value maps sent across the plugin channel.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered string-keyed map.
pub type ValueMap = IndexMap<String, MapValue>;

/// A value inside a [`ValueMap`].
///
/// Serialized untagged, so a map encodes as a plain JSON object or msgpack map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<MapValue>),
    Map(ValueMap),
}

impl MapValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            MapValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MapValue::Null)
    }
}

impl From<&str> for MapValue {
    fn from(s: &str) -> Self {
        MapValue::String(s.to_string())
    }
}

impl From<String> for MapValue {
    fn from(s: String) -> Self {
        MapValue::String(s)
    }
}

impl From<bool> for MapValue {
    fn from(b: bool) -> Self {
        MapValue::Bool(b)
    }
}

impl From<i64> for MapValue {
    fn from(n: i64) -> Self {
        MapValue::Int(n)
    }
}

impl From<f64> for MapValue {
    fn from(n: f64) -> Self {
        MapValue::Double(n)
    }
}

impl From<ValueMap> for MapValue {
    fn from(m: ValueMap) -> Self {
        MapValue::Map(m)
    }
}

impl<T: Into<MapValue>> From<Option<T>> for MapValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(MapValue::Null)
    }
}

impl From<&serde_json::Value> for MapValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => MapValue::Null,
            Value::Bool(b) => MapValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => MapValue::Int(i),
                // u64 beyond i64 and floats
                None => MapValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => MapValue::String(s.clone()),
            Value::Array(items) => MapValue::List(items.iter().map(MapValue::from).collect()),
            Value::Object(obj) => MapValue::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), MapValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_value() {
        let json = serde_json::json!({
            "title": "hello",
            "rating": 4,
            "score": 1.5,
            "tags": ["a", null],
            "big": u64::MAX,
        });

        let value = MapValue::from(&json);
        let map = value.as_map().unwrap();
        assert_eq!(map["title"], MapValue::from("hello"));
        assert_eq!(map["rating"], MapValue::Int(4));
        assert_eq!(map["score"], MapValue::Double(1.5));
        assert_eq!(
            map["tags"],
            MapValue::List(vec![MapValue::from("a"), MapValue::Null])
        );
        assert!(matches!(map["big"], MapValue::Double(_)));
    }

    #[test]
    fn test_serializes_untagged_in_order() {
        let mut map = ValueMap::new();
        map.insert("z".to_string(), MapValue::from("last-key-first"));
        map.insert("a".to_string(), MapValue::Null);
        map.insert("m".to_string(), MapValue::from(Some(3i64)));

        let json = serde_json::to_string(&MapValue::Map(map)).unwrap();
        assert_eq!(json, r#"{"z":"last-key-first","a":null,"m":3}"#);
    }

    #[test]
    fn test_option_none_is_null() {
        assert!(MapValue::from(None::<i64>).is_null());
        assert_eq!(MapValue::from("x").as_str(), Some("x"));
    }
}
