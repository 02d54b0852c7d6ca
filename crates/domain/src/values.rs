//! Decoded write payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column name to value mapping decoded from a request body.
///
/// Decoding never fails: an absent, malformed, or non-object body yields
/// the empty mapping and the request proceeds with no values to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(Map<String, Value>);

impl Values {
    /// Create an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Decode a raw request body.
    ///
    /// Anything that is not a JSON object, an empty body and unparsable
    /// bytes included, decodes to the empty mapping.
    #[must_use]
    pub fn decode(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::new(),
        }
    }

    /// Look up a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Insert a value, returning the previous one if present.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(column.into(), value)
    }

    /// Remove and return a value by column name.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.0.remove(column)
    }

    /// True when no values are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of values present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(column, value)` pairs in decode order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Consume the payload, yielding the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Values {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Values {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Values;

    #[test]
    fn should_decode_json_objects() {
        let values = Values::decode(br#"{"name":"fern","count":2}"#);
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("name"), Some(&serde_json::json!("fern")));
        assert_eq!(values.get("count"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn should_decode_empty_body_as_empty() {
        assert!(Values::decode(b"").is_empty());
    }

    #[test]
    fn should_decode_malformed_body_as_empty() {
        assert!(Values::decode(b"{not json").is_empty());
        assert!(Values::decode(&[0xff, 0xfe]).is_empty());
    }

    #[test]
    fn should_decode_non_object_body_as_empty() {
        assert!(Values::decode(b"[1,2,3]").is_empty());
        assert!(Values::decode(b"\"text\"").is_empty());
        assert!(Values::decode(b"null").is_empty());
    }

    #[test]
    fn should_remove_values() {
        let mut values = Values::decode(br#"{"id":7,"name":"fern"}"#);
        assert_eq!(values.remove("id"), Some(serde_json::json!(7)));
        assert_eq!(values.remove("id"), None);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn should_serialize_transparently() {
        let values: Values = [("a".to_string(), serde_json::json!(1))]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            serde_json::json!({"a": 1})
        );
    }
}
