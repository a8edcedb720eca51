use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One authenticated user session as issued by the remote service.
///
/// Only `session_id` is interpreted. Every other field (user identity, issue time, ...)
/// is carried through serialization unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self { session_id: session_id.into(), extra: Map::new() }
    }
    /// Attach an opaque field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
    /// Get an opaque field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
    /// Whether the record carries a usable identifier.
    pub fn is_valid(&self) -> bool {
        !self.session_id.is_empty()
    }
    pub(crate) fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidRecord(String::from("`session_id` must not be empty")))
        }
    }
    /// Parse a stored or received record, rejecting anything without a usable identifier.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value::<Self>(value).ok().filter(Self::is_valid)
    }
    /// Parse a serialized record, rejecting anything without a usable identifier.
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str::<Self>(s).ok().filter(Self::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn opaque_fields_are_preserved() {
        let value = json!({
            "session_id": "abc123",
            "user_id": "ahmad",
            "issued_at": 1718000000,
            "roles": ["admin"],
        });
        let record = SessionRecord::from_value(value.clone()).expect("valid record");
        assert_eq!(record.session_id, "abc123");
        assert_eq!(record.field("user_id"), Some(&json!("ahmad")));
        assert_eq!(serde_json::to_value(&record).expect("serialize"), value);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn unusable_records_are_rejected() {
        assert_eq!(SessionRecord::from_value(json!({"session_id": ""})), None);
        assert_eq!(SessionRecord::from_value(json!({"user_id": "ahmad"})), None);
        assert_eq!(SessionRecord::from_value(json!({"session_id": 42})), None);
        assert_eq!(SessionRecord::from_value(json!(["abc"])), None);
        assert_eq!(SessionRecord::from_json("{not json"), None);
        assert_eq!(SessionRecord::from_json("null"), None);
        assert!(SessionRecord::new("").ensure_valid().is_err());
        assert!(SessionRecord::new("x").ensure_valid().is_ok());
    }
}
