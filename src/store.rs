//! The in-memory key-value map. Values are opaque JSON; the store does not
//! interpret them beyond storing and returning them verbatim.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

/// Maximum key length in bytes, per the wire protocol.
pub const MAX_KEY_LEN: usize = 50;

/// Outcome of a `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Created,
    Replaced,
}

/// Outcome of a `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Clone, Debug, Default)]
pub struct Store(HashMap<String, JsonValue>);

impl Store {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn put(&mut self, key: String, value: JsonValue) -> PutOutcome {
        if self.0.insert(key, value).is_some() {
            PutOutcome::Replaced
        } else {
            PutOutcome::Created
        }
    }

    pub fn delete(&mut self, key: &str) -> DeleteOutcome {
        if self.0.remove(key).is_some() {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        }
    }

    /// Replaces the entire store, used by bootstrap state transfer.
    pub fn replace_all(&mut self, snapshot: HashMap<String, JsonValue>) {
        self.0 = snapshot;
    }

    pub fn snapshot(&self) -> HashMap<String, JsonValue> {
        self.0.clone()
    }
}

/// Validates a key per the wire protocol: non-empty is not required by the
/// spec, only the upper bound on length.
pub fn validate_key(key: &str) -> bool {
    key.len() <= MAX_KEY_LEN
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_reports_created_then_replaced() {
        let mut s = Store::new();
        assert_eq!(s.put("x".into(), json!("1")), PutOutcome::Created);
        assert_eq!(s.put("x".into(), json!("2")), PutOutcome::Replaced);
        assert_eq!(s.get("x"), Some(&json!("2")));
    }

    #[test]
    fn delete_reports_not_found_for_absent_key() {
        let mut s = Store::new();
        assert_eq!(s.delete("missing"), DeleteOutcome::NotFound);
    }

    #[test]
    fn delete_removes_existing_key() {
        let mut s = Store::new();
        s.put("x".into(), json!(1));
        assert_eq!(s.delete("x"), DeleteOutcome::Deleted);
        assert_eq!(s.get("x"), None);
    }

    #[test]
    fn key_length_boundary_is_fifty() {
        assert!(validate_key(&"a".repeat(50)));
        assert!(!validate_key(&"a".repeat(51)));
    }

    #[test]
    fn replace_all_overwrites_existing_entries() {
        let mut s = Store::new();
        s.put("x".into(), json!(1));
        let mut snapshot = HashMap::new();
        snapshot.insert("y".into(), json!(2));
        s.replace_all(snapshot);
        assert_eq!(s.get("x"), None);
        assert_eq!(s.get("y"), Some(&json!(2)));
    }
}
