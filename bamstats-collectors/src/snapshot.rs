use std::fmt::Display;
use std::ops::Index;

use serde::Serialize;
use serde_json::{Map, Value};

static MISSING: Value = Value::Null;

///
/// A point-in-time readout of every collector in a tree.
///
/// Fields keep the order in which collectors wrote them. Writing a key that is already present
/// replaces the earlier value, so when two collectors use the same name the one visited last wins.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    fields: Map<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Snapshot::default()
    }

    ///
    /// Set a field, returning the value it replaced.
    ///
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    ///
    /// Set a field to an object of `label -> count` pairs.
    ///
    pub fn insert_counts<K, I>(&mut self, key: &str, counts: I) -> Option<Value>
    where
        K: Display,
        I: IntoIterator<Item = (K, u64)>,
    {
        let object: Map<String, Value> = counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), Value::from(count)))
            .collect();
        self.insert(key, object)
    }

    ///
    /// Set a field to an object of `label -> fraction` pairs.
    ///
    pub fn insert_fractions<K, I>(&mut self, key: &str, fractions: I) -> Option<Value>
    where
        K: Display,
        I: IntoIterator<Item = (K, f64)>,
    {
        let object: Map<String, Value> = fractions
            .into_iter()
            .map(|(label, fraction)| (label.to_string(), Value::from(fraction)))
            .collect();
        self.insert(key, object)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Index<&str> for Snapshot {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&MISSING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_last_writer_wins() {
        let mut snapshot = Snapshot::new();
        assert_eq!(snapshot.insert("total_reads", 1u64), None);
        assert_eq!(snapshot.insert("total_reads", 7u64), Some(json!(1)));
        assert_eq!(snapshot.get_u64("total_reads"), Some(7));
        assert_eq!(snapshot.len(), 1);
    }

    #[rstest]
    fn test_preserves_insertion_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("zeta", 1u64);
        snapshot.insert("alpha", 2u64);

        let keys: Vec<&String> = snapshot.fields().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(serde_json::to_string(&snapshot).unwrap(), r#"{"zeta":1,"alpha":2}"#);
    }

    #[rstest]
    fn test_counts_and_fractions() {
        let mut snapshot = Snapshot::new();
        snapshot.insert_counts("mapq_hist", [(0, 3u64), (60, 5)]);
        snapshot.insert_fractions("coverage_hist", [(1u32, 0.25), (2, 0.75)]);

        assert_eq!(
            snapshot.into_value(),
            json!({
                "mapq_hist": {"0": 3, "60": 5},
                "coverage_hist": {"1": 0.25, "2": 0.75}
            })
        );
    }

    #[rstest]
    fn test_missing_key_indexes_to_null() {
        let snapshot = Snapshot::new();
        assert_eq!(snapshot["nothing"], Value::Null);
        assert_eq!(snapshot.is_empty(), true);
    }
}
