//! Persistence filtering by allow-list and deny-list.

use crate::types::State;
use std::collections::HashSet;

/// Decides which state keys are written to storage.
///
/// Deny-listed keys are always dropped. A non-empty allow-list is
/// exclusive: only listed keys survive.
#[derive(Clone, Debug, Default)]
pub struct PersistFilter {
    whitelist: HashSet<String>,
    blacklist: HashSet<String>,
}

impl PersistFilter {
    pub fn new<W, B>(whitelist: W, blacklist: B) -> Self
    where
        W: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
    {
        Self {
            whitelist: whitelist.into_iter().collect(),
            blacklist: blacklist.into_iter().collect(),
        }
    }

    /// Whether `key` is persisted.
    pub fn keeps(&self, key: &str) -> bool {
        if self.blacklist.contains(key) {
            return false;
        }
        self.whitelist.is_empty() || self.whitelist.contains(key)
    }

    /// Shallow copy of `state` holding only persisted keys.
    pub fn apply(&self, state: &State) -> State {
        state
            .iter()
            .filter(|(key, _)| self.keeps(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::into_partial;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn persisted(filter: &PersistFilter, value: Value) -> String {
        let state = into_partial(value).unwrap();
        serde_json::to_string(&filter.apply(&state)).unwrap()
    }

    #[test]
    fn test_no_lists_keeps_everything() {
        let filter = PersistFilter::default();
        assert_eq!(persisted(&filter, json!({"a": 1, "b": 2})), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_blacklist_subtracts() {
        let filter = PersistFilter::new(Vec::new(), strings(&["b"]));
        assert_eq!(persisted(&filter, json!({"a": 1, "b": 2})), r#"{"a":1}"#);
    }

    #[test]
    fn test_whitelist_is_exclusive() {
        let filter = PersistFilter::new(strings(&["a"]), Vec::new());
        assert_eq!(persisted(&filter, json!({"a": 1, "b": 2})), r#"{"a":1}"#);

        let filter = PersistFilter::new(strings(&["a"]), strings(&["c"]));
        assert_eq!(persisted(&filter, json!({"a": 1, "b": 2})), r#"{"a":1}"#);
    }

    #[test]
    fn test_key_in_both_lists_is_dropped() {
        let filter = PersistFilter::new(strings(&["a", "b"]), strings(&["b"]));
        assert_eq!(persisted(&filter, json!({"a": 1, "b": 2})), r#"{"a":1}"#);
    }

    proptest! {
        #[test]
        fn prop_filter_output_is_subset(
            keys in prop::collection::vec("[a-f]", 0..6),
            whitelist in prop::collection::vec("[a-f]", 0..3),
            blacklist in prop::collection::vec("[a-f]", 0..3),
        ) {
            let state: State = keys.iter().map(|k| (k.clone(), json!(1))).collect();
            let filter = PersistFilter::new(whitelist.clone(), blacklist.clone());
            let kept = filter.apply(&state);

            for key in kept.keys() {
                prop_assert!(state.contains_key(key));
                prop_assert!(!blacklist.contains(key));
                prop_assert!(whitelist.is_empty() || whitelist.contains(key));
            }
            for key in state.keys() {
                if filter.keeps(key) {
                    prop_assert!(kept.contains_key(key));
                }
            }
        }
    }
}
