use std::collections::HashMap;

use crate::value::Value;

// -----------------------------------------------------------------------------
// OrderedMap

/// A string-keyed map that remembers insertion order.
///
/// Entries live in a vector in first-insertion order with a name → position
/// index on the side, so iteration order is deterministic and lookups stay
/// O(1). Re-inserting an existing key replaces the value in place without
/// moving the entry.
///
/// # Examples
///
/// ```
/// use jsonmap::{OrderedMap, Value};
///
/// let mut map = OrderedMap::new();
/// map.insert("b".to_owned(), Value::from(1));
/// map.insert("a".to_owned(), Value::from(2));
/// map.insert("b".to_owned(), Value::from(3));
///
/// let keys: Vec<_> = map.keys().collect();
/// assert_eq!(keys, ["b", "a"]);
/// assert_eq!(map.get("b"), Some(&Value::from(3)));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrderedMap {
    entries: Vec<(String, Value)>,
    indices: HashMap<String, usize>,
}

impl OrderedMap {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashMap::with_capacity(capacity),
        }
    }

    /// The number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.indices.contains_key(key)
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.indices.get(key).map(|&i| &self.entries[i].1)
    }

    /// Inserts `value` under `key`, returning the previous value if the key
    /// was already present. Existing entries keep their position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        match self.indices.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.indices.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl FromIterator<(String, Value)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("z".into(), Value::from(1));
        map.insert("a".into(), Value::from(2));
        map.insert("m".into(), Value::from(3));

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn replace_keeps_position_and_returns_old() {
        let mut map = OrderedMap::new();
        map.insert("a".into(), Value::from(1));
        map.insert("b".into(), Value::from(2));

        let old = map.insert("a".into(), Value::from(9));
        assert_eq!(old, Some(Value::from(1)));

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::from(9)));
    }

    #[test]
    fn missing_key() {
        let map = OrderedMap::new();
        assert!(map.get("nope").is_none());
        assert!(!map.contains_key("nope"));
        assert!(map.is_empty());
    }
}
