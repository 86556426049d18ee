use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::value::Value;

/// Insertion-ordered string-keyed map of configuration values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    entries: IndexMap<String, Value>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_list)
    }

    pub fn get_node(&self, key: &str) -> Option<&ConfigNode> {
        self.get(key).and_then(Value::as_node)
    }

    /// Replaces an existing key in place, keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes `key` and closes the gap, so later keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Detach a child node. Missing keys and scalars both yield an empty node.
    pub fn take_node(&mut self, key: &str) -> ConfigNode {
        match self.remove(key) {
            Some(Value::Node(node)) => node,
            _ => ConfigNode::new(),
        }
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|name, _| keep(name));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Assign `value` at a dotted path, creating intermediate nodes. A scalar
    /// sitting where a node is needed is replaced by an empty node.
    pub fn insert_path(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut level = self;
        for segment in parents {
            if !matches!(level.get(segment), Some(Value::Node(_))) {
                level.insert(*segment, ConfigNode::new());
            }
            level = match level.get_mut(segment) {
                Some(Value::Node(node)) => node,
                _ => return,
            };
        }
        level.insert(*last, value);
    }

    /// Copy of `self` with every key of `child` written over it. Nested nodes
    /// are replaced wholesale.
    pub fn overridden_by(&self, child: &ConfigNode) -> ConfigNode {
        let mut merged = self.clone();
        for (key, value) in child.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut node = ConfigNode::new();
        for (key, value) in iter {
            node.insert(key, value);
        }
        node
    }
}

impl Serialize for ConfigNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
