//! Tagged tree values and deep merge.
//!
//! Merge rules, per key of the source map:
//! - sequence + sequence: concatenate, target items first, no dedup
//! - map + map: merge recursively
//! - anything else: the source value wins
//!
//! Merging takes both sides by value, so a branch can never be shared between
//! the accumulator and a fragment that is still referenced elsewhere.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A JSON-like tree value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Map(BTreeMap<String, Node>),
    Seq(Vec<Node>),
    Scalar(String),
}

impl Node {
    /// An empty map.
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Build a map from `(key, value)` pairs.
    pub fn from_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Child at `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::map()
    }
}

/// Merge `source` into `target` and return the result.
pub fn merge(target: Node, source: Node) -> Node {
    match (target, source) {
        (Node::Seq(mut items), Node::Seq(more)) => {
            items.extend(more);
            Node::Seq(items)
        }
        (Node::Map(mut map), Node::Map(incoming)) => {
            for (key, value) in incoming {
                let merged = match map.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                map.insert(key, merged);
            }
            Node::Map(map)
        }
        (_, source) => source,
    }
}

/// Merge `source` into the accumulator in place.
pub fn merge_into(target: &mut Node, source: Node) {
    let current = std::mem::take(target);
    *target = merge(current, source);
}
