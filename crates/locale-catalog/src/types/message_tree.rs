use std::collections::BTreeMap;
use std::fmt::{Formatter, Result as FmtResult};

use serde::de::{
    DeserializeSeed, Error as DeError, MapAccess, SeqAccess, Unexpected, Visitor,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The parsed contents of one locale file.
///
/// A tree is either a leaf message or a node mapping keys to subtrees. The
/// distinction is carried by the type, so a path naming a node can never be
/// mistaken for a message.
///
/// # Example
///
/// ```
/// use locale_catalog::MessageTree;
///
/// let tree: MessageTree = serde_json::from_str(r#"{"errors": {"not_found": "Missing"}}"#).unwrap();
/// assert_eq!(tree.walk(&["errors", "not_found"]).and_then(MessageTree::as_leaf), Some("Missing"));
/// assert!(tree.walk(&["errors"]).is_some_and(MessageTree::is_node));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTree {
    /// A message template.
    Leaf(String),
    /// A group of messages keyed by path segment.
    Node(BTreeMap<String, MessageTree>),
}

impl Default for MessageTree {
    fn default() -> Self {
        MessageTree::Node(BTreeMap::new())
    }
}

impl MessageTree {
    /// Returns an empty node, the contents of a freshly seeded catalog file.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the message text if this is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            MessageTree::Leaf(text) => Some(text.as_str()),
            MessageTree::Node(_) => None,
        }
    }

    /// Get the children if this is a node.
    pub fn as_node(&self) -> Option<&BTreeMap<String, MessageTree>> {
        match self {
            MessageTree::Node(children) => Some(children),
            MessageTree::Leaf(_) => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, MessageTree::Node(_))
    }

    /// Whether this value counts as a usable message.
    ///
    /// Empty leaves and empty nodes are treated exactly like missing keys, so
    /// that an untranslated entry falls through to the fallback locale.
    pub fn is_present(&self) -> bool {
        match self {
            MessageTree::Leaf(text) => !text.is_empty(),
            MessageTree::Node(children) => !children.is_empty(),
        }
    }

    /// Descend through nested nodes one segment at a time.
    ///
    /// Returns `None` as soon as a segment is missing or the walk reaches a
    /// leaf before the segments run out.
    pub fn walk<S: AsRef<str>>(&self, segments: &[S]) -> Option<&MessageTree> {
        let mut current = self;
        for segment in segments {
            let MessageTree::Node(children) = current else {
                return None;
            };
            current = children.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// Every leaf in the tree as `(dotted path, text)`, in key order.
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        collect_leaves(self, String::new(), &mut out);
        out
    }

    /// Dotted paths of all non-empty leaves.
    pub fn leaf_paths(&self) -> Vec<String> {
        self.leaves()
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(path, _)| path)
            .collect()
    }

    /// Number of non-empty leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            MessageTree::Leaf(text) => usize::from(!text.is_empty()),
            MessageTree::Node(children) => children.values().map(MessageTree::leaf_count).sum(),
        }
    }

    /// A copy of this tree with the same shape and every leaf blanked out.
    pub fn skeleton(&self) -> MessageTree {
        match self {
            MessageTree::Leaf(_) => MessageTree::Leaf(String::new()),
            MessageTree::Node(children) => MessageTree::Node(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.skeleton()))
                    .collect(),
            ),
        }
    }

    /// Copy every key from `other` that this tree does not have yet.
    ///
    /// Existing entries win, including leaves that sit where `other` has a node.
    pub fn merge_missing(&mut self, other: &MessageTree) {
        let (MessageTree::Node(ours), MessageTree::Node(theirs)) = (self, other) else {
            return;
        };
        for (key, their_child) in theirs {
            match ours.get_mut(key) {
                Some(our_child) => our_child.merge_missing(their_child),
                None => {
                    ours.insert(key.clone(), their_child.clone());
                }
            }
        }
    }
}

fn collect_leaves<'a>(tree: &'a MessageTree, prefix: String, out: &mut Vec<(String, &'a str)>) {
    match tree {
        MessageTree::Leaf(text) => out.push((prefix, text.as_str())),
        MessageTree::Node(children) => {
            for (key, child) in children {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(child, path, out);
            }
        }
    }
}

impl Serialize for MessageTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MessageTree::Leaf(text) => serializer.serialize_str(text),
            MessageTree::Node(children) => serializer.collect_map(children),
        }
    }
}

impl<'de> Deserialize<'de> for MessageTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        TreeSeed::default().deserialize(deserializer)
    }
}

/// The YAML merge key, `<<: *anchor`.
const MERGE_KEY: &str = "<<";

/// Deserializes a [`MessageTree`], optionally applying YAML merge keys.
///
/// Merged entries never replace keys written explicitly in the mapping, and
/// with a list of merge sources the earlier source wins. A key repeated in
/// the same mapping keeps its last value.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TreeSeed {
    pub(crate) merge_keys: bool,
}

impl<'de> DeserializeSeed<'de> for TreeSeed {
    type Value = MessageTree;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(TreeVisitor {
            merge_keys: self.merge_keys,
        })
    }
}

/// Accepts strings and mappings, and folds the other scalars translators
/// tend to write (numbers, booleans, empty values) into leaves.
///
/// `0`, `0.0` and `false` become empty leaves like `null`, so they fall
/// through to the fallback locale.
struct TreeVisitor {
    merge_keys: bool,
}

impl TreeVisitor {
    fn seed(&self) -> TreeSeed {
        TreeSeed {
            merge_keys: self.merge_keys,
        }
    }
}

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = MessageTree;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a message string or a mapping of messages")
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MessageTree::Leaf(v.to_string()))
    }

    fn visit_string<E: DeError>(self, v: String) -> Result<Self::Value, E> {
        Ok(MessageTree::Leaf(v))
    }

    fn visit_bool<E: DeError>(self, v: bool) -> Result<Self::Value, E> {
        Ok(scalar_leaf(v, v))
    }

    fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        Ok(scalar_leaf(v, v != 0))
    }

    fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        Ok(scalar_leaf(v, v != 0))
    }

    fn visit_f64<E: DeError>(self, v: f64) -> Result<Self::Value, E> {
        Ok(scalar_leaf(v, v != 0.0))
    }

    // `key:` with no value in YAML, or `null` in JSON: an untranslated entry.
    fn visit_unit<E: DeError>(self) -> Result<Self::Value, E> {
        Ok(MessageTree::Leaf(String::new()))
    }

    fn visit_none<E: DeError>(self) -> Result<Self::Value, E> {
        Ok(MessageTree::Leaf(String::new()))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.seed().deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(A::Error::invalid_type(Unexpected::Seq, &self))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut children = BTreeMap::new();
        let mut merged = Vec::new();
        while let Some(MessageKey(key)) = map.next_key::<MessageKey>()? {
            if self.merge_keys && key == MERGE_KEY {
                merged.extend(map.next_value_seed(MergeSeed)?);
            } else {
                let child = map.next_value_seed(self.seed())?;
                children.insert(key, child);
            }
        }
        for source in merged {
            for (key, child) in source {
                children.entry(key).or_insert(child);
            }
        }
        Ok(MessageTree::Node(children))
    }
}

fn scalar_leaf(value: impl ToString, truthy: bool) -> MessageTree {
    if truthy {
        MessageTree::Leaf(value.to_string())
    } else {
        MessageTree::Leaf(String::new())
    }
}

/// The value of a merge key: one mapping or a list of mappings.
struct MergeSeed;

impl<'de> DeserializeSeed<'de> for MergeSeed {
    type Value = Vec<BTreeMap<String, MessageTree>>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for MergeSeed {
    type Value = Vec<BTreeMap<String, MessageTree>>;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a mapping or a list of mappings to merge")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        match (TreeVisitor { merge_keys: true }).visit_map(map)? {
            MessageTree::Node(children) => Ok(vec![children]),
            MessageTree::Leaf(_) => Ok(Vec::new()),
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut sources = Vec::new();
        while let Some(source) = seq.next_element_seed(TreeSeed { merge_keys: true })? {
            match source {
                MessageTree::Node(children) => sources.push(children),
                MessageTree::Leaf(_) => {
                    return Err(A::Error::custom("merge list entries must be mappings"));
                }
            }
        }
        Ok(sources)
    }
}

/// A mapping key. YAML allows `1:` or `true:` as keys; they are addressed by
/// their textual form in message paths.
struct MessageKey(String);

impl<'de> Deserialize<'de> for MessageKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyVisitor)
    }
}

struct KeyVisitor;

impl Visitor<'_> for KeyVisitor {
    type Value = MessageKey;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a string, number or boolean key")
    }

    fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MessageKey(v.to_string()))
    }

    fn visit_string<E: DeError>(self, v: String) -> Result<Self::Value, E> {
        Ok(MessageKey(v))
    }

    fn visit_bool<E: DeError>(self, v: bool) -> Result<Self::Value, E> {
        Ok(MessageKey(v.to_string()))
    }

    fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
        Ok(MessageKey(v.to_string()))
    }

    fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
        Ok(MessageKey(v.to_string()))
    }

    fn visit_f64<E: DeError>(self, v: f64) -> Result<Self::Value, E> {
        Ok(MessageKey(v.to_string()))
    }
}
