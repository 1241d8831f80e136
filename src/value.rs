//! Tree representation of compound values.
//!
//! This module provides [`Node`], the ordered list of [`Entry`] values that
//! a compound value parses into, and [`NodeRef`], a borrowed view that knows
//! its parent and therefore its depth.
//!
//! ## Core Types
//!
//! - [`Entry`]: one slot of a node, either a text scalar, null, or a nested group
//! - [`Node`]: an ordered sequence of entries; the root of a parsed value
//! - [`NodeRef`]: a node plus a non-owning link to the view it was reached from
//!
//! ## Usage Patterns
//!
//! ### Building Values
//!
//! ```rust
//! use compound_value::{Entry, Node};
//!
//! let mut node = Node::new();
//! node.add("1");
//! node.add(Node::from_iter(["2", "3"]));
//! node.set_value(3, "4");
//!
//! assert_eq!(node.len(), 4);
//! assert_eq!(node.get_value(2), Some(&Entry::Null));
//! assert_eq!(node.to_string(), "1,(2,3),,4");
//! ```
//!
//! ### Walking Values
//!
//! ```rust
//! use compound_value::from_str;
//!
//! let node = from_str("1,2,(3,4),5").unwrap();
//! let root = node.view();
//! let child = root.child(2).unwrap();
//!
//! assert_eq!(child.depth(), 1);
//! assert_eq!(child.get_str(0), Some("3"));
//! assert!(child.parent().is_some());
//! ```

use crate::{options::FormatOptions, ser, Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// One slot of a [`Node`].
///
/// # Examples
///
/// ```rust
/// use compound_value::{Entry, Node};
///
/// let scalar = Entry::from("text");
/// let null = Entry::Null;
/// let group = Entry::from(Node::from_iter(["a", "b"]));
///
/// assert_eq!(scalar.as_str(), Some("text"));
/// assert!(null.is_null());
/// assert_eq!(group.as_node().map(Node::len), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Entry {
    #[default]
    Null,
    Scalar(String),
    Group(Node),
}

impl Entry {
    /// Returns `true` if the entry is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Entry::Null)
    }

    /// Returns `true` if the entry is a text scalar.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Entry::Scalar(_))
    }

    /// Returns `true` if the entry is a nested group.
    #[inline]
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Entry::Group(_))
    }

    /// If the entry is a scalar, returns its text. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Entry::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// If the entry is a group, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Entry::Group(node) => Some(node),
            _ => None,
        }
    }

    /// If the entry is a group, returns a mutable reference to it.
    #[inline]
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Entry::Group(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        ser::write_entry(&mut out, self);
        f.write_str(&out)
    }
}

/// An ordered list of entries: the tree form of a compound value.
///
/// A `Node` owns its children; nested groups are stored inline as
/// [`Entry::Group`]. Use [`Node::view`] to walk the tree with parent links.
///
/// # Examples
///
/// ```rust
/// use compound_value::{from_str, Entry, Node};
///
/// let node = from_str("\"a,b\",c").unwrap();
/// assert_eq!(node, Node::from_iter(["a,b", "c"]));
/// assert_eq!(node.to_string(), "\"a,b\",c");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Node {
    values: Vec<Entry>,
}

impl Node {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Node { values: Vec::new() }
    }

    /// Creates an empty node with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Node {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the node has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the entries as a slice.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Entry] {
        &self.values
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.values.iter()
    }

    /// Returns the entry at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn get_value(&self, index: usize) -> Option<&Entry> {
        self.values.get(index)
    }

    /// Returns a mutable reference to the entry at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.values.get_mut(index)
    }

    /// Returns the scalar text at `index`, or `None` if the slot is missing,
    /// null, or a group.
    #[inline]
    #[must_use]
    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(Entry::as_str)
    }

    /// Returns the nested group at `index`, if there is one.
    #[inline]
    #[must_use]
    pub fn get_node(&self, index: usize) -> Option<&Node> {
        self.values.get(index).and_then(Entry::as_node)
    }

    /// Appends an entry.
    pub fn add(&mut self, value: impl Into<Entry>) {
        self.values.push(value.into());
    }

    /// Replaces the entry at `index`, padding with [`Entry::Null`] when the
    /// node is shorter than that.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::{Entry, Node};
    ///
    /// let mut node = Node::new();
    /// node.set_value(2, "c");
    /// assert_eq!(node.values(), &[Entry::Null, Entry::Null, Entry::from("c")]);
    /// ```
    pub fn set_value(&mut self, index: usize, value: impl Into<Entry>) {
        if index >= self.values.len() {
            self.values.resize_with(index + 1, Entry::default);
        }
        self.values[index] = value.into();
    }

    /// Adds a value, optionally at a fixed slot.
    ///
    /// Without an index the value is appended. With an index, an empty or
    /// missing slot receives the value directly; a slot holding a scalar is
    /// turned into a group holding the old scalar followed by the new value;
    /// a slot already holding a group gets the value appended to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::Node;
    ///
    /// let mut node = Node::new();
    /// node.add_value("home", Some(1));
    /// node.add_value("work", Some(1));
    /// node.add_value("cell", Some(1));
    /// assert_eq!(node.to_string(), ",(home,work,cell)");
    /// ```
    pub fn add_value(&mut self, value: impl Into<Entry>, index: Option<usize>) {
        let value = value.into();
        let Some(index) = index else {
            self.values.push(value);
            return;
        };

        match self.values.get_mut(index) {
            None | Some(Entry::Null) => self.set_value(index, value),
            Some(Entry::Group(group)) => group.add(value),
            Some(slot @ Entry::Scalar(_)) => {
                let previous = std::mem::take(slot);
                let mut group = Node::with_capacity(2);
                group.add(previous);
                group.add(value);
                *slot = Entry::Group(group);
            }
        }
    }

    /// Returns a root view of this node for parent-aware traversal.
    #[must_use]
    pub fn view(&self) -> NodeRef<'_> {
        NodeRef {
            node: self,
            parent: None,
        }
    }

    /// Iterates over every scalar leaf, depth first, skipping nulls.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::from_str;
    ///
    /// let node = from_str("a,(b,(c)),d").unwrap();
    /// let leaves: Vec<_> = node.leaves().collect();
    /// assert_eq!(leaves, ["a", "b", "c", "d"]);
    /// ```
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![self.values.iter()],
        }
    }

    /// Returns the deepest nesting level below this node (0 for a flat list).
    #[must_use]
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(
                node.values
                    .iter()
                    .filter_map(Entry::as_node)
                    .map(|child| (child, depth + 1)),
            );
        }
        deepest
    }

    /// Rebuilds the tree, passing every scalar through `f`.
    ///
    /// Nulls and the shape of the tree are preserved. The first error stops
    /// the rebuild.
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` returns.
    pub fn try_map_scalars<E, F>(&self, mut f: F) -> std::result::Result<Node, E>
    where
        F: FnMut(&str) -> std::result::Result<String, E>,
    {
        self.try_map_with(&mut f)
    }

    fn try_map_with<E, F>(&self, f: &mut F) -> std::result::Result<Node, E>
    where
        F: FnMut(&str) -> std::result::Result<String, E>,
    {
        let mut mapped = Node::with_capacity(self.values.len());
        for entry in &self.values {
            mapped.values.push(match entry {
                Entry::Null => Entry::Null,
                Entry::Scalar(s) => Entry::Scalar(f(s)?),
                Entry::Group(child) => Entry::Group(child.try_map_with(f)?),
            });
        }
        Ok(mapped)
    }

    /// Serializes to the display form described by `options`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use compound_value::{from_str, FormatOptions};
    ///
    /// let node = from_str("a,,b").unwrap();
    /// assert_eq!(node.to_formatted_string(&FormatOptions::default()), "a b");
    /// ```
    #[must_use]
    pub fn to_formatted_string(&self, options: &FormatOptions) -> String {
        ser::to_formatted_string(self, options)
    }
}

impl Drop for Node {
    // Nested groups are moved onto a work list so that dropping a deep tree
    // never recurses once per level.
    fn drop(&mut self) {
        let mut pending: Vec<Node> = self.values.iter_mut().filter_map(take_group).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.values.iter_mut().filter_map(take_group));
        }
    }
}

fn take_group(entry: &mut Entry) -> Option<Node> {
    match entry {
        Entry::Group(node) if !node.values.is_empty() => Some(std::mem::take(node)),
        _ => None,
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ser::to_string(self))
    }
}

impl FromStr for Node {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::de::from_str(s)
    }
}

/// Depth-first iterator over the scalar leaves of a [`Node`].
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, Entry>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.stack.last_mut()?.next() {
                Some(entry) => entry,
                None => {
                    self.stack.pop();
                    continue;
                }
            };
            match entry {
                Entry::Scalar(s) => return Some(s),
                Entry::Group(child) => self.stack.push(child.values.iter()),
                Entry::Null => {}
            }
        }
    }
}

/// A borrowed view of a [`Node`] that remembers the view it was reached from.
///
/// The parent link never owns anything; it only lets a view report its
/// depth and walk back up.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    node: &'a Node,
    parent: Option<&'a NodeRef<'a>>,
}

impl<'a> NodeRef<'a> {
    /// The node this view points at.
    #[must_use]
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// The view this one was reached from, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<&'a NodeRef<'a>> {
        self.parent
    }

    /// Number of parent links up to the root (the root has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent, |view| view.parent).count()
    }

    /// Returns `true` if this view has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns a view of the group at `index`, with this view as its parent.
    #[must_use]
    pub fn child<'b>(&'b self, index: usize) -> Option<NodeRef<'b>> {
        self.node.get_node(index).map(|node| NodeRef {
            node,
            parent: Some(self),
        })
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Node {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(mut self) -> Self::IntoIter {
        std::mem::take(&mut self.values).into_iter()
    }
}

impl<T: Into<Entry>> FromIterator<T> for Node {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Node {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Into<Entry>> Extend<T> for Node {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.values.extend(iter.into_iter().map(Into::into));
    }
}

impl From<Vec<Entry>> for Node {
    fn from(values: Vec<Entry>) -> Self {
        Node { values }
    }
}

impl From<Node> for Vec<Entry> {
    fn from(mut node: Node) -> Self {
        std::mem::take(&mut node.values)
    }
}

// From implementations for creating entries
impl From<String> for Entry {
    fn from(value: String) -> Self {
        Entry::Scalar(value)
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Entry::Scalar(value.to_string())
    }
}

impl From<Node> for Entry {
    fn from(value: Node) -> Self {
        Entry::Group(value)
    }
}

impl<T: Into<Entry>> From<Option<T>> for Entry {
    fn from(value: Option<T>) -> Self {
        value.map_or(Entry::Null, Into::into)
    }
}

impl<T: Into<Entry>> From<Vec<T>> for Entry {
    fn from(value: Vec<T>) -> Self {
        Entry::Group(value.into_iter().collect())
    }
}

impl TryFrom<Entry> for String {
    type Error = Error;

    fn try_from(value: Entry) -> Result<Self> {
        match value {
            Entry::Scalar(s) => Ok(s),
            other => Err(Error::custom(format!("expected scalar, found {:?}", other))),
        }
    }
}

impl TryFrom<Entry> for Node {
    type Error = Error;

    fn try_from(value: Entry) -> Result<Self> {
        match value {
            Entry::Group(node) => Ok(node),
            other => Err(Error::custom(format!("expected group, found {:?}", other))),
        }
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Entry::Null => serializer.serialize_unit(),
            Entry::Scalar(s) => serializer.serialize_str(s),
            Entry::Group(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for entry in &self.values {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = Entry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, null, or a sequence of entries")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Entry::Scalar(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Entry::Scalar(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Entry::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Entry::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut node = Node::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element()? {
                    node.values.push(entry);
                }
                Ok(Entry::Group(node))
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

impl<'de> Deserialize<'de> for Node {
    /// Accepts either a sequence of entries or the canonical text form.
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of entries or a compound value string")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                crate::de::from_str(value).map_err(E::custom)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut node = Node::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(entry) = seq.next_element()? {
                    node.values.push(entry);
                }
                Ok(node)
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}
