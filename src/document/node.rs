//! Node representation for tree snapshots.
//!
//! A [`Node`] is the only entity in a tree: an id, a display title, an optional
//! avatar reference and an ordered list of children. Nodes are plain data; the
//! tree is only ever replaced wholesale by a new snapshot from the service, so
//! nothing here mutates a node in place.
//!
//! # Wire format
//!
//! The tree service encodes nodes with the field names `ID`, `Title`,
//! `ChildNodes` and (optionally) `Avatar`. Decoding also accepts the lower-case
//! spellings `id`, `title`, `childNodes` and `children`, and treats a `null` or
//! missing child list as "no children".
//!
//! # Example
//!
//! ```
//! use treequill::document::node::{Node, NodeId};
//!
//! let json = r#"{"ID": 1, "Title": "ROOT", "ChildNodes": null}"#;
//! let node: Node = serde_json::from_str(json).unwrap();
//! assert_eq!(node.id, NodeId::from(1));
//! assert_eq!(node.title, "ROOT");
//! assert!(node.children.is_empty());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a node, stable for the node's lifetime.
///
/// The service uses integer ids, but string ids are accepted as well so the
/// editor can talk to services that key nodes by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Integer id (the tree service's native form)
    Int(i64),
    /// String id
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{}", n),
            NodeId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Int(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        NodeId::Int(n.into())
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

/// A single node of the tree.
///
/// Children are kept in display order. The parent is implied by position in
/// the tree; there is no back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id across the whole tree
    #[serde(rename = "ID", alias = "id")]
    pub id: NodeId,

    /// Display text
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,

    /// Opaque reference to the node's avatar image, if any
    #[serde(
        rename = "Avatar",
        alias = "avatar",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<String>,

    /// Ordered children
    #[serde(
        rename = "ChildNodes",
        alias = "childNodes",
        alias = "children",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub children: Vec<Node>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Node>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Node {
    /// Creates a leaf node with no avatar.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::document::node::Node;
    ///
    /// let node = Node::new(3, "NODE 3");
    /// assert_eq!(node.title, "NODE 3");
    /// assert!(node.children.is_empty());
    /// ```
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            avatar: None,
            children: Vec::new(),
        }
    }

    /// Returns this node with the given children.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Returns this node with the given avatar reference.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Returns true if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
