//! Read-only access to a tree snapshot.
//!
//! [`NodeTree`] wraps the root [`Node`] of a snapshot together with the id the
//! application treats as the root. There are no mutation methods: a changed
//! tree arrives as a new snapshot and replaces the old one.
//!
//! # Example
//!
//! ```
//! use treequill::document::node::{Node, NodeId};
//! use treequill::document::tree::NodeTree;
//!
//! let tree = NodeTree::new(
//!     Node::new(0, "ROOT").with_children(vec![Node::new(1, "A")]),
//!     NodeId::from(0),
//! );
//!
//! let root = tree.root().unwrap();
//! assert!(tree.is_root(root));
//! assert_eq!(tree.children(root).len(), 1);
//! assert_eq!(tree.parent_of(&NodeId::from(1)).unwrap().id, NodeId::from(0));
//! ```

use super::node::{Node, NodeId};

/// A complete tree snapshot.
///
/// A snapshot may be empty. That is what the editor holds before the first
/// successful fetch, or after the initial fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTree {
    root: Option<Node>,
    root_id: NodeId,
}

impl NodeTree {
    /// Creates a snapshot from a root node.
    pub fn new(root: Node, root_id: NodeId) -> Self {
        Self {
            root: Some(root),
            root_id,
        }
    }

    /// Creates an empty snapshot.
    pub fn empty(root_id: NodeId) -> Self {
        Self {
            root: None,
            root_id,
        }
    }

    /// Returns the root node, if the snapshot is not empty.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Returns the id treated as the root id.
    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    /// Returns true if the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns true iff `node` carries the root id.
    pub fn is_root(&self, node: &Node) -> bool {
        node.id == self.root_id
    }

    /// Returns the children of `node` in display order.
    ///
    /// Never fails; a node without children yields an empty slice.
    pub fn children<'a>(&self, node: &'a Node) -> &'a [Node] {
        &node.children
    }

    /// Finds a node by id.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.iter().find(|node| &node.id == id)
    }

    /// Returns true if a node with the given id is in the snapshot.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Finds the parent of the node with the given id.
    ///
    /// Returns `None` for the root and for ids not in the snapshot.
    pub fn parent_of(&self, id: &NodeId) -> Option<&Node> {
        self.iter()
            .find(|node| node.children.iter().any(|child| &child.id == id))
    }

    /// Visits every node in pre-order.
    ///
    /// The walk keeps its own stack, so arbitrarily deep snapshots are safe.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            stack: self.root.iter().collect(),
        }
    }

    /// Returns all ids in pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|node| node.id.clone()).collect()
    }

    /// Returns the number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns the number of levels (0 for an empty snapshot, 1 for a lone root).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node, usize)> = self.root.iter().map(|root| (root, 1)).collect();
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }
}

/// Pre-order iterator over a snapshot, see [`NodeTree::iter`].
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
