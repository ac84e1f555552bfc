//! Bundled sample tree used when running without a service.

use super::node::{Node, NodeId};
use super::tree::NodeTree;

/// Root id of the sample tree.
pub const SAMPLE_ROOT_ID: i64 = 0;

/// Returns the sample tree: a root with three branches, seven nodes below it.
///
/// # Example
///
/// ```
/// use treequill::document::sample::sample_tree;
///
/// let tree = sample_tree();
/// assert_eq!(tree.len(), 8);
/// assert_eq!(tree.root().unwrap().title, "ROOT");
/// ```
pub fn sample_tree() -> NodeTree {
    let root = Node::new(SAMPLE_ROOT_ID, "ROOT").with_children(vec![
        Node::new(1, "NODE 1").with_children(vec![Node::new(3, "NODE 3"), Node::new(4, "NODE 4")]),
        Node::new(2, "NODE 2").with_children(vec![
            Node::new(5, "NODE 5").with_children(vec![Node::new(7, "NODE 7")])
        ]),
        Node::new(6, "NODE 6"),
    ]);
    NodeTree::new(root, NodeId::from(SAMPLE_ROOT_ID))
}
