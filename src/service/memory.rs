//! In-process tree service.
//!
//! Mirrors the observable behaviour of the HTTP service: new nodes are
//! appended as the last child, ids are handed out in increasing order, titles
//! that are not plain alphanumerics become `"Node"`, and the root cannot be
//! deleted. Used by `--offline` and by tests.

use super::{Avatar, AvatarUpload, NewNode, ServiceError, TreeService};
use crate::document::node::{Node, NodeId};
use crate::document::tree::NodeTree;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Mutex;

/// Title given to nodes whose requested title is rejected.
pub const FALLBACK_TITLE: &str = "Node";

struct Store {
    root: Node,
    next_id: i64,
    avatars: HashMap<NodeId, Avatar>,
}

/// Tree service that keeps its tree in memory.
pub struct InMemoryTreeService {
    store: Mutex<Store>,
}

impl InMemoryTreeService {
    /// Creates a service holding `tree`.
    ///
    /// New ids start above the largest integer id in the tree.
    ///
    /// # Panics
    ///
    /// Panics if `tree` is empty.
    pub fn new(tree: &NodeTree) -> Self {
        let root = tree
            .root()
            .cloned()
            .expect("in-memory service needs a non-empty tree");
        let next_id = tree
            .ids()
            .iter()
            .filter_map(|id| match id {
                NodeId::Int(n) => Some(*n),
                NodeId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            store: Mutex::new(Store {
                root,
                next_id,
                avatars: HashMap::new(),
            }),
        }
    }

    /// Returns a copy of the current tree.
    pub fn snapshot(&self) -> Node {
        self.lock().root.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        // Every edit is a single push or remove.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Applies the service's title rule: `[A-Za-z0-9]+` or the fallback title.
///
/// # Example
///
/// ```
/// use treequill::service::memory::normalize_title;
///
/// assert_eq!(normalize_title("Node42"), "Node42");
/// assert_eq!(normalize_title("two words"), "Node");
/// assert_eq!(normalize_title(""), "Node");
/// ```
pub fn normalize_title(title: &str) -> String {
    if !title.is_empty() && title.chars().all(|c| c.is_ascii_alphanumeric()) {
        title.to_string()
    } else {
        FALLBACK_TITLE.to_string()
    }
}

fn find_mut<'a>(node: &'a mut Node, id: &NodeId) -> Option<&'a mut Node> {
    if &node.id == id {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_mut(child, id))
}

fn remove_subtree(node: &mut Node, id: &NodeId, removed: &mut Vec<NodeId>) -> bool {
    if let Some(pos) = node.children.iter().position(|child| &child.id == id) {
        let child = node.children.remove(pos);
        collect(&child, removed);
        return true;
    }
    node.children
        .iter_mut()
        .any(|child| remove_subtree(child, id, removed))
}

fn collect(node: &Node, ids: &mut Vec<NodeId>) {
    ids.push(node.id.clone());
    for child in &node.children {
        collect(child, ids);
    }
}

impl TreeService for InMemoryTreeService {
    fn fetch_tree(&self) -> Result<Node, ServiceError> {
        Ok(self.snapshot())
    }

    fn add_node(&self, node: &NewNode) -> Result<Node, ServiceError> {
        let upload = match &node.avatar_file {
            Some(path) => Some(AvatarUpload::read(path)?),
            None => None,
        };

        let mut store = self.lock();
        let id = NodeId::Int(store.next_id);
        let title = normalize_title(&node.title);

        let parent = find_mut(&mut store.root, &node.parent_id).ok_or_else(|| {
            ServiceError::Rejected(format!("no node with id {}", node.parent_id))
        })?;
        let mut child = Node::new(id.clone(), title);
        if let Some(upload) = &upload {
            child.avatar = Some(upload.file_name.clone());
        }
        parent.children.push(child);

        store.next_id += 1;
        if let Some(upload) = upload {
            store.avatars.insert(
                id.clone(),
                Avatar {
                    kind: upload.kind,
                    bytes: upload.bytes,
                },
            );
        }
        info!("Added node {} under {}", id, node.parent_id);
        Ok(store.root.clone())
    }

    fn delete_node(&self, id: &NodeId) -> Result<Node, ServiceError> {
        let mut store = self.lock();
        if &store.root.id == id {
            return Err(ServiceError::Rejected("must not delete root node".to_string()));
        }

        let mut removed = Vec::new();
        if !remove_subtree(&mut store.root, id, &mut removed) {
            return Err(ServiceError::Rejected(format!("no node with id {}", id)));
        }
        for gone in &removed {
            store.avatars.remove(gone);
        }
        info!("Deleted node {} ({} nodes removed)", id, removed.len());
        Ok(store.root.clone())
    }

    fn fetch_avatar(&self, id: &NodeId) -> Result<Avatar, ServiceError> {
        let store = self.lock();
        match store.avatars.get(id) {
            Some(avatar) => Ok(avatar.clone()),
            None => {
                debug!("No avatar stored for node {}", id);
                Err(ServiceError::Rejected(format!("no avatar for node {}", id)))
            }
        }
    }
}
