//! Per-node avatar handles.
//!
//! An avatar is requested the first time its node is displayed. The handle
//! lives as long as the node is in the snapshot and is released when a new
//! snapshot no longer contains the node. A failed load is remembered (so it is
//! not retried on every redraw) and displayed as "no avatar".

use crate::document::node::NodeId;
use crate::service::{Avatar, ImageKind, ServiceError};
use crate::worker::RequestId;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
enum Slot {
    Pending(RequestId),
    Ready(Avatar),
    Failed,
}

/// What the view shows in a node's avatar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarView {
    /// No avatar (not requested, or the load failed)
    Absent,
    /// Load in flight
    Loading,
    /// Loaded image
    Ready { kind: ImageKind, size: usize },
}

#[derive(Debug, Default)]
pub struct AvatarCache {
    slots: HashMap<NodeId, Slot>,
}

impl AvatarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing has been requested yet for `id`.
    pub fn needs_fetch(&self, id: &NodeId) -> bool {
        !self.slots.contains_key(id)
    }

    /// Records that `request` is loading the avatar of `id`.
    pub fn mark_pending(&mut self, id: NodeId, request: RequestId) {
        self.slots.insert(id, Slot::Pending(request));
    }

    /// Stores the result of an avatar load.
    ///
    /// Returns false (and changes nothing) if the node was released or a
    /// different request owns its slot.
    pub fn resolve(
        &mut self,
        request: RequestId,
        id: &NodeId,
        result: Result<Avatar, ServiceError>,
    ) -> bool {
        match self.slots.get(id) {
            Some(Slot::Pending(pending)) if *pending == request => {}
            _ => {
                debug!("Dropping avatar response {} for node {}", request, id);
                return false;
            }
        }

        let slot = match result {
            Ok(avatar) => Slot::Ready(avatar),
            Err(err) => {
                warn!("Failed to load avatar for node {}: {}", id, err);
                Slot::Failed
            }
        };
        self.slots.insert(id.clone(), slot);
        true
    }

    /// Releases handles for nodes that are no longer mounted.
    pub fn retain(&mut self, mounted: &HashSet<NodeId>) {
        self.slots.retain(|id, _| mounted.contains(id));
    }

    pub fn view(&self, id: &NodeId) -> AvatarView {
        match self.slots.get(id) {
            Some(Slot::Pending(_)) => AvatarView::Loading,
            Some(Slot::Ready(avatar)) => AvatarView::Ready {
                kind: avatar.kind,
                size: avatar.len(),
            },
            Some(Slot::Failed) | None => AvatarView::Absent,
        }
    }

    /// Number of nodes holding a handle (pending, loaded or failed).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
