//! Controller state machine.
//!
//! The editor is always in exactly one [`EditorMode`]. Only `Idle` accepts
//! add/delete intents; every other mode disables the tree's controls, so at
//! most one mutating request is outstanding at a time.
//!
//! ```text
//! Idle --add(parent)--> AwaitingInput --submit--> AwaitingCreate --done--> Idle
//!                          |
//!                          +--cancel--> Idle
//! Idle --delete(id)--> AwaitingDelete --done--> Idle
//! Idle --reload--> Loading --done--> Idle
//! ```
//!
//! # Example
//!
//! ```
//! use treequill::editor::mode::EditorMode;
//!
//! let mode = EditorMode::default();
//! assert_eq!(mode, EditorMode::Idle);
//! assert!(!mode.controls_disabled());
//! assert_eq!(format!("{}", mode), "IDLE");
//! ```

use crate::document::node::NodeId;
use crate::worker::RequestId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// No operation in progress; controls are live.
    #[default]
    Idle,
    /// Fetching the whole tree (startup or manual reload).
    Loading { request: RequestId },
    /// Sidebar open, collecting the title and avatar for a new child.
    AwaitingInput { parent_id: NodeId },
    /// Create request in flight.
    AwaitingCreate {
        parent_id: NodeId,
        request: RequestId,
    },
    /// Delete request in flight.
    AwaitingDelete {
        id: NodeId,
        parent_id: Option<NodeId>,
        request: RequestId,
    },
}

impl EditorMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorMode::Idle)
    }

    /// True whenever add/delete controls must be rendered disabled.
    pub fn controls_disabled(&self) -> bool {
        !self.is_idle()
    }

    /// True while the sidebar is collecting input.
    pub fn shows_sidebar(&self) -> bool {
        matches!(self, EditorMode::AwaitingInput { .. })
    }

    /// The request this mode is waiting on, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        match self {
            EditorMode::Loading { request }
            | EditorMode::AwaitingCreate { request, .. }
            | EditorMode::AwaitingDelete { request, .. } => Some(*request),
            EditorMode::Idle | EditorMode::AwaitingInput { .. } => None,
        }
    }
}

impl fmt::Display for EditorMode {
    /// Formats the mode for the status line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorMode::Idle => write!(f, "IDLE"),
            EditorMode::Loading { .. } => write!(f, "LOADING"),
            EditorMode::AwaitingInput { .. } => write!(f, "INPUT"),
            EditorMode::AwaitingCreate { .. } => write!(f, "CREATING"),
            EditorMode::AwaitingDelete { .. } => write!(f, "DELETING"),
        }
    }
}
