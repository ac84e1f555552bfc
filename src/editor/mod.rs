//! Editor state and mode management.
//!
//! This module provides the controller of the tree editor: the mode state
//! machine, cursor tracking, the create-node form and the editor state that
//! ties them to the current snapshot.
//!
//! # Modules
//!
//! - `mode`: Editor mode enumeration and transitions
//! - `cursor`: Selected line, tracked by node id
//! - `sidebar`: The create-node form
//! - `state`: Editor state management (snapshot, mode, outbox, reconciliation)
//!
//! # Example
//!
//! ```
//! use treequill::editor::mode::EditorMode;
//!
//! // Editor starts idle
//! let mode = EditorMode::default();
//! assert_eq!(mode, EditorMode::Idle);
//! ```

pub mod cursor;
pub mod mode;
pub mod sidebar;
pub mod state;
