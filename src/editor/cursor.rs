//! Selection tracking for the tree view.
//!
//! The cursor remembers both the selected row and the id of the node on that
//! row. Rows shift whenever a new snapshot arrives, so the id is what keeps the
//! selection on the same node across reloads.
//!
//! # Example
//!
//! ```
//! use treequill::editor::cursor::Cursor;
//! use treequill::document::node::NodeId;
//!
//! let mut cursor = Cursor::new();
//! assert_eq!(cursor.row(), 0);
//! assert!(cursor.selected().is_none());
//!
//! cursor.select(3, NodeId::from(7));
//! assert_eq!(cursor.row(), 3);
//! assert_eq!(cursor.selected(), Some(&NodeId::from(7)));
//! ```

use crate::document::node::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    row: usize,
    selected: Option<NodeId>,
}

impl Cursor {
    /// Creates a cursor on the first row with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Selects the node `id` shown on `row`.
    pub fn select(&mut self, row: usize, id: NodeId) {
        self.row = row;
        self.selected = Some(id);
    }

    /// Clears the selection (empty tree).
    pub fn clear(&mut self) {
        self.row = 0;
        self.selected = None;
    }
}
