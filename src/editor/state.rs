//! Editor state management.
//!
//! This module provides the `EditorState` struct, the controller that owns the
//! current tree snapshot and drives the add/delete state machine described in
//! [`EditorMode`](super::mode::EditorMode).
//!
//! `EditorState` never performs I/O. Service calls are queued as
//! [`Request`]s in an outbox which the event loop drains and hands to the
//! [`Worker`](crate::worker::Worker). Finished calls come back through
//! [`EditorState::complete`], which replaces the snapshot wholesale on success
//! and keeps it on failure.
//!
//! # State Components
//!
//! - **Tree**: The current snapshot, replaced by every successful response
//! - **Mode**: Which operation, if any, is in progress
//! - **Cursor**: The selected line, tracked by node id
//! - **Avatars**: Per-node avatar handles for the mounted nodes
//! - **Sidebar**: The create-node form
//!
//! # Example
//!
//! ```
//! use treequill::document::sample::sample_tree;
//! use treequill::document::node::NodeId;
//! use treequill::editor::mode::EditorMode;
//! use treequill::editor::state::EditorState;
//! use treequill::worker::Job;
//!
//! let mut state = EditorState::new(sample_tree());
//! assert_eq!(state.mode(), &EditorMode::Idle);
//!
//! // Adding opens the sidebar; nothing is sent until it is submitted.
//! assert!(state.request_add(NodeId::from(5)));
//! assert!(state.mode().shows_sidebar());
//! assert!(state.drain_requests().is_empty());
//!
//! for ch in "Leaf".chars() {
//!     state.sidebar_mut().insert(ch);
//! }
//! assert!(state.submit_sidebar());
//! let requests = state.drain_requests();
//! assert!(matches!(&requests[0].job, Job::Create(node) if node.title == "Leaf"));
//! ```

use super::cursor::Cursor;
use super::mode::EditorMode;
use super::sidebar::SidebarForm;
use crate::document::node::NodeId;
use crate::document::tree::NodeTree;
use crate::service::NewNode;
use crate::ui::avatar::AvatarCache;
use crate::ui::tree_view::{Dispatch, Intent, TreeViewLine, TreeViewState, ViewContext};
use crate::worker::{Job, Outcome, Request, RequestId, Response};
use log::{debug, error, info, warn};
use std::collections::HashSet;

/// Default number of levels rendered before the view stops descending.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Manages the complete runtime state of the editor.
pub struct EditorState {
    tree: NodeTree,
    mode: EditorMode,
    cursor: Cursor,
    tree_view: TreeViewState,
    avatars: AvatarCache,
    sidebar: SidebarForm,
    outbox: Vec<Request>,
    next_request: u64,
    show_help: bool,
    scroll_offset: usize,
    viewport_height: usize,
    viewport_width: usize,
    load_avatars: bool,
    enable_mouse: bool,
    max_depth: usize,
    // Where the cursor goes if the selected node vanishes after a delete
    fallback_selection: Option<NodeId>,
    source_label: String,
}

impl EditorState {
    /// Creates a new editor state showing `tree`.
    ///
    /// The editor starts `Idle` with the cursor on the first line. Avatars are
    /// not loaded until [`set_load_avatars`](Self::set_load_avatars) enables them.
    ///
    /// # Examples
    ///
    /// ```
    /// use treequill::document::sample::sample_tree;
    /// use treequill::editor::state::EditorState;
    ///
    /// let state = EditorState::new(sample_tree());
    /// assert_eq!(state.tree_view().lines().len(), 8);
    /// assert_eq!(state.cursor().row(), 0);
    /// ```
    pub fn new(tree: NodeTree) -> Self {
        let mut state = Self {
            tree,
            mode: EditorMode::Idle,
            cursor: Cursor::new(),
            tree_view: TreeViewState::new(),
            avatars: AvatarCache::new(),
            sidebar: SidebarForm::default(),
            outbox: Vec::new(),
            next_request: 1,
            show_help: false,
            scroll_offset: 0,
            viewport_height: 20,
            viewport_width: usize::MAX,
            load_avatars: false,
            enable_mouse: true,
            max_depth: DEFAULT_MAX_DEPTH,
            fallback_selection: None,
            source_label: String::new(),
        };
        state.rebuild_view();
        state
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn tree_view(&self) -> &TreeViewState {
        &self.tree_view
    }

    pub fn avatars(&self) -> &AvatarCache {
        &self.avatars
    }

    pub fn sidebar(&self) -> &SidebarForm {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut SidebarForm {
        &mut self.sidebar
    }

    /// Enables or disables avatar loading for displayed nodes.
    pub fn set_load_avatars(&mut self, enabled: bool) {
        self.load_avatars = enabled;
        self.rebuild_view();
    }

    pub fn load_avatars(&self) -> bool {
        self.load_avatars
    }

    pub fn set_enable_mouse(&mut self, enabled: bool) {
        self.enable_mouse = enabled;
    }

    pub fn enable_mouse(&self) -> bool {
        self.enable_mouse
    }

    /// Sets the depth limit of the view (at least one level is always shown).
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.rebuild_view();
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the label shown in the status line for where the tree comes from.
    pub fn set_source_label(&mut self, label: impl Into<String>) {
        self.source_label = label.into();
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn hide_help(&mut self) {
        self.show_help = false;
    }

    /// Takes all queued requests, oldest first.
    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Number of requests waiting to be drained.
    pub fn queued_requests(&self) -> usize {
        self.outbox.len()
    }

    fn queue(&mut self, job: Job) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        debug!("Queued request {}: {:?}", id, job);
        self.outbox.push(Request { id, job });
        id
    }

    fn set_mode(&mut self, mode: EditorMode) {
        debug!("Mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.rebuild_view();
    }

    /// Starts a fetch of the whole tree.
    ///
    /// Only valid while `Idle`. The controls stay disabled until the response
    /// arrives.
    pub fn load_tree(&mut self) -> Option<RequestId> {
        if !self.mode.is_idle() {
            debug!("Ignoring reload while {}", self.mode);
            return None;
        }
        let request = self.queue(Job::FetchTree);
        info!("Loading tree ({})", request);
        self.set_mode(EditorMode::Loading { request });
        Some(request)
    }

    /// Opens the sidebar to collect a new child of `parent_id`.
    ///
    /// Returns false (and changes nothing) unless the editor is `Idle` and the
    /// parent is in the current snapshot.
    pub fn request_add(&mut self, parent_id: NodeId) -> bool {
        if !self.mode.is_idle() {
            debug!("Ignoring add under {} while {}", parent_id, self.mode);
            return false;
        }
        if !self.tree.contains(&parent_id) {
            warn!("Cannot add under unknown node {}", parent_id);
            return false;
        }
        self.sidebar.reset();
        self.set_mode(EditorMode::AwaitingInput { parent_id });
        true
    }

    /// Sends the sidebar's contents as a create request.
    pub fn submit_sidebar(&mut self) -> bool {
        let parent_id = match &self.mode {
            EditorMode::AwaitingInput { parent_id } => parent_id.clone(),
            _ => return false,
        };

        let node = NewNode {
            parent_id: parent_id.clone(),
            title: self.sidebar.title().text().to_string(),
            avatar_file: self.sidebar.avatar_path(),
        };
        info!(
            "Creating {:?} under {} (avatar: {})",
            node.title,
            parent_id,
            node.avatar_file.is_some()
        );
        let request = self.queue(Job::Create(node));
        self.sidebar.reset();
        self.set_mode(EditorMode::AwaitingCreate { parent_id, request });
        true
    }

    /// Closes the sidebar without sending anything.
    pub fn cancel_sidebar(&mut self) -> bool {
        if !self.mode.shows_sidebar() {
            return false;
        }
        self.sidebar.reset();
        self.set_mode(EditorMode::Idle);
        true
    }

    /// Sends a delete request for `id`.
    ///
    /// Returns false unless the editor is `Idle`, `id` is in the snapshot, and
    /// `id` is not the root.
    pub fn request_delete(&mut self, parent_id: Option<NodeId>, id: NodeId) -> bool {
        if !self.mode.is_idle() {
            debug!("Ignoring delete of {} while {}", id, self.mode);
            return false;
        }
        if &id == self.tree.root_id() {
            warn!("Refusing to delete the root node {}", id);
            return false;
        }
        if !self.tree.contains(&id) {
            warn!("Cannot delete unknown node {}", id);
            return false;
        }

        info!("Deleting node {}", id);
        let request = self.queue(Job::Delete(id.clone()));
        self.fallback_selection = parent_id.clone();
        self.set_mode(EditorMode::AwaitingDelete {
            id,
            parent_id,
            request,
        });
        true
    }

    /// Applies a finished service call.
    ///
    /// A tree result is accepted only if it answers the request the current
    /// mode is waiting on; anything else is logged and dropped. On success the
    /// snapshot is replaced; on failure it is kept. Either way the editor
    /// returns to `Idle`.
    pub fn complete(&mut self, response: Response) {
        match response.outcome {
            Outcome::Avatar(id, result) => {
                if self.avatars.resolve(response.id, &id, result) {
                    self.rebuild_view();
                }
            }
            Outcome::Tree(result) => {
                if self.mode.pending_request() != Some(response.id) {
                    debug!(
                        "Ignoring response {} (waiting on {:?})",
                        response.id,
                        self.mode.pending_request()
                    );
                    return;
                }

                let operation = self.mode.to_string();
                match result {
                    Ok(root) => {
                        info!("{} {} succeeded", operation, response.id);
                        self.tree = NodeTree::new(root, self.tree.root_id().clone());
                    }
                    Err(err) => {
                        error!("{} {} failed: {}", operation, response.id, err);
                    }
                }
                self.set_mode(EditorMode::Idle);
                self.fallback_selection = None;
            }
        }
    }

    /// Re-renders the view from the current snapshot.
    ///
    /// Releases avatar handles of nodes that left the snapshot, queues avatar
    /// fetches for newly displayed nodes, and keeps the cursor on the same node.
    pub fn rebuild_view(&mut self) {
        let mounted: HashSet<NodeId> = self.tree.ids().into_iter().collect();
        self.avatars.retain(&mounted);
        self.render();

        if self.load_avatars {
            let missing: Vec<NodeId> = self
                .tree_view
                .lines()
                .iter()
                .filter(|line| self.avatars.needs_fetch(&line.id))
                .map(|line| line.id.clone())
                .collect();
            if !missing.is_empty() {
                for id in missing {
                    let request = self.queue(Job::FetchAvatar(id.clone()));
                    self.avatars.mark_pending(id, request);
                }
                self.render();
            }
        }

        self.reselect();
    }

    fn render(&mut self) {
        let ctx = ViewContext {
            tree: &self.tree,
            controls_disabled: self.mode.controls_disabled(),
            avatars: &self.avatars,
            max_depth: self.max_depth,
        };
        self.tree_view.rebuild(&ctx);
    }

    fn reselect(&mut self) {
        let lines = self.tree_view.lines();
        if lines.is_empty() {
            self.cursor.clear();
            self.scroll_offset = 0;
            return;
        }

        let row = self
            .cursor
            .selected()
            .and_then(|id| self.tree_view.position_of(id))
            .or_else(|| {
                self.fallback_selection
                    .as_ref()
                    .and_then(|id| self.tree_view.position_of(id))
            })
            .unwrap_or_else(|| self.cursor.row().min(lines.len() - 1));
        let id = lines[row].id.clone();
        self.cursor.select(row, id);
    }

    /// The line under the cursor.
    pub fn selected_line(&self) -> Option<&TreeViewLine> {
        self.tree_view.lines().get(self.cursor.row())
    }

    /// Selects the line at `row` (clamped to the last line).
    pub fn select_row(&mut self, row: usize) {
        let lines = self.tree_view.lines();
        if lines.is_empty() {
            return;
        }
        let row = row.min(lines.len() - 1);
        let id = lines[row].id.clone();
        self.cursor.select(row, id);
    }

    /// Moves the cursor down one line.
    ///
    /// # Examples
    ///
    /// ```
    /// use treequill::document::sample::sample_tree;
    /// use treequill::editor::state::EditorState;
    ///
    /// let mut state = EditorState::new(sample_tree());
    /// state.move_cursor_down();
    /// assert_eq!(state.selected_line().unwrap().title, "NODE 1");
    /// ```
    pub fn move_cursor_down(&mut self) {
        self.select_row(self.cursor.row() + 1);
    }

    pub fn move_cursor_up(&mut self) {
        self.select_row(self.cursor.row().saturating_sub(1));
    }

    /// Jumps to the first line in the tree.
    pub fn jump_to_top(&mut self) {
        self.select_row(0);
        self.scroll_offset = 0;
    }

    /// Jumps to the last line in the tree.
    pub fn jump_to_bottom(&mut self) {
        self.select_row(usize::MAX);
    }

    pub fn page_down(&mut self) {
        self.select_row(self.cursor.row() + self.viewport_height.max(1));
    }

    pub fn page_up(&mut self) {
        self.select_row(self.cursor.row().saturating_sub(self.viewport_height.max(1)));
    }

    /// Activates the add control of the selected line.
    pub fn activate_add_at_cursor(&mut self) -> bool {
        match self.selected_line().map(|line| line.add.clone()) {
            Some(control) => control.activate(self),
            None => false,
        }
    }

    /// Activates the delete control of the selected line.
    pub fn activate_delete_at_cursor(&mut self) -> bool {
        match self.selected_line().map(|line| line.delete.clone()) {
            Some(control) => control.activate(self),
            None => false,
        }
    }

    /// Handles a click at `column` on the `row`-th visible line of the tree area.
    ///
    /// The clicked line becomes the selection; if the click landed on a
    /// control, that control is activated. Returns whether a control dispatched.
    pub fn click(&mut self, column: usize, row: usize) -> bool {
        if row >= self.viewport_height || column >= self.viewport_width {
            return false;
        }
        let index = self.scroll_offset + row;
        let control = match self.tree_view.lines().get(index) {
            Some(line) => line.hit_test(column).cloned(),
            None => return false,
        };
        self.select_row(index);
        match control {
            Some(control) => control.activate(self),
            None => false,
        }
    }

    /// Sets the width of the tree area; clicks right of it are ignored.
    pub fn set_viewport_width(&mut self, width: usize) {
        self.viewport_width = width;
    }

    /// Returns the current scroll offset (top line of viewport).
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Adjusts scroll offset to ensure the cursor is visible in the viewport.
    ///
    /// # Arguments
    ///
    /// * `viewport_height` - The height of the visible area in lines
    pub fn adjust_scroll_to_cursor(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        // Store viewport height for page up/down
        self.viewport_height = viewport_height;

        if self.tree_view.lines().is_empty() {
            self.scroll_offset = 0;
            return;
        }

        let cursor_idx = self.cursor.row();
        if cursor_idx < self.scroll_offset {
            self.scroll_offset = cursor_idx;
        } else if cursor_idx >= self.scroll_offset + viewport_height {
            self.scroll_offset = cursor_idx - viewport_height + 1;
        }
    }
}

impl Dispatch for EditorState {
    fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Add { parent_id } => {
                self.request_add(parent_id);
            }
            Intent::Delete { parent_id, id } => {
                self.request_delete(parent_id, id);
            }
        }
    }
}
