//! Recursive tree view.
//!
//! This module provides:
//! - `render_node`: the pure projection of a [`Node`] and its descendants into a
//!   [`NodeView`] tree, with a delete and an add [`Control`] per node
//! - `Intent` / `Dispatch`: what a control raises when activated, and where it goes
//! - `TreeViewState`: the flattened, displayable lines of the current view
//! - `render_tree_view`: drawing those lines with ratatui
//!
//! The view holds no tree state of its own. Every control of every depth
//! delivers its intent to the single `Dispatch` handle the caller passes to
//! [`Control::activate`].

use crate::document::node::{Node, NodeId};
use crate::document::tree::NodeTree;
use crate::theme::colors::ThemeColors;
use crate::ui::avatar::{AvatarCache, AvatarView};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Width of one indentation level in columns.
pub const INDENT_WIDTH: usize = 2;

const CONTROL_WIDTH: usize = 3;

/// A user action raised by a control, decoupled from its handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a child of `parent_id`.
    Add { parent_id: NodeId },
    /// Delete `id`, a child of `parent_id`.
    Delete {
        parent_id: Option<NodeId>,
        id: NodeId,
    },
}

/// Receiver of intents.
pub trait Dispatch {
    fn dispatch(&mut self, intent: Intent);
}

impl Dispatch for Vec<Intent> {
    fn dispatch(&mut self, intent: Intent) {
        self.push(intent);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Add,
    Delete,
}

/// An add or delete button of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    kind: ControlKind,
    enabled: bool,
    intent: Intent,
}

impl Control {
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Sends this control's intent to `dispatch` if the control is enabled.
    ///
    /// Returns whether anything was dispatched.
    pub fn activate(&self, dispatch: &mut dyn Dispatch) -> bool {
        if self.enabled {
            dispatch.dispatch(self.intent.clone());
        }
        self.enabled
    }
}

/// Rendered form of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    pub id: NodeId,
    /// Id of the node this one was rendered under (`None` for the top node)
    pub parent_id: Option<NodeId>,
    pub title: String,
    pub avatar: AvatarView,
    pub delete: Control,
    pub add: Control,
    pub children: Vec<NodeView>,
    /// True if children exist below the depth limit and were not rendered
    pub truncated: bool,
}

/// Inputs shared by every level of a render.
pub struct ViewContext<'a> {
    /// Snapshot the rendered nodes belong to (decides which node is the root)
    pub tree: &'a NodeTree,
    /// Disables every control while a request is pending
    pub controls_disabled: bool,
    pub avatars: &'a AvatarCache,
    /// Number of levels rendered before the view stops descending
    pub max_depth: usize,
}

/// Projects `node` and its descendants into a [`NodeView`].
///
/// The delete control is disabled exactly when the node is the root (or when
/// all controls are disabled). Each child is rendered in order with `node`'s id
/// as its parent reference.
///
/// # Example
///
/// ```
/// use treequill::document::node::{Node, NodeId};
/// use treequill::document::tree::NodeTree;
/// use treequill::ui::avatar::AvatarCache;
/// use treequill::ui::tree_view::{render_node, ViewContext};
///
/// let tree = NodeTree::new(
///     Node::new(0, "ROOT").with_children(vec![Node::new(1, "A")]),
///     NodeId::from(0),
/// );
/// let avatars = AvatarCache::new();
/// let ctx = ViewContext { tree: &tree, controls_disabled: false, avatars: &avatars, max_depth: 64 };
///
/// let view = render_node(tree.root().unwrap(), None, &ctx);
/// assert!(!view.delete.is_enabled());
/// assert!(view.children[0].delete.is_enabled());
/// assert_eq!(view.children[0].parent_id, Some(NodeId::from(0)));
/// ```
pub fn render_node(node: &Node, parent_id: Option<&NodeId>, ctx: &ViewContext) -> NodeView {
    render_at(node, parent_id, ctx, 1)
}

fn render_at(node: &Node, parent_id: Option<&NodeId>, ctx: &ViewContext, level: usize) -> NodeView {
    let is_root = ctx.tree.is_root(node);
    let delete = Control {
        kind: ControlKind::Delete,
        enabled: !is_root && !ctx.controls_disabled,
        intent: Intent::Delete {
            parent_id: parent_id.cloned(),
            id: node.id.clone(),
        },
    };
    let add = Control {
        kind: ControlKind::Add,
        enabled: !ctx.controls_disabled,
        intent: Intent::Add {
            parent_id: node.id.clone(),
        },
    };

    let children = ctx.tree.children(node);
    let (children, truncated) = if level >= ctx.max_depth.max(1) {
        (Vec::new(), !children.is_empty())
    } else {
        let rendered = children
            .iter()
            .map(|child| render_at(child, Some(&node.id), ctx, level + 1))
            .collect();
        (rendered, false)
    };

    NodeView {
        id: node.id.clone(),
        parent_id: parent_id.cloned(),
        title: node.title.clone(),
        avatar: ctx.avatars.view(&node.id),
        delete,
        add,
        children,
        truncated,
    }
}

/// One displayable line: a node without its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeViewLine {
    pub depth: usize,
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub title: String,
    pub avatar: AvatarView,
    pub delete: Control,
    pub add: Control,
    pub truncated: bool,
    pub is_root: bool,
}

impl TreeViewLine {
    /// Column range `[start, end)` of the delete control.
    pub fn delete_span(&self) -> (usize, usize) {
        let start = self.depth * INDENT_WIDTH;
        (start, start + CONTROL_WIDTH)
    }

    /// Column range `[start, end)` of the add control.
    ///
    /// Measured in terminal cells, so wide characters in the title count twice.
    pub fn add_span(&self) -> (usize, usize) {
        let start = self.depth * INDENT_WIDTH + CONTROL_WIDTH + 1 + self.title.width() + 1;
        (start, start + CONTROL_WIDTH)
    }

    /// Returns the control drawn at `column`, if any.
    pub fn hit_test(&self, column: usize) -> Option<&Control> {
        let (start, end) = self.delete_span();
        if (start..end).contains(&column) {
            return Some(&self.delete);
        }
        let (start, end) = self.add_span();
        if (start..end).contains(&column) {
            return Some(&self.add);
        }
        None
    }
}

/// Flattened view of the current snapshot.
#[derive(Debug, Default)]
pub struct TreeViewState {
    root: Option<NodeView>,
    lines: Vec<TreeViewLine>,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-renders the snapshot in `ctx` and regenerates the lines.
    pub fn rebuild(&mut self, ctx: &ViewContext) {
        self.lines.clear();
        self.root = ctx.tree.root().map(|root| render_node(root, None, ctx));
        if let Some(view) = &self.root {
            flatten(view, 0, ctx.tree, &mut self.lines);
        }
    }

    pub fn root_view(&self) -> Option<&NodeView> {
        self.root.as_ref()
    }

    pub fn lines(&self) -> &[TreeViewLine] {
        &self.lines
    }

    /// Row of the node `id`, if displayed.
    pub fn position_of(&self, id: &NodeId) -> Option<usize> {
        self.lines.iter().position(|line| &line.id == id)
    }
}

fn flatten(view: &NodeView, depth: usize, tree: &NodeTree, lines: &mut Vec<TreeViewLine>) {
    lines.push(TreeViewLine {
        depth,
        id: view.id.clone(),
        parent_id: view.parent_id.clone(),
        title: view.title.clone(),
        avatar: view.avatar,
        delete: view.delete.clone(),
        add: view.add.clone(),
        truncated: view.truncated,
        is_root: &view.id == tree.root_id(),
    });
    for child in &view.children {
        flatten(child, depth + 1, tree, lines);
    }
}

/// Renders the tree lines with the cursor highlight.
///
/// Each line reads `[-] Title [+] #id` followed by the avatar state. The root's
/// delete control is drawn as an empty `[ ]` box; disabled controls are dimmed.
///
/// # Example
///
/// ```no_run
/// use treequill::document::sample::sample_tree;
/// use treequill::theme::colors::ThemeColors;
/// use treequill::ui::avatar::AvatarCache;
/// use treequill::ui::tree_view::{render_tree_view, TreeViewState, ViewContext};
/// use ratatui::backend::TestBackend;
/// use ratatui::Terminal;
///
/// let tree = sample_tree();
/// let avatars = AvatarCache::new();
/// let mut state = TreeViewState::new();
/// state.rebuild(&ViewContext { tree: &tree, controls_disabled: false, avatars: &avatars, max_depth: 64 });
///
/// let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
/// let colors = ThemeColors::default_dark();
/// terminal.draw(|f| render_tree_view(f, f.area(), &state, 0, &colors, 0)).unwrap();
/// ```
pub fn render_tree_view(
    f: &mut Frame,
    area: Rect,
    tree_view: &TreeViewState,
    cursor_row: usize,
    colors: &ThemeColors,
    scroll_offset: usize,
) {
    let viewport_height = area.height as usize;

    let lines_to_render: Vec<Line> = tree_view
        .lines()
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(viewport_height)
        .map(|(row, line)| render_line(line, row == cursor_row, colors))
        .collect();

    let paragraph = Paragraph::new(lines_to_render)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(colors.background).fg(colors.foreground));

    f.render_widget(paragraph, area);
}

fn control_span(control: &Control, is_root: bool, colors: &ThemeColors) -> Span<'static> {
    let label = match control.kind() {
        ControlKind::Delete if is_root => "[ ]",
        ControlKind::Delete => "[-]",
        ControlKind::Add => "[+]",
    };
    let style = if !control.is_enabled() {
        Style::default()
            .fg(colors.control_disabled)
            .add_modifier(Modifier::DIM)
    } else {
        match control.kind() {
            ControlKind::Delete => Style::default().fg(colors.delete_control),
            ControlKind::Add => Style::default().fg(colors.add_control),
        }
    };
    Span::styled(label, style)
}

fn render_line<'a>(line: &'a TreeViewLine, is_cursor: bool, colors: &ThemeColors) -> Line<'a> {
    let title_style = if is_cursor {
        Style::default()
            .fg(colors.cursor_fg)
            .bg(colors.cursor)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.title)
    };

    let mut spans = vec![
        Span::raw(" ".repeat(line.depth * INDENT_WIDTH)),
        control_span(&line.delete, line.is_root, colors),
        Span::raw(" "),
        Span::styled(line.title.as_str(), title_style),
        Span::raw(" "),
        control_span(&line.add, line.is_root, colors),
        Span::styled(format!(" #{}", line.id), Style::default().fg(colors.node_id)),
    ];

    match line.avatar {
        AvatarView::Absent => {}
        AvatarView::Loading => {
            spans.push(Span::styled(" …", Style::default().fg(colors.placeholder)));
        }
        AvatarView::Ready { kind, size } => {
            spans.push(Span::styled(
                format!(" ▣ {} {}", kind.label(), format_size(size)),
                Style::default().fg(colors.avatar),
            ));
        }
    }

    if line.truncated {
        spans.push(Span::styled(" ▸ …", Style::default().fg(colors.placeholder)));
    }

    Line::from(spans)
}

/// Formats a byte count compactly (`512B`, `1.5K`, `2.0M`).
pub fn format_size(bytes: usize) -> String {
    const K: f64 = 1024.0;
    let b = bytes as f64;
    if b < K {
        format!("{}B", bytes)
    } else if b < K * K {
        format!("{:.1}K", b / K)
    } else {
        format!("{:.1}M", b / (K * K))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn tree() -> NodeTree {
        NodeTree::new(
            Node::new(0, "ROOT").with_children(vec![
                Node::new(1, "A").with_children(vec![Node::new(3, "C")]),
                Node::new(2, "B"),
            ]),
            NodeId::from(0),
        )
    }

    fn state(tree: &NodeTree, disabled: bool) -> TreeViewState {
        let avatars = AvatarCache::new();
        let mut state = TreeViewState::new();
        state.rebuild(&ViewContext {
            tree,
            controls_disabled: disabled,
            avatars: &avatars,
            max_depth: 64,
        });
        state
    }

    #[test]
    fn test_lines_are_pre_order_with_depth() {
        let tree = tree();
        let state = state(&tree, false);
        let summary: Vec<(String, usize)> = state
            .lines()
            .iter()
            .map(|l| (l.title.clone(), l.depth))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ROOT".to_string(), 0),
                ("A".to_string(), 1),
                ("C".to_string(), 2),
                ("B".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_hit_test_columns() {
        let tree = tree();
        let state = state(&tree, false);
        let line = &state.lines()[1]; // "  [-] A [+] #1"

        assert_eq!(line.delete_span(), (2, 5));
        assert_eq!(line.add_span(), (8, 11));
        assert_eq!(line.hit_test(3).map(|c| c.kind()), Some(ControlKind::Delete));
        assert_eq!(line.hit_test(9).map(|c| c.kind()), Some(ControlKind::Add));
        assert!(line.hit_test(6).is_none());
        assert!(line.hit_test(0).is_none());
    }

    #[test]
    fn test_add_span_matches_drawn_wide_title() {
        let tree = NodeTree::new(
            Node::new(0, "ROOT").with_children(vec![Node::new(1, "日本語")]),
            NodeId::from(0),
        );
        let state = state(&tree, false);
        let line = &state.lines()[1];
        assert_eq!(line.add_span(), (13, 16));

        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        let colors = ThemeColors::default_dark();
        terminal
            .draw(|f| render_tree_view(f, f.area(), &state, 0, &colors, 0))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(13, 1)].symbol(), "[");
        assert_eq!(buffer[(14, 1)].symbol(), "+");
        assert_eq!(line.hit_test(14).map(|c| c.kind()), Some(ControlKind::Add));
    }

    #[test]
    fn test_depth_limit_truncates() {
        let tree = tree();
        let avatars = AvatarCache::new();
        let ctx = ViewContext {
            tree: &tree,
            controls_disabled: false,
            avatars: &avatars,
            max_depth: 2,
        };
        let view = render_node(tree.root().unwrap(), None, &ctx);

        let a = &view.children[0];
        assert!(a.children.is_empty());
        assert!(a.truncated);
        assert!(!view.children[1].truncated);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0M");
    }

    #[test]
    fn test_render_shows_controls_and_titles() {
        let tree = tree();
        let state = state(&tree, false);

        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let colors = ThemeColors::default_dark();
        terminal
            .draw(|f| render_tree_view(f, f.area(), &state, 0, &colors, 0))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let row = |y: u16| -> String {
            (0..40)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        };
        assert!(row(0).starts_with("[ ] ROOT [+] #0"));
        assert!(row(1).starts_with("  [-] A [+] #1"));
        assert!(row(2).starts_with("    [-] C [+] #3"));
    }
}
