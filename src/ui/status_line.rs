//! Status line widget for displaying editor state information.
//!
//! The status line shows:
//! - Current mode (IDLE, LOADING, INPUT, CREATING, DELETING)
//! - Where the tree comes from (server URL or "offline")
//! - The selected node's id
//! - Selected row and node count
//!
//! Example status line: `IDLE | http://localhost:8080/ #5             4/8`

use crate::editor::state::EditorState;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Renders the status line.
///
/// # Example
///
/// ```no_run
/// use ratatui::Frame;
/// use ratatui::layout::Rect;
/// use treequill::document::sample::sample_tree;
/// use treequill::editor::state::EditorState;
/// use treequill::theme;
///
/// # fn example(f: &mut Frame, area: Rect) {
/// let state = EditorState::new(sample_tree());
/// let theme = theme::get_builtin_theme("default-dark").unwrap();
/// treequill::ui::status_line::render_status_line(f, area, &state, &theme.colors);
/// # }
/// ```
pub fn render_status_line(f: &mut Frame, area: Rect, state: &EditorState, colors: &ThemeColors) {
    let mode_text = format!(" {} ", state.mode());
    let source = if state.source_label().is_empty() {
        String::new()
    } else {
        format!(" {}", state.source_label())
    };
    let selected = state
        .cursor()
        .selected()
        .map(|id| format!(" #{}", id))
        .unwrap_or_default();

    let total = state.tree_view().lines().len();
    let position = if total == 0 {
        "empty ".to_string()
    } else {
        format!("{}/{} ", state.cursor().row() + 1, total)
    };

    // Calculate padding to position right-aligned text
    let total_width = area.width as usize;
    let left_len = mode_text.chars().count() + source.chars().count() + selected.chars().count();
    let position_len = position.len();
    let padding = if left_len + position_len < total_width {
        total_width - left_len - position_len
    } else {
        1
    };

    let default_style = Style::default()
        .fg(colors.status_line_fg)
        .bg(colors.status_line_bg);
    let mode_style = if state.mode().is_idle() {
        default_style.add_modifier(Modifier::BOLD)
    } else {
        default_style.fg(colors.warning).add_modifier(Modifier::BOLD)
    };

    let line = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::styled(source, default_style),
        Span::styled(selected, default_style),
        Span::styled(" ".repeat(padding), default_style),
        Span::styled(position, default_style),
    ]);

    let paragraph = Paragraph::new(line).style(default_style);
    f.render_widget(paragraph, area);
}
