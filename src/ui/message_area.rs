//! Message area rendering: a one-line hint for the current mode.

use crate::editor::mode::EditorMode;
use crate::editor::state::EditorState;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Returns the hint shown for `state`.
pub fn hint(state: &EditorState) -> String {
    match state.mode() {
        EditorMode::Idle if state.tree().is_empty() => {
            "No tree loaded. r to retry, q to quit".to_string()
        }
        EditorMode::Idle => "+ add child  - delete  r reload  ? help  q quit".to_string(),
        EditorMode::Loading { .. } => "Loading tree...".to_string(),
        EditorMode::AwaitingInput { parent_id } => {
            format!("Adding a child of #{}: Enter to submit, Esc to cancel", parent_id)
        }
        EditorMode::AwaitingCreate { parent_id, .. } => {
            format!("Creating a child of #{}...", parent_id)
        }
        EditorMode::AwaitingDelete { id, .. } => format!("Deleting #{}...", id),
    }
}

/// Renders the message area at the bottom of the screen.
pub fn render_message_area(f: &mut Frame, area: Rect, state: &EditorState, colors: &ThemeColors) {
    let color = if state.mode().is_idle() {
        colors.foreground
    } else {
        colors.info
    };
    let content = Line::from(vec![Span::styled(hint(state), Style::default().fg(color))]);

    let paragraph =
        Paragraph::new(content).style(Style::default().bg(colors.background).fg(colors.foreground));

    f.render_widget(paragraph, area);
}
