//! UI module for the treequill terminal interface.
//!
//! This module provides the main UI structure for rendering the terminal interface,
//! including layout management and widget composition.

pub mod avatar;
pub mod help_overlay;
pub mod message_area;
pub mod sidebar;
pub mod status_line;
pub mod tree_view;

use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;

use crate::editor::mode::EditorMode;
use crate::editor::state::EditorState;
use crate::theme::Theme;

/// Main UI structure that manages the terminal interface rendering.
///
/// The UI is composed of three main areas:
/// - Main view area (top): the tree, with the create-node sidebar on the
///   right while it is open
/// - Status line (middle): mode, source, selection
/// - Message area (bottom): a hint for the current mode
///
/// # Example
///
/// ```
/// use treequill::document::sample::sample_tree;
/// use treequill::editor::state::EditorState;
/// use treequill::theme::get_builtin_theme;
/// use treequill::ui::UI;
/// use ratatui::backend::TestBackend;
/// use ratatui::Terminal;
///
/// let ui = UI::new(get_builtin_theme("default-dark").unwrap());
/// let mut state = EditorState::new(sample_tree());
/// let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
/// ui.render(&mut terminal, &mut state).unwrap();
/// ```
pub struct UI {
    theme: Theme,
}

impl UI {
    /// Creates a new UI instance with the specified theme.
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Returns the current theme name.
    pub fn theme_name(&self) -> &str {
        &self.theme.name
    }

    /// Renders the UI to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal drawing fails.
    pub fn render<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        state: &mut EditorState,
    ) -> Result<()> {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),    // Main view area
                    Constraint::Length(1), // Status line
                    Constraint::Length(1), // Message area
                ])
                .split(f.area());

            let (tree_area, sidebar_area) = if state.mode().shows_sidebar() {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([
                        Constraint::Min(1),
                        Constraint::Length(sidebar::SIDEBAR_WIDTH),
                    ])
                    .split(chunks[0]);
                (columns[0], Some(columns[1]))
            } else {
                (chunks[0], None)
            };

            // Adjust scroll to ensure cursor is visible
            state.adjust_scroll_to_cursor(tree_area.height as usize);
            state.set_viewport_width(tree_area.width as usize);

            tree_view::render_tree_view(
                f,
                tree_area,
                state.tree_view(),
                state.cursor().row(),
                &self.theme.colors,
                state.scroll_offset(),
            );

            if let (Some(area), EditorMode::AwaitingInput { parent_id }) =
                (sidebar_area, state.mode())
            {
                sidebar::render_sidebar(f, area, state.sidebar(), parent_id, &self.theme.colors);
            }

            status_line::render_status_line(f, chunks[1], state, &self.theme.colors);
            message_area::render_message_area(f, chunks[2], state, &self.theme.colors);

            // Help overlay (rendered on top if visible)
            if state.show_help() {
                help_overlay::render_help_overlay(f, &self.theme.colors);
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::NodeId;
    use crate::document::sample::sample_tree;
    use crate::theme::get_builtin_theme;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_render_status_and_hint() {
        let ui = UI::new(get_builtin_theme("default-dark").unwrap());
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let mut state = EditorState::new(sample_tree());
        state.set_source_label("offline");

        ui.render(&mut terminal, &mut state).unwrap();

        let rows = screen(&terminal);
        assert!(rows[10].starts_with(" IDLE  offline #0"));
        assert!(rows[11].starts_with("+ add child"));
    }

    #[test]
    fn test_sidebar_shown_while_awaiting_input() {
        let ui = UI::new(get_builtin_theme("nord").unwrap());
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let mut state = EditorState::new(sample_tree());
        state.request_add(NodeId::from(5));

        ui.render(&mut terminal, &mut state).unwrap();

        let rows = screen(&terminal);
        assert!(rows[0].contains("New node under #5"));
        assert!(rows[11].starts_with("Adding a child of #5"));

        // Row 2 of the sidebar column must not select NODE 3 in the tree
        let selected = state.cursor().selected().cloned();
        assert!(!state.click(50, 2));
        assert_eq!(state.cursor().selected().cloned(), selected);
    }
}
