//! Help overlay for displaying keybindings.

use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k, ↓/↑", "Move cursor down/up"),
            ("g / Home", "Jump to top"),
            ("G / End", "Jump to bottom"),
            ("Ctrl-f/b", "Page down/up"),
            ("mouse wheel", "Move cursor"),
        ],
    ),
    (
        "Tree",
        &[
            ("+ / a", "Add a child to the selected node"),
            ("- / d", "Delete the selected node and its subtree"),
            ("click [+]/[-]", "Same as + / -"),
            ("r", "Reload the tree from the service"),
        ],
    ),
    (
        "New node sidebar",
        &[
            ("Tab", "Switch between title and avatar file"),
            ("Enter", "Create the node"),
            ("Esc", "Cancel"),
        ],
    ),
    (
        "Other",
        &[("? / F1", "Toggle this help"), ("q", "Quit")],
    ),
];

/// Renders a centered help overlay showing keybindings.
pub fn render_help_overlay(f: &mut Frame, colors: &ThemeColors) {
    let area = centered_rect(70, 80, f.area());

    // Clear the background
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" TreeQuill Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.background));

    let mut help_text = Vec::new();
    for (section, keys) in BINDINGS {
        help_text.push(Line::from(""));
        help_text.push(Line::from(vec![Span::styled(
            *section,
            Style::default().fg(colors.title).add_modifier(Modifier::BOLD),
        )]));
        for (key, description) in keys.iter() {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<16}", key), Style::default().fg(colors.add_control)),
                Span::styled(*description, Style::default().fg(colors.foreground)),
            ]));
        }
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![Span::styled(
        "Any key to close",
        Style::default()
            .fg(colors.info)
            .add_modifier(Modifier::ITALIC),
    )]));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    f.render_widget(paragraph, area);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
