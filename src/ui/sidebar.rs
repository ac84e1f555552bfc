//! Create-node sidebar rendering.

use crate::document::node::NodeId;
use crate::editor::sidebar::{SidebarField, SidebarForm, TextField};
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Width of the sidebar in columns.
pub const SIDEBAR_WIDTH: u16 = 40;

/// Renders the create-node form for a child of `parent_id`.
///
/// The focused field shows a block cursor on the character under the cursor.
pub fn render_sidebar(
    f: &mut Frame,
    area: Rect,
    form: &SidebarForm,
    parent_id: &NodeId,
    colors: &ThemeColors,
) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" New node under #{} ", parent_id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.background).fg(colors.foreground));

    let label = Style::default().fg(colors.info).add_modifier(Modifier::BOLD);
    let hint = Style::default()
        .fg(colors.placeholder)
        .add_modifier(Modifier::ITALIC);

    let lines = vec![
        Line::from(Span::styled("Title", label)),
        field_line(form.title(), form.focus() == SidebarField::Title, colors),
        Line::from(""),
        Line::from(Span::styled("Avatar file (optional)", label)),
        field_line(
            form.avatar(),
            form.focus() == SidebarField::AvatarPath,
            colors,
        ),
        Line::from(""),
        Line::from(Span::styled("Tab switch field", hint)),
        Line::from(Span::styled("Enter submit  Esc cancel", hint)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn field_line<'a>(field: &'a TextField, focused: bool, colors: &ThemeColors) -> Line<'a> {
    let text_style = Style::default().fg(colors.foreground).bg(colors.background);
    let chars: Vec<char> = field.text().chars().collect();
    let cursor_pos = field.cursor().min(chars.len());

    let mut spans = vec![Span::styled("> ", Style::default().fg(colors.border))];
    if !focused {
        spans.push(Span::styled(field.text(), text_style));
        return Line::from(spans);
    }

    // Split text into: before cursor, char at cursor, after cursor
    let before: String = chars.iter().take(cursor_pos).collect();
    let after: String = chars.iter().skip(cursor_pos + 1).collect();
    let char_at_cursor = chars.get(cursor_pos).copied().unwrap_or(' ');

    spans.push(Span::styled(before, text_style));
    spans.push(Span::styled(
        char_at_cursor.to_string(),
        Style::default()
            .fg(colors.cursor_fg)
            .bg(colors.cursor)
            .add_modifier(Modifier::BOLD),
    ));
    if !after.is_empty() {
        spans.push(Span::styled(after, text_style));
    }
    Line::from(spans)
}
