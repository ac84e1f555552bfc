//! Keyboard and mouse event mapping and input event types.

use crate::editor::mode::EditorMode;
use termion::event::{Event, Key, MouseButton, MouseEvent};

/// High-level input events abstracted from raw terminal input.
///
/// These events represent user intentions (quit, move cursor, add a node)
/// rather than specific key presses, allowing for mode-specific keybindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// User wants to quit the editor
    Quit,
    /// Move cursor down
    MoveDown,
    /// Move cursor up
    MoveUp,
    /// Jump to the first line
    JumpToTop,
    /// Jump to the last line
    JumpToBottom,
    /// Page down (Ctrl-f, PageDown key)
    PageDown,
    /// Page up (Ctrl-b, PageUp key)
    PageUp,
    /// Activate the add control of the selected line
    Add,
    /// Activate the delete control of the selected line
    Delete,
    /// Fetch the whole tree again
    Reload,
    /// Toggle help overlay
    Help,
    /// Type a character into the focused sidebar field
    InsertCharacter(char),
    /// Backspace in the sidebar
    InsertBackspace,
    /// Delete the character under the sidebar cursor
    InsertDelete,
    /// Move the sidebar cursor left
    CursorLeft,
    /// Move the sidebar cursor right
    CursorRight,
    /// Switch between the sidebar fields
    NextField,
    /// Submit the sidebar
    Submit,
    /// Close the sidebar without submitting
    Cancel,
    /// Left click at a zero-based terminal cell
    Click { column: u16, row: u16 },
    /// Mouse wheel up
    ScrollUp,
    /// Mouse wheel down
    ScrollDown,
    /// Unknown or unmapped input
    Unknown,
}

/// Maps a termion Event to an InputEvent based on the current editor mode.
///
/// Keys are interpreted per mode:
/// - While the sidebar is open, printable keys edit the focused field, Tab
///   switches fields, Enter submits and Esc cancels
/// - Otherwise j/k and arrows move, `+`/`a` add, `-`/`d` delete, `r` reloads,
///   `?` or F1 toggles help and `q` quits
///
/// Mouse events are mapped the same way in every mode. Termion reports
/// one-based cells; [`InputEvent::Click`] carries zero-based ones.
///
/// # Example
///
/// ```
/// use termion::event::{Event, Key};
/// use treequill::editor::mode::EditorMode;
/// use treequill::input::keys::{map_key_event, InputEvent};
///
/// let event = Event::Key(Key::Char('j'));
/// let input_event = map_key_event(event, &EditorMode::Idle);
/// assert_eq!(input_event, InputEvent::MoveDown);
/// ```
pub fn map_key_event(event: Event, mode: &EditorMode) -> InputEvent {
    let key = match event {
        Event::Key(k) => k,
        Event::Mouse(mouse) => return map_mouse_event(mouse),
        _ => return InputEvent::Unknown,
    };

    if mode.shows_sidebar() {
        return match key {
            Key::Esc => InputEvent::Cancel,
            Key::Char('\n') => InputEvent::Submit,
            Key::Char('\t') | Key::BackTab => InputEvent::NextField,
            Key::Backspace => InputEvent::InsertBackspace,
            Key::Delete => InputEvent::InsertDelete,
            Key::Left => InputEvent::CursorLeft,
            Key::Right => InputEvent::CursorRight,
            Key::Ctrl('c') => InputEvent::Quit,
            Key::Char(c) if !c.is_control() => InputEvent::InsertCharacter(c),
            _ => InputEvent::Unknown,
        };
    }

    match key {
        Key::Ctrl('c') => InputEvent::Quit,
        Key::Ctrl('f') => InputEvent::PageDown,
        Key::Ctrl('b') => InputEvent::PageUp,
        Key::Char('q') => InputEvent::Quit,
        Key::Char('j') => InputEvent::MoveDown,
        Key::Char('k') => InputEvent::MoveUp,
        Key::Char('g') => InputEvent::JumpToTop,
        Key::Char('G') => InputEvent::JumpToBottom,
        Key::Char('+') | Key::Char('a') => InputEvent::Add,
        Key::Char('-') | Key::Char('d') => InputEvent::Delete,
        Key::Char('r') => InputEvent::Reload,
        Key::Char('?') => InputEvent::Help,
        Key::Esc => InputEvent::Cancel,
        Key::Down => InputEvent::MoveDown,
        Key::Up => InputEvent::MoveUp,
        Key::PageDown => InputEvent::PageDown,
        Key::PageUp => InputEvent::PageUp,
        Key::Home => InputEvent::JumpToTop,
        Key::End => InputEvent::JumpToBottom,
        Key::F(1) => InputEvent::Help,
        _ => InputEvent::Unknown,
    }
}

fn map_mouse_event(mouse: MouseEvent) -> InputEvent {
    match mouse {
        MouseEvent::Press(MouseButton::Left, x, y) => InputEvent::Click {
            column: x.saturating_sub(1),
            row: y.saturating_sub(1),
        },
        MouseEvent::Press(MouseButton::WheelUp, _, _) => InputEvent::ScrollUp,
        MouseEvent::Press(MouseButton::WheelDown, _, _) => InputEvent::ScrollDown,
        _ => InputEvent::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::NodeId;

    fn sidebar() -> EditorMode {
        EditorMode::AwaitingInput {
            parent_id: NodeId::from(1),
        }
    }

    #[test]
    fn test_idle_quit() {
        let event = Event::Key(Key::Char('q'));
        assert_eq!(map_key_event(event, &EditorMode::Idle), InputEvent::Quit);
    }

    #[test]
    fn test_idle_controls() {
        assert_eq!(
            map_key_event(Event::Key(Key::Char('+')), &EditorMode::Idle),
            InputEvent::Add
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Char('d')), &EditorMode::Idle),
            InputEvent::Delete
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Char('r')), &EditorMode::Idle),
            InputEvent::Reload
        );
    }

    #[test]
    fn test_sidebar_keys_edit_text() {
        assert_eq!(
            map_key_event(Event::Key(Key::Char('q')), &sidebar()),
            InputEvent::InsertCharacter('q')
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Char('\n')), &sidebar()),
            InputEvent::Submit
        );
        assert_eq!(
            map_key_event(Event::Key(Key::Char('\t')), &sidebar()),
            InputEvent::NextField
        );
        assert_eq!(map_key_event(Event::Key(Key::Esc), &sidebar()), InputEvent::Cancel);
    }

    #[test]
    fn test_click_is_zero_based() {
        let event = Event::Mouse(MouseEvent::Press(MouseButton::Left, 4, 2));
        assert_eq!(
            map_key_event(event, &EditorMode::Idle),
            InputEvent::Click { column: 3, row: 1 }
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            map_key_event(Event::Key(Key::Char('x')), &EditorMode::Idle),
            InputEvent::Unknown
        );
    }
}
