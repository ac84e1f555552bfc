//! Input event handler for polling and processing terminal events.

use super::keys::{map_key_event, InputEvent};
use crate::editor::state::EditorState;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use termion::event::Event;
use termion::input::TermRead;

/// Lines moved per mouse wheel step.
const WHEEL_STEP: usize = 3;

/// Handles terminal input events and updates editor state.
///
/// Terminal events are read on a dedicated thread and delivered over a
/// channel, so [`poll_event`](Self::poll_event) can wait with a timeout and
/// the event loop keeps draining service responses while the user is idle.
pub struct InputHandler {
    events: Receiver<io::Result<Event>>,
}

impl InputHandler {
    /// Starts reading terminal events.
    ///
    /// Reads stdin when it is a terminal and `/dev/tty` otherwise.
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        if io::stdin().is_terminal() {
            thread::Builder::new()
                .name("treequill-input".to_string())
                .spawn(move || {
                    for event in io::stdin().events() {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    info!("Input thread stopped");
                })
                .context("Failed to start input thread")?;
        } else {
            let tty = File::options()
                .read(true)
                .write(true)
                .open("/dev/tty")
                .context("Failed to open /dev/tty for keyboard input")?;
            thread::Builder::new()
                .name("treequill-input".to_string())
                .spawn(move || {
                    for event in tty.events() {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    info!("Input thread stopped");
                })
                .context("Failed to start input thread")?;
        }

        Ok(Self::from_receiver(rx))
    }

    /// Creates a handler fed by an existing event channel.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::mpsc;
    /// use std::time::Duration;
    /// use termion::event::{Event, Key};
    /// use treequill::input::InputHandler;
    ///
    /// let (tx, rx) = mpsc::channel();
    /// let mut handler = InputHandler::from_receiver(rx);
    /// tx.send(Ok(Event::Key(Key::Char('j')))).unwrap();
    ///
    /// let event = handler.poll_event(Duration::from_millis(10)).unwrap();
    /// assert_eq!(event, Some(Event::Key(Key::Char('j'))));
    /// ```
    pub fn from_receiver(events: Receiver<io::Result<Event>>) -> Self {
        Self { events }
    }

    /// Polls for a terminal event with a timeout.
    ///
    /// Returns Some(Event) if an event occurred, None if timeout elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the terminal failed or the input thread
    /// has stopped.
    pub fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event.context("Failed to read terminal event")?)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(anyhow!("Terminal input closed")),
        }
    }

    /// Handles a terminal event and updates editor state.
    ///
    /// Returns `Ok(true)` if the application should quit.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::mpsc;
    /// use termion::event::{Event, Key};
    /// use treequill::document::sample::sample_tree;
    /// use treequill::editor::state::EditorState;
    /// use treequill::input::InputHandler;
    ///
    /// let (_tx, rx) = mpsc::channel();
    /// let mut handler = InputHandler::from_receiver(rx);
    /// let mut state = EditorState::new(sample_tree());
    ///
    /// let should_quit = handler.handle_event(Event::Key(Key::Char('q')), &mut state).unwrap();
    /// assert!(should_quit);
    /// ```
    pub fn handle_event(&mut self, event: Event, state: &mut EditorState) -> Result<bool> {
        let input = map_key_event(event, state.mode());

        // Any key closes the help overlay
        if state.show_help() {
            match input {
                InputEvent::Quit => return Ok(true),
                InputEvent::Click { .. }
                | InputEvent::ScrollUp
                | InputEvent::ScrollDown
                | InputEvent::Unknown => {}
                _ => {
                    state.hide_help();
                    return Ok(false);
                }
            }
        }

        match input {
            InputEvent::Quit => return Ok(true),
            InputEvent::MoveDown => state.move_cursor_down(),
            InputEvent::MoveUp => state.move_cursor_up(),
            InputEvent::JumpToTop => state.jump_to_top(),
            InputEvent::JumpToBottom => state.jump_to_bottom(),
            InputEvent::PageDown => state.page_down(),
            InputEvent::PageUp => state.page_up(),
            InputEvent::Add => {
                if !state.activate_add_at_cursor() {
                    debug!("Add control not available");
                }
            }
            InputEvent::Delete => {
                if !state.activate_delete_at_cursor() {
                    debug!("Delete control not available");
                }
            }
            InputEvent::Reload => {
                state.load_tree();
            }
            InputEvent::Help => state.toggle_help(),
            InputEvent::InsertCharacter(c) => state.sidebar_mut().insert(c),
            InputEvent::InsertBackspace => state.sidebar_mut().focused_mut().backspace(),
            InputEvent::InsertDelete => state.sidebar_mut().focused_mut().delete(),
            InputEvent::CursorLeft => state.sidebar_mut().focused_mut().move_left(),
            InputEvent::CursorRight => state.sidebar_mut().focused_mut().move_right(),
            InputEvent::NextField => state.sidebar_mut().next_field(),
            InputEvent::Submit => {
                state.submit_sidebar();
            }
            InputEvent::Cancel => {
                state.cancel_sidebar();
            }
            InputEvent::Click { column, row } => {
                if state.enable_mouse() && !state.show_help() {
                    state.click(column as usize, row as usize);
                }
            }
            InputEvent::ScrollUp => {
                if state.enable_mouse() {
                    for _ in 0..WHEEL_STEP {
                        state.move_cursor_up();
                    }
                }
            }
            InputEvent::ScrollDown => {
                if state.enable_mouse() {
                    for _ in 0..WHEEL_STEP {
                        state.move_cursor_down();
                    }
                }
            }
            InputEvent::Unknown => {}
        }

        Ok(false)
    }
}
