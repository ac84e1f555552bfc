use std::sync::mpsc;
use std::time::Duration;
use termion::event::{Event, Key, MouseButton, MouseEvent};

use treequill::document::node::NodeId;
use treequill::document::sample::sample_tree;
use treequill::editor::mode::EditorMode;
use treequill::editor::state::EditorState;
use treequill::input::{InputEvent, InputHandler};
use treequill::input::keys::map_key_event;
use treequill::worker::Job;

fn handler() -> InputHandler {
    let (_tx, rx) = mpsc::channel();
    InputHandler::from_receiver(rx)
}

fn key(c: char) -> Event {
    Event::Key(Key::Char(c))
}

fn press(handler: &mut InputHandler, state: &mut EditorState, events: &[Event]) {
    for event in events {
        assert!(!handler.handle_event(event.clone(), state).unwrap());
    }
}

#[test]
fn test_same_key_maps_differently_in_sidebar() {
    let idle = EditorMode::Idle;
    let input = EditorMode::AwaitingInput {
        parent_id: NodeId::from(1),
    };
    assert_eq!(map_key_event(key('q'), &idle), InputEvent::Quit);
    assert_eq!(map_key_event(key('q'), &input), InputEvent::InsertCharacter('q'));
    assert_eq!(map_key_event(key('+'), &idle), InputEvent::Add);
    assert_eq!(map_key_event(key('\n'), &input), InputEvent::Submit);
    assert_eq!(map_key_event(Event::Key(Key::Esc), &input), InputEvent::Cancel);
}

#[test]
fn test_wheel_maps_to_scroll() {
    let mode = EditorMode::Idle;
    assert_eq!(
        map_key_event(
            Event::Mouse(MouseEvent::Press(MouseButton::WheelDown, 1, 1)),
            &mode
        ),
        InputEvent::ScrollDown
    );
    assert_eq!(
        map_key_event(
            Event::Mouse(MouseEvent::Press(MouseButton::WheelUp, 1, 1)),
            &mode
        ),
        InputEvent::ScrollUp
    );
}

#[test]
fn test_quit_keys() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());
    assert!(handler.handle_event(key('q'), &mut state).unwrap());
    assert!(handler
        .handle_event(Event::Key(Key::Ctrl('c')), &mut state)
        .unwrap());
}

#[test]
fn test_navigation_moves_selection() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    press(&mut handler, &mut state, &[key('j'), key('j')]);
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(3)));

    press(&mut handler, &mut state, &[key('G')]);
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(6)));

    press(&mut handler, &mut state, &[key('g')]);
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(0)));
}

#[test]
fn test_typed_title_becomes_create_request() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    press(&mut handler, &mut state, &[key('j'), key('+')]);
    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(1)
        }
    );

    press(
        &mut handler,
        &mut state,
        &[key('H'), key('i'), key('x'), Event::Key(Key::Backspace)],
    );
    assert_eq!(state.sidebar().title().text(), "Hi");

    press(&mut handler, &mut state, &[key('\n')]);
    assert!(matches!(state.mode(), EditorMode::AwaitingCreate { .. }));

    let requests = state.drain_requests();
    assert_eq!(requests.len(), 1);
    match &requests[0].job {
        Job::Create(node) => {
            assert_eq!(node.parent_id, NodeId::from(1));
            assert_eq!(node.title, "Hi");
            assert!(node.avatar_file.is_none());
        }
        other => panic!("unexpected job {:?}", other),
    }
}

#[test]
fn test_avatar_field_after_tab() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    press(&mut handler, &mut state, &[key('a'), key('A'), key('\t')]);
    for c in "/tmp/x.png".chars() {
        press(&mut handler, &mut state, &[key(c)]);
    }
    press(&mut handler, &mut state, &[key('\n')]);

    let requests = state.drain_requests();
    match &requests[0].job {
        Job::Create(node) => {
            assert_eq!(node.parent_id, NodeId::from(0));
            assert_eq!(node.title, "A");
            assert_eq!(
                node.avatar_file.as_deref(),
                Some(std::path::Path::new("/tmp/x.png"))
            );
        }
        other => panic!("unexpected job {:?}", other),
    }
}

#[test]
fn test_escape_cancels_sidebar() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    press(&mut handler, &mut state, &[key('+'), key('x'), Event::Key(Key::Esc)]);
    assert!(state.mode().is_idle());
    assert_eq!(state.queued_requests(), 0);
}

#[test]
fn test_delete_key_on_root_does_nothing() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    press(&mut handler, &mut state, &[key('-')]);
    assert!(state.mode().is_idle());
    assert_eq!(state.queued_requests(), 0);
}

#[test]
fn test_click_on_add_control() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    // Terminal coordinates are 1-based: column 15 row 2 is NODE 1's [+].
    let click = Event::Mouse(MouseEvent::Press(MouseButton::Left, 15, 2));
    press(&mut handler, &mut state, &[click]);

    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(1)
        }
    );
}

#[test]
fn test_mouse_disabled_ignores_clicks() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());
    state.set_enable_mouse(false);

    let click = Event::Mouse(MouseEvent::Press(MouseButton::Left, 15, 2));
    press(&mut handler, &mut state, &[click]);

    assert!(state.mode().is_idle());
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(0)));
}

#[test]
fn test_any_key_closes_help() {
    let mut handler = handler();
    let mut state = EditorState::new(sample_tree());

    press(&mut handler, &mut state, &[key('?')]);
    assert!(state.show_help());

    press(&mut handler, &mut state, &[key('+')]);
    assert!(!state.show_help());
    assert!(state.mode().is_idle());
}

#[test]
fn test_poll_event_delivers_and_times_out() {
    let (tx, rx) = mpsc::channel();
    let mut handler = InputHandler::from_receiver(rx);

    tx.send(Ok(key('j'))).unwrap();
    assert_eq!(
        handler.poll_event(Duration::from_millis(10)).unwrap(),
        Some(key('j'))
    );
    assert_eq!(handler.poll_event(Duration::from_millis(10)).unwrap(), None);

    drop(tx);
    assert!(handler.poll_event(Duration::from_millis(10)).is_err());
}
