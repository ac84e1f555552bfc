use treequill::document::node::{Node, NodeId};
use treequill::document::sample::sample_tree;
use treequill::document::tree::NodeTree;
use treequill::editor::mode::EditorMode;
use treequill::editor::state::EditorState;
use treequill::service::http::parse_snapshot;
use treequill::service::memory::InMemoryTreeService;
use treequill::service::{ServiceError, TreeService};
use treequill::worker::{execute, Job, Outcome, Request, RequestId, Response};

fn loaded(json: &str, root_id: i64) -> EditorState {
    let mut state = EditorState::new(NodeTree::empty(NodeId::from(root_id)));
    let request = state.load_tree().unwrap();
    state.complete(Response {
        id: request,
        outcome: Outcome::Tree(parse_snapshot(json)),
    });
    assert_eq!(state.mode(), &EditorMode::Idle);
    state
}

fn only_request(state: &mut EditorState) -> Request {
    let mut requests = state.drain_requests();
    assert_eq!(requests.len(), 1, "{:?}", requests);
    requests.remove(0)
}

fn titles(state: &EditorState) -> Vec<(usize, String)> {
    state
        .tree_view()
        .lines()
        .iter()
        .map(|line| (line.depth, line.title.clone()))
        .collect()
}

fn all_controls_disabled(state: &EditorState) -> bool {
    state
        .tree_view()
        .lines()
        .iter()
        .all(|line| !line.add.is_enabled() && !line.delete.is_enabled())
}

#[test]
fn test_add_scenario_root_a_b() {
    let mut state = loaded(
        r#"{"id":0,"title":"ROOT","children":[{"id":1,"title":"A","children":[]}]}"#,
        0,
    );
    assert_eq!(titles(&state), vec![(0, "ROOT".into()), (1, "A".into())]);

    // "+" on node 1
    state.select_row(1);
    assert!(state.activate_add_at_cursor());
    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(1)
        }
    );

    state.sidebar_mut().insert('B');
    assert!(state.submit_sidebar());
    let request = only_request(&mut state);
    match &request.job {
        Job::Create(node) => {
            assert_eq!(node.parent_id, NodeId::from(1));
            assert_eq!(node.title, "B");
            assert!(node.avatar_file.is_none());
        }
        other => panic!("unexpected job {:?}", other),
    }

    state.complete(Response {
        id: request.id,
        outcome: Outcome::Tree(parse_snapshot(
            r#"{"id":0,"title":"ROOT","children":[{"id":1,"title":"A","children":[{"id":2,"title":"B","children":[]}]}]}"#,
        )),
    });

    assert_eq!(state.mode(), &EditorMode::Idle);
    assert_eq!(
        titles(&state),
        vec![(0, "ROOT".into()), (1, "A".into()), (2, "B".into())]
    );
    assert_eq!(
        state.tree().parent_of(&NodeId::from(2)).map(|n| n.id.clone()),
        Some(NodeId::from(1))
    );
}

#[test]
fn test_request_add_disables_every_control() {
    let mut state = EditorState::new(sample_tree());
    assert!(state.request_add(NodeId::from(5)));

    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(5)
        }
    );
    assert!(all_controls_disabled(&state));
    assert!(state.drain_requests().is_empty());
}

#[test]
fn test_intents_ignored_outside_idle() {
    let mut state = EditorState::new(sample_tree());
    assert!(state.request_add(NodeId::from(5)));

    assert!(!state.request_add(NodeId::from(6)));
    assert!(!state.request_delete(Some(NodeId::from(0)), NodeId::from(6)));
    assert!(!state.activate_delete_at_cursor());
    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(5)
        }
    );
}

#[test]
fn test_cancel_sidebar_returns_to_idle_without_request() {
    let mut state = EditorState::new(sample_tree());
    state.request_add(NodeId::from(5));
    state.sidebar_mut().insert('x');

    assert!(state.cancel_sidebar());
    assert_eq!(state.mode(), &EditorMode::Idle);
    assert!(state.drain_requests().is_empty());
    assert_eq!(state.sidebar().title().text(), "");
    assert!(!all_controls_disabled(&state));
}

#[test]
fn test_create_success_replaces_snapshot() {
    let mut state = EditorState::new(sample_tree());
    state.request_add(NodeId::from(6));
    state.submit_sidebar();
    let request = only_request(&mut state);
    assert!(all_controls_disabled(&state));

    let replacement = Node::new(0, "ROOT").with_children(vec![Node::new(6, "NODE 6")
        .with_children(vec![Node::new(8, "Node")])]);
    state.complete(Response {
        id: request.id,
        outcome: Outcome::Tree(Ok(replacement.clone())),
    });

    assert_eq!(state.tree().root(), Some(&replacement));
    assert_eq!(state.mode(), &EditorMode::Idle);
    assert!(state.tree_view().lines()[1].add.is_enabled());
}

#[test]
fn test_create_failure_keeps_snapshot() {
    let mut state = EditorState::new(sample_tree());
    let before = state.tree().clone();

    state.request_add(NodeId::from(6));
    state.submit_sidebar();
    let request = only_request(&mut state);
    state.complete(Response {
        id: request.id,
        outcome: Outcome::Tree(Err(ServiceError::Status {
            status: 500,
            body: "boom".into(),
        })),
    });

    assert_eq!(state.tree(), &before);
    assert_eq!(state.mode(), &EditorMode::Idle);
    assert!(!all_controls_disabled(&state));
}

#[test]
fn test_delete_uses_returned_snapshot() {
    let mut state = EditorState::new(sample_tree());
    let row = state.tree_view().position_of(&NodeId::from(7)).unwrap();
    state.select_row(row);
    assert!(state.activate_delete_at_cursor());
    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingDelete {
            id: NodeId::from(7),
            parent_id: Some(NodeId::from(5)),
            request: RequestId(1),
        }
    );

    let request = only_request(&mut state);
    assert_eq!(request.job, Job::Delete(NodeId::from(7)));

    // Service state is authoritative: apply the delete there, not locally
    let service = InMemoryTreeService::new(&sample_tree());
    let response = execute(&service, request);
    state.complete(response);

    assert!(!state.tree().contains(&NodeId::from(7)));
    assert_eq!(state.tree().root(), Some(&service.snapshot()));
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(5)));
}

#[test]
fn test_root_delete_refused() {
    let mut state = EditorState::new(sample_tree());
    assert!(!state.request_delete(None, NodeId::from(0)));
    assert!(!state.activate_delete_at_cursor());
    assert_eq!(state.mode(), &EditorMode::Idle);
    assert!(state.drain_requests().is_empty());
}

#[test]
fn test_stale_response_ignored() {
    let mut state = EditorState::new(sample_tree());
    let before = state.tree().clone();
    let request = state.load_tree().unwrap();

    state.complete(Response {
        id: RequestId(request.0 + 100),
        outcome: Outcome::Tree(Ok(Node::new(0, "OTHER"))),
    });
    assert_eq!(state.mode(), &EditorMode::Loading { request });
    assert_eq!(state.tree(), &before);

    state.complete(Response {
        id: request,
        outcome: Outcome::Tree(Ok(Node::new(0, "NEW"))),
    });
    assert_eq!(state.tree().root().unwrap().title, "NEW");

    // A late duplicate after returning to idle changes nothing
    state.complete(Response {
        id: request,
        outcome: Outcome::Tree(Ok(Node::new(0, "LATE"))),
    });
    assert_eq!(state.tree().root().unwrap().title, "NEW");
}

#[test]
fn test_failed_initial_load_leaves_empty_tree() {
    let mut state = EditorState::new(NodeTree::empty(NodeId::from(1)));
    let request = state.load_tree().unwrap();
    state.complete(Response {
        id: request,
        outcome: Outcome::Tree(Err(ServiceError::Malformed("eof".into()))),
    });

    assert!(state.tree().is_empty());
    assert!(state.tree_view().lines().is_empty());
    assert_eq!(state.mode(), &EditorMode::Idle);
    assert!(state.cursor().selected().is_none());
}

#[test]
fn test_click_on_add_control() {
    let mut state = EditorState::new(sample_tree());
    // Line 1 is "  [-] NODE 1 [+] #1": add control at columns 13..16
    assert!(state.click(14, 1));
    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(1)
        }
    );
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(1)));
}

#[test]
fn test_click_on_add_control_after_wide_title() {
    let mut state = EditorState::new(NodeTree::new(
        Node::new(0, "ROOT").with_children(vec![Node::new(1, "日本語")]),
        NodeId::from(0),
    ));
    // "  [-] 日本語 [+] #1": each of the three characters takes two cells
    assert!(state.click(14, 1));
    assert_eq!(
        state.mode(),
        &EditorMode::AwaitingInput {
            parent_id: NodeId::from(1)
        }
    );
}

#[test]
fn test_click_on_title_only_selects() {
    let mut state = EditorState::new(sample_tree());
    assert!(!state.click(7, 2));
    assert_eq!(state.mode(), &EditorMode::Idle);
    assert_eq!(state.cursor().selected(), Some(&NodeId::from(3)));
}

#[test]
fn test_avatar_requests_follow_mounted_nodes() {
    let mut state = EditorState::new(NodeTree::new(
        Node::new(1, "ROOT").with_children(vec![Node::new(2, "A")]),
        NodeId::from(1),
    ));
    state.set_load_avatars(true);

    let requests = state.drain_requests();
    let fetched: Vec<Job> = requests.iter().map(|r| r.job.clone()).collect();
    assert_eq!(
        fetched,
        vec![
            Job::FetchAvatar(NodeId::from(1)),
            Job::FetchAvatar(NodeId::from(2))
        ]
    );
    assert_eq!(state.avatars().len(), 2);

    // Node 2 leaves the snapshot: its handle is released and its late
    // response is dropped
    let reload = state.load_tree().unwrap();
    state.complete(Response {
        id: reload,
        outcome: Outcome::Tree(Ok(Node::new(1, "ROOT"))),
    });
    assert_eq!(state.avatars().len(), 1);

    let late = requests[1].clone();
    state.complete(execute(&InMemoryTreeService::new(&sample_tree()), late));
    assert_eq!(state.avatars().len(), 1);
}
