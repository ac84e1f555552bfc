use std::thread;
use std::time::{Duration, Instant};
use treequill::document::node::{Node, NodeId};
use treequill::document::sample::sample_tree;
use treequill::service::memory::InMemoryTreeService;
use treequill::service::{Avatar, NewNode, ServiceError, TreeService};
use treequill::worker::{Job, Outcome, Request, RequestId, Worker};

/// In-memory service whose avatar endpoint takes `delay` per call.
struct SlowAvatars {
    inner: InMemoryTreeService,
    delay: Duration,
}

impl TreeService for SlowAvatars {
    fn fetch_tree(&self) -> Result<Node, ServiceError> {
        self.inner.fetch_tree()
    }

    fn add_node(&self, node: &NewNode) -> Result<Node, ServiceError> {
        self.inner.add_node(node)
    }

    fn delete_node(&self, id: &NodeId) -> Result<Node, ServiceError> {
        self.inner.delete_node(id)
    }

    fn fetch_avatar(&self, id: &NodeId) -> Result<Avatar, ServiceError> {
        thread::sleep(self.delay);
        self.inner.fetch_avatar(id)
    }
}

/// Service that panics on every call.
struct Broken;

impl TreeService for Broken {
    fn fetch_tree(&self) -> Result<Node, ServiceError> {
        panic!("fetch_tree");
    }

    fn add_node(&self, _node: &NewNode) -> Result<Node, ServiceError> {
        panic!("add_node");
    }

    fn delete_node(&self, _id: &NodeId) -> Result<Node, ServiceError> {
        panic!("delete_node");
    }

    fn fetch_avatar(&self, _id: &NodeId) -> Result<Avatar, ServiceError> {
        panic!("fetch_avatar");
    }
}

fn recv(worker: &Worker) -> treequill::worker::Response {
    worker
        .recv_timeout(Duration::from_secs(5))
        .expect("worker response")
}

#[test]
fn test_worker_answers_in_submission_order() {
    let worker = Worker::spawn(Box::new(InMemoryTreeService::new(&sample_tree()))).unwrap();

    worker.submit(Request {
        id: RequestId(1),
        job: Job::Create(NewNode::new(NodeId::from(6), "Leaf")),
    });
    worker.submit(Request {
        id: RequestId(2),
        job: Job::Delete(NodeId::from(8)),
    });
    worker.submit(Request {
        id: RequestId(3),
        job: Job::FetchTree,
    });

    let first = recv(&worker);
    assert_eq!(first.id, RequestId(1));
    assert!(matches!(first.outcome, Outcome::Tree(Ok(_))));

    let second = recv(&worker);
    assert_eq!(second.id, RequestId(2));

    let third = recv(&worker);
    assert_eq!(third.id, RequestId(3));
    match third.outcome {
        Outcome::Tree(Ok(root)) => {
            let six = root
                .children
                .iter()
                .find(|n| n.id == NodeId::from(6))
                .unwrap();
            assert!(six.children.is_empty());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_avatar_outcome_names_node() {
    let worker = Worker::spawn(Box::new(InMemoryTreeService::new(&sample_tree()))).unwrap();
    worker.submit(Request {
        id: RequestId(9),
        job: Job::FetchAvatar(NodeId::from(3)),
    });

    let response = recv(&worker);
    assert_eq!(response.id, RequestId(9));
    match response.outcome {
        Outcome::Avatar(id, result) => {
            assert_eq!(id, NodeId::from(3));
            assert!(result.is_err());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_try_recv_empty() {
    let worker = Worker::spawn(Box::new(InMemoryTreeService::new(&sample_tree()))).unwrap();
    assert!(worker.try_recv().is_none());
}

#[test]
fn test_create_does_not_wait_for_avatars() {
    let worker = Worker::spawn(Box::new(SlowAvatars {
        inner: InMemoryTreeService::new(&sample_tree()),
        delay: Duration::from_secs(2),
    }))
    .unwrap();

    for (n, id) in [0i64, 1, 2].into_iter().enumerate() {
        worker.submit(Request {
            id: RequestId(n as u64 + 1),
            job: Job::FetchAvatar(NodeId::from(id)),
        });
    }
    let started = Instant::now();
    worker.submit(Request {
        id: RequestId(4),
        job: Job::Create(NewNode::new(NodeId::from(1), "Leaf")),
    });

    let first = recv(&worker);
    assert_eq!(first.id, RequestId(4));
    assert!(matches!(first.outcome, Outcome::Tree(Ok(_))));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_lanes_route_jobs() {
    use treequill::worker::Lane;

    assert_eq!(Job::FetchTree.lane(), Lane::Tree);
    assert_eq!(Job::Delete(NodeId::from(3)).lane(), Lane::Tree);
    assert_eq!(Job::FetchAvatar(NodeId::from(3)).lane(), Lane::Avatar);
}

#[test]
fn test_disconnect_is_reported() {
    let worker = Worker::spawn(Box::new(Broken)).unwrap();
    worker.submit(Request {
        id: RequestId(1),
        job: Job::FetchTree,
    });
    worker.submit(Request {
        id: RequestId(2),
        job: Job::FetchAvatar(NodeId::from(1)),
    });

    let deadline = Instant::now() + Duration::from_secs(5);
    while !worker.is_disconnected() && Instant::now() < deadline {
        assert!(worker.try_recv().is_none());
        thread::sleep(Duration::from_millis(10));
    }
    assert!(worker.is_disconnected());
}
