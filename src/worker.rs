//! Background execution of service calls.
//!
//! The UI thread never waits on the network. It hands [`Request`]s to a
//! [`Worker`], which posts a [`Response`] for each. The UI loop drains
//! responses on every tick.
//!
//! The worker runs two lanes, each a thread working through its queue in
//! order: one for tree jobs (fetch, create, delete) and one for avatar
//! fetches. A create or delete never waits behind an image.
//!
//! Requests cannot be cancelled. If the UI is gone by the time a response is
//! ready, the response is dropped and the lane stops.

use crate::document::node::{Node, NodeId};
use crate::service::{Avatar, NewNode, ServiceError, TreeService};
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::cell::Cell;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Tag tying a response to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A service call to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    FetchTree,
    Create(NewNode),
    Delete(NodeId),
    FetchAvatar(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub job: Job,
}

/// Result of a service call.
#[derive(Debug)]
pub enum Outcome {
    /// Result of a fetch, create or delete: the full tree on success
    Tree(Result<Node, ServiceError>),
    /// Result of an avatar fetch for the given node
    Avatar(NodeId, Result<Avatar, ServiceError>),
}

#[derive(Debug)]
pub struct Response {
    pub id: RequestId,
    pub outcome: Outcome,
}

/// Runs one request against a service.
pub fn execute(service: &dyn TreeService, request: Request) -> Response {
    debug!("Executing request {}: {:?}", request.id, request.job);
    let outcome = match request.job {
        Job::FetchTree => Outcome::Tree(service.fetch_tree()),
        Job::Create(node) => Outcome::Tree(service.add_node(&node)),
        Job::Delete(id) => Outcome::Tree(service.delete_node(&id)),
        Job::FetchAvatar(id) => {
            let result = service.fetch_avatar(&id);
            Outcome::Avatar(id, result)
        }
    };
    Response {
        id: request.id,
        outcome,
    }
}

/// Which queue a job runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Tree,
    Avatar,
}

impl Job {
    pub fn lane(&self) -> Lane {
        match self {
            Job::FetchAvatar(_) => Lane::Avatar,
            Job::FetchTree | Job::Create(_) | Job::Delete(_) => Lane::Tree,
        }
    }
}

/// Handle to the worker threads.
pub struct Worker {
    tree_jobs: Sender<Request>,
    avatar_jobs: Sender<Request>,
    responses: Receiver<Response>,
    disconnected: Cell<bool>,
}

fn spawn_lane(
    name: &str,
    service: Arc<dyn TreeService>,
    requests: Receiver<Request>,
    responses: Sender<Response>,
) -> Result<()> {
    let lane = name.to_string();
    thread::Builder::new()
        .name(format!("treequill-{}", name))
        .spawn(move || {
            info!("Service worker {} started", lane);
            for request in requests {
                let response = execute(service.as_ref(), request);
                if responses.send(response).is_err() {
                    info!("Service worker {}: response channel closed", lane);
                    break;
                }
            }
            info!("Service worker {} stopped", lane);
        })
        .with_context(|| format!("Failed to start service worker {}", name))?;
    Ok(())
}

impl Worker {
    /// Starts the worker threads, sharing `service` between them.
    pub fn spawn(service: Box<dyn TreeService>) -> Result<Self> {
        let service: Arc<dyn TreeService> = Arc::from(service);
        let (tree_tx, tree_rx) = mpsc::channel::<Request>();
        let (avatar_tx, avatar_rx) = mpsc::channel::<Request>();
        let (response_tx, response_rx) = mpsc::channel::<Response>();

        spawn_lane("tree", Arc::clone(&service), tree_rx, response_tx.clone())?;
        spawn_lane("avatar", service, avatar_rx, response_tx)?;

        Ok(Self {
            tree_jobs: tree_tx,
            avatar_jobs: avatar_tx,
            responses: response_rx,
            disconnected: Cell::new(false),
        })
    }

    /// Queues a request on the lane its job belongs to.
    pub fn submit(&self, request: Request) {
        let id = request.id;
        let queue = match request.job.lane() {
            Lane::Tree => &self.tree_jobs,
            Lane::Avatar => &self.avatar_jobs,
        };
        if queue.send(request).is_err() {
            error!("Service worker is gone; dropping request {}", id);
        }
    }

    /// Returns the next finished response, if any, without blocking.
    pub fn try_recv(&self) -> Option<Response> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.disconnected.replace(true) {
                    error!("Service worker threads have stopped; no more responses will arrive");
                }
                None
            }
        }
    }

    /// True once every worker thread has exited.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.get()
    }

    /// Waits up to `timeout` for the next response.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Response> {
        self.responses.recv_timeout(timeout).ok()
    }
}
