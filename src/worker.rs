//! Worker-thread execution boundary.
//!
//! One dedicated thread owns a persistent shared graph and processes
//! queries strictly request/response: a second request issued before the
//! first completes is handled only after the first finishes. There is no
//! cancellation; a caller can only discard the eventual reply. Replies
//! are correlated to requests by `requestId` through a pending-reply
//! table, so the caller may consume them out of submission order.
//!
//! The message types serialize to the wire format the boundary speaks
//! when the two sides do not share memory: requests are tagged
//! `findPath`, replies `ready`/`result`/`error`. Within one process the
//! graph is never re-serialized per request; only the stop ids cross
//! the boundary.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use viabus_core::StopId;
use viabus_core::model::TransitGraph;
use viabus_core::routing::{PathResult, find_journeys};

/// Correlates an in-flight query with its eventual reply.
pub type RequestId = u64;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("worker thread is gone")]
    WorkerGone,
    #[error("query {0} failed in the worker: {1}")]
    QueryFailed(RequestId, String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkerRequest {
    FindPath {
        start_id: StopId,
        end_id: StopId,
        request_id: RequestId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkerReply {
    /// One-time startup broadcast, sent once the worker has loaded.
    Ready,
    Result {
        request_id: RequestId,
        results: Vec<PathResult>,
        /// Worker-side processing time, milliseconds.
        duration: u64,
    },
    Error {
        request_id: RequestId,
        message: String,
    },
}

impl WorkerReply {
    fn request_id(&self) -> Option<RequestId> {
        match self {
            WorkerReply::Ready => None,
            WorkerReply::Result { request_id, .. } | WorkerReply::Error { request_id, .. } => {
                Some(*request_id)
            }
        }
    }
}

/// Handle to the worker thread: submit queries, collect replies.
///
/// Dropping the handle closes the request channel, which terminates the
/// worker loop, and joins the thread.
pub struct JourneyWorker {
    requests: Option<Sender<WorkerRequest>>,
    replies: Receiver<WorkerReply>,
    /// Replies received while waiting for a different request id.
    pending: HashMap<RequestId, WorkerReply>,
    next_id: RequestId,
    handle: Option<JoinHandle<()>>,
}

impl JourneyWorker {
    /// Spawn the worker around a shared graph and block until its
    /// one-time ready signal arrives.
    pub fn spawn(graph: Arc<TransitGraph>) -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = channel();
        let (reply_tx, reply_rx) = channel();

        let handle = std::thread::spawn(move || worker_loop(&graph, &request_rx, &reply_tx));

        match reply_rx.recv() {
            Ok(WorkerReply::Ready) => {}
            _ => return Err(WorkerError::WorkerGone),
        }

        Ok(Self {
            requests: Some(request_tx),
            replies: reply_rx,
            pending: HashMap::new(),
            next_id: 0,
            handle: Some(handle),
        })
    }

    /// Queue a query and return the id its reply will carry.
    pub fn submit(&mut self, start: StopId, end: StopId) -> Result<RequestId, WorkerError> {
        let request_id = self.next_id;
        self.next_id += 1;

        let Some(requests) = self.requests.as_ref() else {
            return Err(WorkerError::WorkerGone);
        };
        requests
            .send(WorkerRequest::FindPath {
                start_id: start,
                end_id: end,
                request_id,
            })
            .map_err(|_| {
                self.pending.clear();
                WorkerError::WorkerGone
            })?;
        Ok(request_id)
    }

    /// Block until the reply for `request_id` arrives, buffering replies
    /// for other requests in the pending table.
    pub fn wait(&mut self, request_id: RequestId) -> Result<Vec<PathResult>, WorkerError> {
        loop {
            if let Some(reply) = self.pending.remove(&request_id) {
                return unpack(reply);
            }

            let reply = match self.replies.recv() {
                Ok(reply) => reply,
                Err(_) => {
                    // Unresolved requests can never complete now.
                    self.pending.clear();
                    return Err(WorkerError::WorkerGone);
                }
            };

            match reply.request_id() {
                Some(id) if id == request_id => return unpack(reply),
                Some(id) => {
                    self.pending.insert(id, reply);
                }
                None => {} // stray ready broadcast
            }
        }
    }

    /// Convenience round-trip: submit and wait.
    pub fn find_journeys(
        &mut self,
        start: StopId,
        end: StopId,
    ) -> Result<Vec<PathResult>, WorkerError> {
        let request_id = self.submit(start, end)?;
        self.wait(request_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for JourneyWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn unpack(reply: WorkerReply) -> Result<Vec<PathResult>, WorkerError> {
    match reply {
        WorkerReply::Result {
            request_id,
            results,
            duration,
        } => {
            debug!("request {request_id} completed in {duration} ms");
            Ok(results)
        }
        WorkerReply::Error {
            request_id,
            message,
        } => Err(WorkerError::QueryFailed(request_id, message)),
        WorkerReply::Ready => Err(WorkerError::WorkerGone),
    }
}

fn worker_loop(
    graph: &Arc<TransitGraph>,
    requests: &Receiver<WorkerRequest>,
    replies: &Sender<WorkerReply>,
) {
    info!(
        "journey worker ready over graph with {} stops",
        graph.stop_count()
    );
    if replies.send(WorkerReply::Ready).is_err() {
        return;
    }

    while let Ok(request) = requests.recv() {
        let WorkerRequest::FindPath {
            start_id,
            end_id,
            request_id,
        } = request;

        let started = Instant::now();
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| find_journeys(graph, start_id, end_id)));

        let reply = match outcome {
            Ok(results) => WorkerReply::Result {
                request_id,
                results,
                duration: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            },
            Err(_) => WorkerReply::Error {
                request_id,
                message: "journey search panicked".to_string(),
            },
        };

        if replies.send(reply).is_err() {
            break;
        }
    }
}
