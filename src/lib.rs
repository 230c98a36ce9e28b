//! Platform adapters over the `viabus_core` journey engine.
//!
//! The engine itself is a pure function of a read-only graph and two
//! stop ids, so it can run wherever the caller wants: [`planner`] is the
//! direct function-call adapter for synchronous use, and [`worker`]
//! dispatches queries to a dedicated thread behind a request/response
//! protocol so a latency-sensitive caller is never blocked by a heavy
//! search.

pub mod planner;
pub mod worker;

pub use planner::JourneyPlanner;
pub use worker::{JourneyWorker, RequestId, WorkerError, WorkerReply, WorkerRequest};

pub use viabus_core::prelude::*;
