//! Synchronous, same-thread query adapter.

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use viabus_core::model::TransitGraph;
use viabus_core::routing::PathResult;
use viabus_core::{StopId, routing};

/// Direct-call adapter: runs the whole pipeline in the caller's thread.
///
/// Holds the graph behind an [`Arc`] so the same instance can also back
/// a [`crate::JourneyWorker`] without copying.
#[derive(Debug, Clone)]
pub struct JourneyPlanner {
    graph: Arc<TransitGraph>,
}

impl JourneyPlanner {
    pub fn new(graph: TransitGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }

    pub fn from_shared(graph: Arc<TransitGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Arc<TransitGraph> {
        &self.graph
    }

    /// Best-first journeys between two stops; see
    /// [`viabus_core::routing::find_journeys`].
    pub fn find_journeys(&self, start: StopId, end: StopId) -> Vec<PathResult> {
        let started = Instant::now();
        let results = routing::find_journeys(&self.graph, start, end);
        debug!(
            "inline query {start} -> {end} took {:?}",
            started.elapsed()
        );
        results
    }

    pub fn find_journeys_one_to_many(
        &self,
        start: StopId,
        ends: &[StopId],
    ) -> Vec<Vec<PathResult>> {
        routing::find_journeys_one_to_many(&self.graph, start, ends)
    }
}
