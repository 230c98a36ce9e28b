//! Diverse alternative journeys by penalize-and-re-run.
//!
//! A greedy, practical approximation of k-shortest-paths: after each
//! accepted journey, every `(from, to, route)` traversal it used is added
//! to the avoid set, and the search runs again. The next result is not
//! guaranteed to be the true second-best path, only a sufficiently
//! different one.

use log::debug;

use crate::model::TransitGraph;
use crate::routing::path::{PathResult, ReconstructedPath, reconstruct_path};
use crate::routing::search::{AvoidSet, route_aware_search};
use crate::{MAX_ALTERNATIVES, StopId};

/// Up to [`MAX_ALTERNATIVES`] distinct transit-only journeys, best first.
/// Always returns at least one entry; a failed first search yields a
/// single not-found result.
pub(crate) fn transit_journeys(graph: &TransitGraph, start: StopId, end: StopId) -> Vec<PathResult> {
    // A stop is its own trivial journey; skip the search entirely.
    if start == end {
        if graph.node(start).is_none() {
            return vec![PathResult::not_found()];
        }
        return vec![PathResult::single_stop(start)];
    }

    // Fast negative result for endpoints that cannot lie on any journey:
    // an unknown stop, or an origin with no outgoing edges. A destination
    // served only by incoming edges is still reachable, so it is left to
    // the search itself.
    if graph.node(end).is_none() || graph.edges_from(start).is_empty() {
        return vec![PathResult::not_found()];
    }

    let mut avoid = AvoidSet::default();
    let mut accepted: Vec<ReconstructedPath> = Vec::new();

    for iteration in 0..MAX_ALTERNATIVES {
        let Some(outcome) = route_aware_search(graph, start, end, &avoid) else {
            break;
        };
        let Some(reconstructed) = reconstruct_path(graph, &outcome, start) else {
            break;
        };

        // A repeated signature means further iterations would only
        // reproduce it. Normal termination, not an error.
        if accepted
            .iter()
            .any(|previous| previous.signature == reconstructed.signature)
        {
            debug!("alternative {iteration} duplicates an accepted journey, stopping");
            break;
        }

        for &triple in &reconstructed.signature {
            avoid.insert(triple);
        }
        accepted.push(reconstructed);
    }

    if accepted.is_empty() {
        return vec![PathResult::not_found()];
    }
    accepted
        .into_iter()
        .map(|reconstructed| reconstructed.result)
        .collect()
}
