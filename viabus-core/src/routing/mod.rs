//! Journey planning: route-aware search, alternatives, and walking
//! augmentation, composed into the query pipeline.

mod alternatives;
mod path;
mod queue;
mod search;
pub mod to_geojson;
mod walking;

pub use path::{PathResult, PathSegment, WalkingSuggestion};

use log::debug;
use rayon::prelude::*;

use crate::StopId;
use crate::model::TransitGraph;

/// Compute up to [`crate::MAX_ALTERNATIVES`] journeys from `start` to
/// `end`, best first, with walking detours attached when they yield a
/// materially better journey.
///
/// The pipeline is pure given the graph and the two stop ids; the graph
/// is never mutated, so concurrent calls over one shared graph are safe.
pub fn find_journeys(graph: &TransitGraph, start: StopId, end: StopId) -> Vec<PathResult> {
    let transit = alternatives::transit_journeys(graph, start, end);
    let results = walking::augment_with_walking(graph, start, end, transit);
    debug!(
        "query {start} -> {end}: {} result(s), best found={}",
        results.len(),
        results.first().is_some_and(|r| r.found)
    );
    results
}

/// Bulk variant of [`find_journeys`] for one origin and many
/// destinations, evaluated in parallel over the shared read-only graph.
pub fn find_journeys_one_to_many(
    graph: &TransitGraph,
    start: StopId,
    ends: &[StopId],
) -> Vec<Vec<PathResult>> {
    ends.par_iter()
        .map(|&end| find_journeys(graph, start, end))
        .collect()
}
