//! Journey results and reconstruction of the winning backtrace.

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::TransitGraph;
use crate::routing::search::SearchOutcome;
use crate::{RouteId, StopId};

/// One traversed edge of a journey, annotated with the route actually
/// used and whether the rider changes routes right after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    pub from: StopId,
    pub to: StopId,
    pub from_name: String,
    pub to_name: String,
    /// Names of every route serving this edge.
    pub routes: Vec<String>,
    pub distance: f64,
    pub route_used: String,
    pub is_transfer_point: bool,
}

/// A walking detour attached to a journey: walk between `from_stop_id`
/// and `to_stop_id` instead of riding from/to the originally requested
/// stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkingSuggestion {
    pub from_stop_id: StopId,
    pub from_stop_name: String,
    pub to_stop_id: StopId,
    pub to_stop_name: String,
    pub distance_meters: f64,
    pub time_minutes: u32,
}

/// One ranked journey, produced fresh per query. Field names match the
/// wire format consumed by the UI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    pub found: bool,
    /// Visited stops in order, origin included.
    pub path: Vec<StopId>,
    pub segments: Vec<PathSegment>,
    pub total_distance: f64,
    /// Number of edges traversed.
    pub total_stops: u32,
    pub transfers: u32,
    /// Route to board first, if any.
    pub suggested_route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walking_origin: Option<WalkingSuggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walking_destination: Option<WalkingSuggestion>,
}

impl PathResult {
    /// Normal negative result: no journey exists.
    pub fn not_found() -> Self {
        Self {
            found: false,
            path: Vec::new(),
            segments: Vec::new(),
            total_distance: 0.0,
            total_stops: 0,
            transfers: 0,
            suggested_route: None,
            walking_origin: None,
            walking_destination: None,
        }
    }

    /// Trivial journey from a stop to itself.
    pub fn single_stop(stop: StopId) -> Self {
        Self {
            found: true,
            path: vec![stop],
            segments: Vec::new(),
            total_distance: 0.0,
            total_stops: 0,
            transfers: 0,
            suggested_route: None,
            walking_origin: None,
            walking_destination: None,
        }
    }
}

/// A reconstructed journey plus its identity for diversity checks: the
/// ordered `(from, to, route)` triples actually traversed.
pub(crate) struct ReconstructedPath {
    pub result: PathResult,
    pub signature: Vec<(StopId, StopId, RouteId)>,
}

/// Walk the per-state parent chain back to `start` and emit ordered,
/// annotated segments.
///
/// Transfer points are marked after the full sequence is known: segment
/// `i` is a transfer point when its route differs from segment `i + 1`'s.
/// The `transfers` count is recomputed from those marks rather than
/// reusing the search's internal counter, so duplicate-cost states can
/// never make the two disagree.
pub(crate) fn reconstruct_path(
    graph: &TransitGraph,
    outcome: &SearchOutcome,
    start: StopId,
) -> Option<ReconstructedPath> {
    let mut triples: Vec<(StopId, StopId, RouteId)> = Vec::new();

    let origin = (start, None);
    let mut key = outcome.end_state;
    while key != origin {
        let Some(&(parent, route)) = outcome.parents.get(&key) else {
            warn!("broken parent chain at stop {} during reconstruction", key.0);
            return None;
        };
        triples.push((parent.0, key.0, route));
        key = parent;
    }
    triples.reverse();

    let mut path = Vec::with_capacity(triples.len() + 1);
    path.push(start);

    let mut segments = Vec::with_capacity(triples.len());
    let mut total_distance = 0.0;

    for &(from, to, route) in &triples {
        let from_node = graph.node(from)?;
        let to_node = graph.node(to)?;
        let edge = graph
            .edges_from(from)
            .iter()
            .find(|edge| edge.to == to && edge.routes.contains(&route))?;

        total_distance += edge.distance_m;
        path.push(to);
        segments.push(PathSegment {
            from,
            to,
            from_name: from_node.name.clone(),
            to_name: to_node.name.clone(),
            routes: edge
                .routes
                .iter()
                .map(|&r| graph.route_name(r).to_string())
                .collect(),
            distance: edge.distance_m,
            route_used: graph.route_name(route).to_string(),
            is_transfer_point: false,
        });
    }

    let marks: Vec<bool> = triples
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.2 != b.2)
        .collect();
    for (segment, is_transfer) in segments.iter_mut().zip(marks) {
        segment.is_transfer_point = is_transfer;
    }

    let transfers = segments.iter().filter(|s| s.is_transfer_point).count() as u32;
    let suggested_route = triples
        .first()
        .map(|&(_, _, route)| graph.route_name(route).to_string());

    Some(ReconstructedPath {
        result: PathResult {
            found: true,
            total_stops: segments.len() as u32,
            path,
            total_distance,
            transfers,
            suggested_route,
            segments,
            walking_origin: None,
            walking_destination: None,
        },
        signature: triples,
    })
}
