//! Walking detours to nearby stops.
//!
//! After the transit-only journeys are known, this pass checks whether
//! boarding at a stop near the origin, alighting at a stop near the
//! destination, or both, yields a materially cheaper journey. "Nearby"
//! means within [`WALKING_RADIUS_METERS`] by great-circle distance and
//! having at least one outgoing edge.

use log::debug;

use crate::model::{GraphNode, TransitGraph};
use crate::routing::alternatives::transit_journeys;
use crate::routing::path::{PathResult, WalkingSuggestion};
use crate::{
    MAX_WALKING_CANDIDATES, MAX_WALKING_PAIR_CANDIDATES, STOP_COST, StopId, TRANSFER_COST,
    WALK_IMPROVEMENT_BOTH, WALK_IMPROVEMENT_SINGLE, WALKING_RADIUS_METERS,
    WALKING_SPEED_M_PER_MIN,
};

/// The comparable cost of a journey: transfers first, stops second.
pub(crate) fn journey_cost(result: &PathResult) -> u32 {
    result.transfers * TRANSFER_COST + result.total_stops * STOP_COST
}

struct Substitution {
    results: Vec<PathResult>,
    improvement: u32,
    origin: Option<WalkingSuggestion>,
    destination: Option<WalkingSuggestion>,
}

/// Try walking substitutions around both endpoints and return either the
/// original results or the substitute journey list with its walking
/// suggestion(s) attached to the first entry.
///
/// A single-end substitution must beat the best transit-only cost by
/// more than [`WALK_IMPROVEMENT_SINGLE`]; walking at both ends must beat
/// it by more than [`WALK_IMPROVEMENT_BOTH`]. Among accepted options the
/// largest improvement wins.
pub(crate) fn augment_with_walking(
    graph: &TransitGraph,
    start: StopId,
    end: StopId,
    results: Vec<PathResult>,
) -> Vec<PathResult> {
    let Some(best) = results.first() else {
        return results;
    };
    // Nothing to improve on a failed or trivial single-stop journey.
    if !best.found || best.segments.is_empty() {
        return results;
    }
    let (Some(start_node), Some(end_node)) = (graph.node(start), graph.node(end)) else {
        return results;
    };

    let best_cost = journey_cost(best);
    let origin_candidates = walking_candidates(graph, start_node, start);
    let destination_candidates = walking_candidates(graph, end_node, end);

    let mut chosen: Option<Substitution> = None;

    // Walk at the origin: board at a nearby stop instead.
    for &(alt, distance) in &origin_candidates {
        let candidate = transit_journeys(graph, alt, end);
        let Some(improvement) = improvement_over(best_cost, &candidate) else {
            continue;
        };
        if improvement <= WALK_IMPROVEMENT_SINGLE {
            continue;
        }
        if chosen.as_ref().is_none_or(|c| improvement > c.improvement) {
            chosen = Some(Substitution {
                results: candidate,
                improvement,
                origin: suggestion(graph, start, alt, distance),
                destination: None,
            });
        }
    }

    // Walk at the destination: alight at a nearby stop instead.
    for &(alt, distance) in &destination_candidates {
        let candidate = transit_journeys(graph, start, alt);
        let Some(improvement) = improvement_over(best_cost, &candidate) else {
            continue;
        };
        if improvement <= WALK_IMPROVEMENT_SINGLE {
            continue;
        }
        if chosen.as_ref().is_none_or(|c| improvement > c.improvement) {
            chosen = Some(Substitution {
                results: candidate,
                improvement,
                origin: None,
                destination: suggestion(graph, alt, end, distance),
            });
        }
    }

    // Walk at both ends. The doubled threshold stops two marginal legs
    // that would not qualify individually from slipping in together.
    for &(alt_origin, origin_distance) in
        origin_candidates.iter().take(MAX_WALKING_PAIR_CANDIDATES)
    {
        for &(alt_destination, destination_distance) in destination_candidates
            .iter()
            .take(MAX_WALKING_PAIR_CANDIDATES)
        {
            let candidate = transit_journeys(graph, alt_origin, alt_destination);
            let Some(improvement) = improvement_over(best_cost, &candidate) else {
                continue;
            };
            if improvement <= WALK_IMPROVEMENT_BOTH {
                continue;
            }
            if chosen.as_ref().is_none_or(|c| improvement > c.improvement) {
                chosen = Some(Substitution {
                    results: candidate,
                    improvement,
                    origin: suggestion(graph, start, alt_origin, origin_distance),
                    destination: suggestion(graph, alt_destination, end, destination_distance),
                });
            }
        }
    }

    match chosen {
        Some(substitution) => {
            debug!(
                "walking substitution for {start} -> {end} improves cost by {}",
                substitution.improvement
            );
            let mut results = substitution.results;
            if let Some(first) = results.first_mut() {
                first.walking_origin = substitution.origin;
                first.walking_destination = substitution.destination;
            }
            results
        }
        None => results,
    }
}

/// Nearby boarding candidates for one endpoint, nearest first: within
/// the walking radius, not the endpoint itself, and actually served by
/// at least one outgoing edge.
fn walking_candidates(
    graph: &TransitGraph,
    node: &GraphNode,
    exclude: StopId,
) -> Vec<(StopId, f64)> {
    graph
        .stops_within(node.location(), WALKING_RADIUS_METERS)
        .into_iter()
        .filter(|&(stop, _)| stop != exclude && !graph.edges_from(stop).is_empty())
        .take(MAX_WALKING_CANDIDATES)
        .collect()
}

/// Cost improvement of the candidate's best journey over `best_cost`,
/// or `None` when the candidate found nothing or is no better.
fn improvement_over(best_cost: u32, candidate: &[PathResult]) -> Option<u32> {
    let first = candidate.first()?;
    if !first.found {
        return None;
    }
    best_cost.checked_sub(journey_cost(first))
}

fn suggestion(
    graph: &TransitGraph,
    from: StopId,
    to: StopId,
    distance_m: f64,
) -> Option<WalkingSuggestion> {
    let from_node = graph.node(from)?;
    let to_node = graph.node(to)?;
    Some(WalkingSuggestion {
        from_stop_id: from,
        from_stop_name: from_node.name.clone(),
        to_stop_id: to,
        to_stop_name: to_node.name.clone(),
        distance_meters: distance_m,
        time_minutes: (distance_m / WALKING_SPEED_M_PER_MIN).ceil() as u32,
    })
}
