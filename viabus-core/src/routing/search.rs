//! Route-aware state-space Dijkstra.
//!
//! The explored state is `(stop, current route)`, not merely the stop:
//! two arrivals at the same stop on different routes have different costs
//! for leaving it (transfer vs. continue), so they are tracked, costed,
//! and back-traced independently.

use hashbrown::{HashMap, HashSet, hash_map::Entry};
use log::warn;

use crate::model::TransitGraph;
use crate::routing::queue::MinQueue;
use crate::{AVOID_PENALTY, MAX_SEARCH_ITERATIONS, RouteId, STOP_COST, StopId, TRANSFER_COST};

/// Search state key: the stop and the route used to arrive there.
/// `None` only for the origin, before any route is boarded.
pub(crate) type StateKey = (StopId, Option<RouteId>);

/// Edge traversals to penalize, as `(from, to, route)` triples. Used to
/// steer the search away from already-returned journeys.
pub(crate) type AvoidSet = HashSet<(StopId, StopId, RouteId)>;

/// The winning destination state with its parent links.
pub(crate) struct SearchOutcome {
    pub end_state: StateKey,
    pub cost: u32,
    /// Parent per state key: the predecessor state and the route taken
    /// on the edge into this state. Keyed per state, not per stop, so
    /// two arrival routes at the same stop cannot corrupt each other's
    /// backtrace.
    pub parents: HashMap<StateKey, (StateKey, RouteId)>,
}

/// Find the minimum-cost path from `start` to `end`.
///
/// Costs accumulate per traversed edge: one [`STOP_COST`] per hop, one
/// [`TRANSFER_COST`] when the edge's route differs from the route used
/// to arrive, and [`AVOID_PENALTY`] when the traversal is in `avoid`.
/// All increments are non-negative, so dequeued costs are non-decreasing
/// and the search can terminate once the dequeued cost exceeds the best
/// cost recorded at `end` under any arrival route.
///
/// Returns `None` when `end` is unreachable or the iteration cap fires.
/// Trivial queries (`start == end`, endpoints without adjacency) are
/// handled by the caller and never reach this function.
pub(crate) fn route_aware_search(
    graph: &TransitGraph,
    start: StopId,
    end: StopId,
    avoid: &AvoidSet,
) -> Option<SearchOutcome> {
    let mut queue = MinQueue::new();
    let mut visited: HashMap<StateKey, u32> = HashMap::new();
    let mut parents: HashMap<StateKey, (StateKey, RouteId)> = HashMap::new();

    let origin: StateKey = (start, None);
    visited.insert(origin, 0);
    queue.push(origin, 0);

    let mut best_end: Option<(StateKey, u32)> = None;
    let mut iterations = 0usize;

    while let Some((key, cost)) = queue.pop() {
        iterations += 1;
        if iterations > MAX_SEARCH_ITERATIONS {
            warn!(
                "search {start} -> {end} exceeded {MAX_SEARCH_ITERATIONS} iterations, giving up"
            );
            return None;
        }

        // Stale duplicate left behind by a later improvement.
        if visited.get(&key).is_some_and(|&best| cost > best) {
            continue;
        }

        // The heap dequeues in non-decreasing cost order, so nothing
        // from here on can beat a destination cost already committed.
        if let Some((_, best_cost)) = best_end {
            if cost > best_cost {
                break;
            }
        }

        let (stop, current_route) = key;

        if stop == end {
            if best_end.is_none_or(|(_, best_cost)| cost < best_cost) {
                best_end = Some((key, cost));
            }
            continue;
        }

        for edge in graph.edges_from(stop) {
            for &route in &edge.routes {
                let is_transfer = current_route.is_some_and(|current| current != route);
                let mut new_cost = cost + STOP_COST;
                if is_transfer {
                    new_cost += TRANSFER_COST;
                }
                if avoid.contains(&(stop, edge.to, route)) {
                    new_cost += AVOID_PENALTY;
                }

                let next: StateKey = (edge.to, Some(route));
                match visited.entry(next) {
                    Entry::Vacant(slot) => {
                        slot.insert(new_cost);
                        parents.insert(next, (key, route));
                        queue.push(next, new_cost);
                    }
                    Entry::Occupied(mut slot) => {
                        if new_cost < *slot.get() {
                            *slot.get_mut() = new_cost;
                            parents.insert(next, (key, route));
                            queue.push(next, new_cost);
                        }
                    }
                }
            }
        }
    }

    best_end.map(|(end_state, cost)| SearchOutcome {
        end_state,
        cost,
        parents,
    })
}
