//! Transfer-optimized public transit pathfinding.
//!
//! The engine answers one question: given a read-only graph of bus stops
//! connected by route edges, what is the journey between two stops that
//! minimizes route transfers first and stop count second? On top of the
//! single best journey it produces a small set of diverse alternatives
//! (by penalizing already-returned edges and re-running the search) and
//! checks whether walking to or from a nearby stop yields a materially
//! cheaper itinerary.
//!
//! The crate is organized like a loading/model/routing pipeline:
//! [`loading`] parses the collaborator's JSON feed and normalizes its
//! loosely-typed stop ids, [`model`] owns the immutable [`model::TransitGraph`],
//! and [`routing`] runs the route-aware search and its post-processing.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use model::{GraphEdge, GraphNode, TransitGraph, TransitGraphBuilder};
pub use routing::{
    PathResult, PathSegment, WalkingSuggestion, find_journeys, find_journeys_one_to_many,
};

/// Stop identifier. The feed mixes numeric and string representations of
/// the same id; everything is normalized to this type at the loading
/// boundary.
pub type StopId = u32;

/// Interned route index, dense per graph. Resolved back to the public
/// route name via [`TransitGraph::route_name`].
pub type RouteId = u32;

/// Cost of switching routes between two consecutive segments.
pub const TRANSFER_COST: u32 = 100;

/// Cost of traversing one edge of the graph.
pub const STOP_COST: u32 = 1;

/// Penalty for traversing an edge in the avoid set while generating
/// alternative journeys.
pub const AVOID_PENALTY: u32 = 2000;

/// Hard cap on dequeues in a single search. Exceeding it terminates the
/// search and is reported as "no path found".
pub const MAX_SEARCH_ITERATIONS: usize = 100_000;

/// Maximum number of alternative journeys returned per query.
pub const MAX_ALTERNATIVES: usize = 3;

/// Radius within which a stop counts as a walking candidate, meters.
pub const WALKING_RADIUS_METERS: f64 = 500.0;

/// Maximum nearby stops examined per endpoint when substituting a
/// walking leg at one end of the journey.
pub const MAX_WALKING_CANDIDATES: usize = 5;

/// Maximum nearby stops examined per endpoint for the combined
/// walk-at-both-ends case (checked pairwise).
pub const MAX_WALKING_PAIR_CANDIDATES: usize = 3;

/// Cost improvement a single-end walking substitution must exceed.
pub const WALK_IMPROVEMENT_SINGLE: u32 = 50;

/// Cost improvement a both-ends walking substitution must exceed.
/// Double the single-end threshold, so two marginal walking legs that
/// would not qualify individually are not accepted together.
pub const WALK_IMPROVEMENT_BOTH: u32 = 100;

/// Average walking speed, meters per minute (~4.8 km/h).
pub const WALKING_SPEED_M_PER_MIN: f64 = 80.0;
