// Re-export key components
pub use crate::error::Error;
pub use crate::loading::{
    TransitFeed, transit_graph_from_feed, transit_graph_from_json, transit_graph_from_path,
};
pub use crate::model::{GraphEdge, GraphNode, TransitGraph, TransitGraphBuilder};
pub use crate::routing::to_geojson::{path_result_to_geojson, path_result_to_geojson_string};
pub use crate::routing::{
    PathResult, PathSegment, WalkingSuggestion, find_journeys, find_journeys_one_to_many,
};

// Core identifier types
pub use crate::RouteId;
pub use crate::StopId;

// Cost model constants
pub use crate::{AVOID_PENALTY, MAX_ALTERNATIVES, STOP_COST, TRANSFER_COST};
