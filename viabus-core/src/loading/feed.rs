use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::de;
use crate::model::{GraphNode, TransitGraph, TransitGraphBuilder};
use crate::{Error, StopId};

/// Raw mirror of the ingestion format:
///
/// ```json
/// {
///   "nodes": { "<stopId>": {"id", "name", "lat", "lng", "township"}, ... },
///   "adjacency": { "<stopId>": [ {"to", "routes", "distance", "route_count"}, ... ], ... }
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransitFeed {
    pub nodes: HashMap<String, FeedStop>,
    pub adjacency: HashMap<String, Vec<FeedEdge>>,
}

#[derive(Debug, Deserialize)]
pub struct FeedStop {
    #[serde(deserialize_with = "de::stop_id")]
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub township: Option<String>,
}

/// One adjacency entry. `route_count` is derivable from `routes` and is
/// ignored, as are any other unknown fields.
#[derive(Debug, Deserialize)]
pub struct FeedEdge {
    #[serde(deserialize_with = "de::stop_id")]
    pub to: StopId,
    pub routes: Vec<String>,
    pub distance: f64,
}

/// Build a validated [`TransitGraph`] from a parsed feed.
///
/// # Errors
///
/// Returns [`Error::InvalidFeed`] when a map key is not an integer or
/// disagrees with the node's own `id` field, and [`Error::MalformedGraph`]
/// when the graph invariants fail (unknown edge endpoint, empty route
/// list, negative distance).
pub fn transit_graph_from_feed(feed: TransitFeed) -> Result<TransitGraph, Error> {
    let mut builder = TransitGraphBuilder::new();

    for (key, stop) in feed.nodes {
        let key_id = de::parse_stop_id(&key)?;
        if key_id != stop.id {
            return Err(Error::InvalidFeed(format!(
                "node key {key_id} disagrees with its id field {}",
                stop.id
            )));
        }
        builder = builder.stop(GraphNode {
            id: stop.id,
            name: stop.name,
            lat: stop.lat,
            lng: stop.lng,
            township: stop.township,
        });
    }

    for (key, edges) in feed.adjacency {
        let from = de::parse_stop_id(&key)?;
        for edge in edges {
            builder = builder.edge(from, edge.to, edge.routes, edge.distance);
        }
    }

    builder.build()
}

pub fn transit_graph_from_json(json: &str) -> Result<TransitGraph, Error> {
    let feed: TransitFeed = serde_json::from_str(json)?;
    transit_graph_from_feed(feed)
}

pub fn transit_graph_from_path(path: &Path) -> Result<TransitGraph, Error> {
    info!("Loading transit feed from {}", path.display());
    let json = fs::read_to_string(path)?;
    transit_graph_from_json(&json)
}
