//! Immutable stop/route graph with a spatial index over stop locations.

use std::collections::BTreeSet;

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use log::info;
use rstar::{AABB, RTree, primitives::GeomWithData};

use crate::{Error, RouteId, StopId};

/// Meters per degree of latitude, used to size spatial index queries
/// before the exact haversine check.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// A bus stop: location plus human-readable metadata. Never mutated
/// after graph construction.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: StopId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub township: Option<String>,
}

impl GraphNode {
    pub fn location(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// A directed edge to a neighboring stop. One edge may be served by
/// several parallel routes sharing the same road segment.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub to: StopId,
    /// Interned route indices serving this edge; sorted, deduplicated,
    /// never empty. Sorted indices mean lexicographic route-name order,
    /// which keeps route iteration deterministic.
    pub routes: Vec<RouteId>,
    pub distance_m: f64,
}

type StopLocation = GeomWithData<[f64; 2], StopId>;

/// Read-only transit network: all stops, the adjacency mapping, the
/// interned route-name table, and an R-tree over stop locations.
#[derive(Debug, Clone)]
pub struct TransitGraph {
    nodes: HashMap<StopId, GraphNode>,
    adjacency: HashMap<StopId, Vec<GraphEdge>>,
    route_names: Vec<String>,
    route_index: HashMap<String, RouteId>,
    rtree: RTree<StopLocation>,
}

impl TransitGraph {
    pub fn node(&self, stop: StopId) -> Option<&GraphNode> {
        self.nodes.get(&stop)
    }

    /// Outgoing edges of a stop. A stop with no adjacency entry yields
    /// an empty slice, not an error.
    pub fn edges_from(&self, stop: StopId) -> &[GraphEdge] {
        self.adjacency.get(&stop).map_or(&[], Vec::as_slice)
    }

    /// Resolve an interned route index back to its public name.
    pub fn route_name(&self, route: RouteId) -> &str {
        &self.route_names[route as usize]
    }

    pub fn route_id(&self, name: &str) -> Option<RouteId> {
        self.route_index.get(name).copied()
    }

    pub fn stop_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn route_count(&self) -> usize {
        self.route_names.len()
    }

    pub fn stop_ids(&self) -> impl Iterator<Item = StopId> + '_ {
        self.nodes.keys().copied()
    }

    /// All stops within `radius_m` meters of `center` by great-circle
    /// distance, sorted nearest first.
    ///
    /// The R-tree stores degrees, so the envelope query overshoots and
    /// every hit is verified with the haversine formula.
    pub fn stops_within(&self, center: Point<f64>, radius_m: f64) -> Vec<(StopId, f64)> {
        let lat_pad = radius_m / METERS_PER_DEGREE_LAT;
        let lng_scale = (METERS_PER_DEGREE_LAT * center.y().to_radians().cos().abs()).max(1.0);
        let lng_pad = radius_m / lng_scale;

        let envelope = AABB::from_corners(
            [center.x() - lng_pad, center.y() - lat_pad],
            [center.x() + lng_pad, center.y() + lat_pad],
        );

        let mut found: Vec<(StopId, f64)> = self
            .rtree
            .locate_in_envelope(&envelope)
            .filter_map(|location| {
                let point = Point::new(location.geom()[0], location.geom()[1]);
                let distance = Haversine.distance(center, point);
                (distance <= radius_m).then_some((location.data, distance))
            })
            .collect();

        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found
    }
}

struct EdgeSpec {
    from: StopId,
    to: StopId,
    routes: Vec<String>,
    distance_m: f64,
}

/// Builder validating the graph invariants before handing out a
/// [`TransitGraph`]. Construction fails with [`Error::MalformedGraph`]
/// if an edge references a stop that does not exist, lists no routes,
/// or carries a negative distance.
#[derive(Default)]
pub struct TransitGraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<EdgeSpec>,
}

impl TransitGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(mut self, node: GraphNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, from: StopId, to: StopId, routes: Vec<String>, distance_m: f64) -> Self {
        self.edges.push(EdgeSpec {
            from,
            to,
            routes,
            distance_m,
        });
        self
    }

    pub fn build(self) -> Result<TransitGraph, Error> {
        let mut nodes: HashMap<StopId, GraphNode> = HashMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            if nodes.insert(node.id, node).is_some() {
                return Err(Error::MalformedGraph(
                    "duplicate stop id in node set".to_string(),
                ));
            }
        }

        // Intern route names in sorted order so that indices compare
        // lexicographically by name.
        let names: BTreeSet<&str> = self
            .edges
            .iter()
            .flat_map(|edge| edge.routes.iter().map(String::as_str))
            .collect();
        let route_names: Vec<String> = names.into_iter().map(str::to_owned).collect();
        let route_index: HashMap<String, RouteId> = route_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx as RouteId))
            .collect();

        let mut adjacency: HashMap<StopId, Vec<GraphEdge>> = HashMap::new();
        for spec in self.edges {
            if !nodes.contains_key(&spec.from) {
                return Err(Error::MalformedGraph(format!(
                    "edge references unknown stop {}",
                    spec.from
                )));
            }
            if !nodes.contains_key(&spec.to) {
                return Err(Error::MalformedGraph(format!(
                    "edge {} -> {} references unknown stop {}",
                    spec.from, spec.to, spec.to
                )));
            }
            if spec.routes.is_empty() {
                return Err(Error::MalformedGraph(format!(
                    "edge {} -> {} lists no routes",
                    spec.from, spec.to
                )));
            }
            if !spec.distance_m.is_finite() || spec.distance_m < 0.0 {
                return Err(Error::MalformedGraph(format!(
                    "edge {} -> {} has invalid distance {}",
                    spec.from, spec.to, spec.distance_m
                )));
            }

            let mut routes: Vec<RouteId> = spec
                .routes
                .iter()
                .filter_map(|name| route_index.get(name).copied())
                .collect();
            routes.sort_unstable();
            routes.dedup();

            adjacency.entry(spec.from).or_default().push(GraphEdge {
                to: spec.to,
                routes,
                distance_m: spec.distance_m,
            });
        }

        let locations: Vec<StopLocation> = nodes
            .values()
            .map(|node| GeomWithData::new([node.lng, node.lat], node.id))
            .collect();
        let rtree = RTree::bulk_load(locations);

        let edge_count: usize = adjacency.values().map(Vec::len).sum();
        info!(
            "Transit graph built: {} stops, {} edges, {} routes",
            nodes.len(),
            edge_count,
            route_names.len()
        );

        Ok(TransitGraph {
            nodes,
            adjacency,
            route_names,
            route_index,
            rtree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: StopId, lat: f64, lng: f64) -> GraphNode {
        GraphNode {
            id,
            name: format!("Stop {id}"),
            lat,
            lng,
            township: None,
        }
    }

    fn routes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn builds_and_resolves_routes() {
        let graph = TransitGraphBuilder::new()
            .stop(node(1, 24.15, 120.65))
            .stop(node(2, 24.16, 120.66))
            .edge(1, 2, routes(&["9", "100"]), 500.0)
            .build()
            .unwrap();

        assert_eq!(graph.stop_count(), 2);
        assert_eq!(graph.route_count(), 2);

        let edges = graph.edges_from(1);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to, 2);

        // Interned in sorted name order: "100" < "9".
        let names: Vec<&str> = edges[0]
            .routes
            .iter()
            .map(|&r| graph.route_name(r))
            .collect();
        assert_eq!(names, vec!["100", "9"]);
    }

    #[test]
    fn missing_adjacency_is_empty_not_error() {
        let graph = TransitGraphBuilder::new()
            .stop(node(1, 0.0, 0.0))
            .build()
            .unwrap();
        assert!(graph.edges_from(1).is_empty());
        assert!(graph.edges_from(999).is_empty());
    }

    #[test]
    fn rejects_edge_to_unknown_stop() {
        let err = TransitGraphBuilder::new()
            .stop(node(1, 0.0, 0.0))
            .edge(1, 2, routes(&["5"]), 100.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn rejects_edge_from_unknown_stop() {
        let err = TransitGraphBuilder::new()
            .stop(node(2, 0.0, 0.0))
            .edge(1, 2, routes(&["5"]), 100.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn rejects_empty_route_list() {
        let err = TransitGraphBuilder::new()
            .stop(node(1, 0.0, 0.0))
            .stop(node(2, 0.0, 0.1))
            .edge(1, 2, vec![], 100.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn rejects_negative_distance() {
        let err = TransitGraphBuilder::new()
            .stop(node(1, 0.0, 0.0))
            .stop(node(2, 0.0, 0.1))
            .edge(1, 2, routes(&["5"]), -1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn rejects_duplicate_stop_id() {
        let err = TransitGraphBuilder::new()
            .stop(node(1, 0.0, 0.0))
            .stop(node(1, 1.0, 1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));
    }

    #[test]
    fn stops_within_sorts_by_distance_and_respects_radius() {
        // Roughly 111 m per 0.001 degree of latitude at the equator.
        let graph = TransitGraphBuilder::new()
            .stop(node(1, 0.0, 0.0))
            .stop(node(2, 0.001, 0.0)) // ~111 m
            .stop(node(3, 0.003, 0.0)) // ~334 m
            .stop(node(4, 0.01, 0.0)) // ~1.1 km, outside
            .build()
            .unwrap();

        let center = Point::new(0.0, 0.0);
        let nearby = graph.stops_within(center, 500.0);
        let ids: Vec<StopId> = nearby.iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(nearby[0].1 < 1.0);
        assert!(nearby.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
