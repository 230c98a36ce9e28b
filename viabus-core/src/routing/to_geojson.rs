//! GeoJSON rendering of journey results for the map UI collaborator.

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::model::TransitGraph;
use crate::routing::path::{PathResult, PathSegment, WalkingSuggestion};
use crate::Error;

/// Convert one journey to a `FeatureCollection`: a LineString feature
/// per ridden segment plus one per walking leg.
///
/// # Errors
///
/// Returns [`Error::MalformedGraph`] if the result references a stop the
/// graph does not know, which indicates the result was produced against
/// a different graph.
pub fn path_result_to_geojson(
    graph: &TransitGraph,
    result: &PathResult,
) -> Result<FeatureCollection, Error> {
    let mut features = Vec::new();

    if let Some(walk) = &result.walking_origin {
        features.push(create_walk_feature(graph, walk, "origin_walk")?);
    }

    for (idx, segment) in result.segments.iter().enumerate() {
        features.push(create_segment_feature(graph, idx, segment)?);
    }

    if let Some(walk) = &result.walking_destination {
        features.push(create_walk_feature(graph, walk, "destination_walk")?);
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn path_result_to_geojson_string(
    graph: &TransitGraph,
    result: &PathResult,
) -> Result<String, Error> {
    Ok(serde_json::to_string(&path_result_to_geojson(
        graph, result,
    )?)?)
}

fn stop_coord(graph: &TransitGraph, stop: crate::StopId) -> Result<Coord<f64>, Error> {
    graph
        .node(stop)
        .map(|node| node.location().into())
        .ok_or_else(|| Error::MalformedGraph(format!("result references unknown stop {stop}")))
}

fn create_segment_feature(
    graph: &TransitGraph,
    leg_idx: usize,
    segment: &PathSegment,
) -> Result<Feature, Error> {
    let coords = vec![
        stop_coord(graph, segment.from)?,
        stop_coord(graph, segment.to)?,
    ];
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": "transit",
            "leg_index": leg_idx,
            "route_used": segment.route_used,
            "routes": segment.routes,
            "from_name": segment.from_name,
            "to_name": segment.to_name,
            "distance": segment.distance,
            "is_transfer_point": segment.is_transfer_point,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::MalformedGraph(e.to_string()))
}

fn create_walk_feature(
    graph: &TransitGraph,
    walk: &WalkingSuggestion,
    leg_type: &str,
) -> Result<Feature, Error> {
    let coords = vec![
        stop_coord(graph, walk.from_stop_id)?,
        stop_coord(graph, walk.to_stop_id)?,
    ];
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": leg_type,
            "from_name": walk.from_stop_name,
            "to_name": walk.to_stop_name,
            "distance": walk.distance_meters,
            "time_minutes": walk.time_minutes,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::MalformedGraph(e.to_string()))
}
