//! End-to-end pipeline behavior over a feed-ingested graph.

use viabus::{
    JourneyPlanner, PathResult, find_journeys, transit_graph_from_json,
};

const FEED: &str = r#"{
    "nodes": {
        "1": {"id": 1, "name": "A", "lat": 24.137, "lng": 120.686},
        "2": {"id": "2", "name": "B", "lat": 24.141, "lng": 120.690},
        "3": {"id": 3, "name": "C", "lat": 24.145, "lng": 120.694},
        "4": {"id": 4, "name": "D", "lat": 24.300, "lng": 120.800},
        "5": {"id": 5, "name": "E", "lat": 24.304, "lng": 120.804}
    },
    "adjacency": {
        "1": [{"to": 2, "routes": ["1"], "distance": 500.0, "route_count": 1}],
        "2": [{"to": 3, "routes": ["2"], "distance": 500.0, "route_count": 1}],
        "3": [{"to": 2, "routes": ["2"], "distance": 500.0}],
        "4": [{"to": 5, "routes": ["7"], "distance": 400.0}],
        "5": [{"to": 4, "routes": ["7"], "distance": 400.0}]
    }
}"#;

fn signature(result: &PathResult) -> Vec<(u32, u32, String)> {
    result
        .segments
        .iter()
        .map(|s| (s.from, s.to, s.route_used.clone()))
        .collect()
}

#[test]
fn two_leg_journey_with_one_transfer() {
    let graph = transit_graph_from_json(FEED).unwrap();
    let results = find_journeys(&graph, 1, 3);

    let best = &results[0];
    assert!(best.found);
    assert_eq!(best.path, vec![1, 2, 3]);
    assert_eq!(best.transfers, 1);
    assert_eq!(best.total_stops, 2);
    assert_eq!(best.suggested_route.as_deref(), Some("1"));
    assert!((best.total_distance - 1000.0).abs() < f64::EPSILON);
}

#[test]
fn journey_to_self_is_trivial() {
    let graph = transit_graph_from_json(FEED).unwrap();

    for stop in [1, 2, 3, 4, 5] {
        let results = find_journeys(&graph, stop, stop);
        assert_eq!(results.len(), 1);
        let only = &results[0];
        assert!(only.found);
        assert_eq!(only.path, vec![stop]);
        assert_eq!(only.transfers, 0);
        assert_eq!(only.total_distance, 0.0);
    }
}

#[test]
fn disconnected_components_yield_not_found() {
    let graph = transit_graph_from_json(FEED).unwrap();
    let results = find_journeys(&graph, 1, 4);

    assert_eq!(results.len(), 1);
    assert!(!results[0].found);
    assert!(results[0].segments.is_empty());
    assert!(results[0].path.is_empty());
}

#[test]
fn endpoint_without_adjacency_yields_not_found() {
    let json = r#"{
        "nodes": {
            "1": {"id": 1, "name": "A", "lat": 0.0, "lng": 0.0},
            "2": {"id": 2, "name": "B", "lat": 0.0, "lng": 0.5},
            "3": {"id": 3, "name": "C", "lat": 0.5, "lng": 0.0}
        },
        "adjacency": {
            "1": [{"to": 2, "routes": ["1"], "distance": 100.0}]
        }
    }"#;
    let graph = transit_graph_from_json(json).unwrap();

    // Stop 3 is completely isolated.
    assert!(!find_journeys(&graph, 1, 3)[0].found);

    // A start without outgoing edges cannot begin a journey.
    assert!(!find_journeys(&graph, 2, 1)[0].found);

    // A destination served only by incoming edges is still reachable.
    let results = find_journeys(&graph, 1, 2);
    assert!(results[0].found);
    assert_eq!(results[0].path, vec![1, 2]);
}

#[test]
fn transfers_always_equal_marked_transfer_points() {
    let graph = transit_graph_from_json(FEED).unwrap();

    for (start, end) in [(1, 3), (1, 2), (4, 5), (2, 3)] {
        for result in find_journeys(&graph, start, end) {
            let marked = result
                .segments
                .iter()
                .filter(|s| s.is_transfer_point)
                .count() as u32;
            assert_eq!(result.transfers, marked, "query {start} -> {end}");
        }
    }
}

#[test]
fn parallel_routes_need_no_transfer() {
    let json = r#"{
        "nodes": {
            "1": {"id": 1, "name": "A", "lat": 0.0, "lng": 0.0},
            "2": {"id": 2, "name": "B", "lat": 0.0, "lng": 0.5}
        },
        "adjacency": {
            "1": [{"to": 2, "routes": ["1", "2"], "distance": 100.0}],
            "2": [{"to": 1, "routes": ["1", "2"], "distance": 100.0}]
        }
    }"#;
    let graph = transit_graph_from_json(json).unwrap();
    let results = find_journeys(&graph, 1, 2);

    let best = &results[0];
    assert!(best.found);
    assert_eq!(best.transfers, 0);
    assert_eq!(best.total_stops, 1);
    let suggested = best.suggested_route.as_deref().unwrap();
    assert!(suggested == "1" || suggested == "2");
    assert_eq!(best.segments[0].routes, vec!["1", "2"]);
}

#[test]
fn alternatives_are_pairwise_distinct() {
    // A grid with several genuinely different paths from 1 to 4.
    let json = r#"{
        "nodes": {
            "1": {"id": 1, "name": "A", "lat": 0.0, "lng": 0.0},
            "2": {"id": 2, "name": "B", "lat": 0.1, "lng": 0.1},
            "3": {"id": 3, "name": "C", "lat": 0.2, "lng": 0.2},
            "4": {"id": 4, "name": "D", "lat": 0.3, "lng": 0.3}
        },
        "adjacency": {
            "1": [
                {"to": 4, "routes": ["a"], "distance": 900.0},
                {"to": 2, "routes": ["b"], "distance": 400.0},
                {"to": 3, "routes": ["c"], "distance": 400.0}
            ],
            "2": [{"to": 4, "routes": ["b"], "distance": 400.0}],
            "3": [{"to": 4, "routes": ["c"], "distance": 500.0}],
            "4": [{"to": 1, "routes": ["a"], "distance": 900.0}]
        }
    }"#;
    let graph = transit_graph_from_json(json).unwrap();
    let results = find_journeys(&graph, 1, 4);

    assert!(results.len() > 1 && results.len() <= 3);
    for i in 0..results.len() {
        for j in (i + 1)..results.len() {
            assert_ne!(signature(&results[i]), signature(&results[j]));
        }
    }
    // Ordered best first.
    assert_eq!(results[0].total_stops, 1);
}

#[test]
fn path_result_wire_shape_matches_collaborator_contract() {
    let graph = transit_graph_from_json(FEED).unwrap();
    let results = find_journeys(&graph, 1, 3);
    let json = serde_json::to_value(&results[0]).unwrap();

    for key in [
        "found",
        "path",
        "segments",
        "totalDistance",
        "totalStops",
        "transfers",
        "suggestedRoute",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    let segment = &json["segments"][0];
    for key in [
        "from",
        "to",
        "fromName",
        "toName",
        "routes",
        "distance",
        "routeUsed",
        "isTransferPoint",
    ] {
        assert!(segment.get(key).is_some(), "missing segment key {key}");
    }
}

#[test]
fn planner_adapter_returns_engine_results() {
    let graph = transit_graph_from_json(FEED).unwrap();
    let expected = find_journeys(&graph, 1, 3);

    let planner = JourneyPlanner::new(graph);
    assert_eq!(planner.find_journeys(1, 3), expected);

    let bulk = planner.find_journeys_one_to_many(1, &[2, 3]);
    assert_eq!(bulk.len(), 2);
    assert_eq!(bulk[1], expected);
}
