//! Data model for the transit network.
//!
//! The graph is constructed once from the collaborator's feed and is
//! read-only for the lifetime of every query, so it can be shared across
//! concurrent queries without locking.

pub mod graph;

pub use graph::{GraphEdge, GraphNode, TransitGraph, TransitGraphBuilder};
