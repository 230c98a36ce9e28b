//! Loading the transit graph from the collaborator's JSON feed.
//!
//! The feed keys stops by string, but the id fields inside may be JSON
//! numbers or numeric strings. All ids are normalized to [`crate::StopId`]
//! here, before the graph invariants are checked.

mod de;
mod feed;

pub use feed::{
    FeedEdge, FeedStop, TransitFeed, transit_graph_from_feed, transit_graph_from_json,
    transit_graph_from_path,
};
