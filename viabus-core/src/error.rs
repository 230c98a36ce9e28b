use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed graph: {0}")]
    MalformedGraph(String),
    #[error("Invalid feed: {0}")]
    InvalidFeed(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
