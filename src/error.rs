//! Error types for the clustering engine.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TileClusterError>;

/// Errors surfaced at the crate's construction and serialization boundaries.
///
/// Tile requests themselves never fail; an empty dataset is a successful
/// response with zero features, not an error.
#[derive(Error, Debug)]
pub enum TileClusterError {
    /// Input rejected by a validating constructor.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tile address outside the quadtree grid it claims to belong to.
    #[error("Invalid tile address: {0}")]
    InvalidTile(String),

    /// Wire serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for everything else.
    #[error("{0}")]
    Other(String),
}
