//! Error types for the TSP solvers.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, TspError>;

/// Errors raised while building cost matrices, validating inputs or loading instances
#[derive(Error, Debug)]
pub enum TspError {
    /// A location is not part of the cost matrix
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// A location appears more than once where uniqueness is required
    #[error("Duplicate location: {0}")]
    DuplicateLocation(String),

    /// The home location was passed among the locations to visit
    #[error("Home location {0} must not appear in the visit list")]
    HomeInVisitList(String),

    /// A cost is negative, infinite or NaN
    #[error("Invalid cost {cost} from {from} to {to}")]
    InvalidCost { from: String, to: String, cost: f64 },

    /// A directed pair has no cost
    #[error("Missing cost from {from} to {to}")]
    MissingCost { from: String, to: String },

    /// The cost rows do not form a square matrix over the labels
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Input too large for the requested algorithm
    #[error("{algorithm}: {requested} locations exceeds the limit of {limit}")]
    TooManyLocations {
        algorithm: String,
        requested: usize,
        limit: usize,
    },

    /// A route that does not form a closed tour over the requested locations
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// Malformed instance description
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
