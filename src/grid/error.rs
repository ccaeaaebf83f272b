//! Error types for grid loading and discretization.

use thiserror::Error;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Everything that can stop the pipeline before geometry is built.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Cannot open file {path}: {source}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    #[error("Truncated data: expected {expected} values, found {actual}")]
    TruncatedData { expected: usize, actual: usize },
    #[error("Invalid value '{token}' at sample {index}")]
    InvalidValue { index: usize, token: String },
    #[error("Data range is degenerate (min {min}, max {max})")]
    DegenerateRange { min: f32, max: f32 },
    #[error("Bucket count must be at least 2, got {0}")]
    InvalidBucketCount(usize),
}
