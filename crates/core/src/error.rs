//! Error types for phenoscope

use thiserror::Error;

/// Main error type for phenoscope operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid matrix dimensions: {days} days x {samples} samples")]
    InvalidDimensions { days: usize, samples: usize },

    #[error("Series length mismatch: expected {expected} daily rows, got {got}")]
    SeriesLength { expected: usize, got: usize },

    #[error("Unknown sample: {0}")]
    UnknownSample(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A pairwise metric referenced an event that is not in the event table.
    #[error("Event not found in event table: {0}")]
    EventNotFound(String),

    /// Valley-to-valley detection found no peak, or a peak with no bounding valley.
    #[error("Degenerate extremum: {0}")]
    DegenerateExtremum(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for phenoscope operations
pub type Result<T> = std::result::Result<T, Error>;
