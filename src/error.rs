//! Error types for koza
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for dataset construction and queries
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DatasetError {
    /// The target vector does not have one value per row
    #[error("Shape mismatch: {rows} rows but {targets} target values")]
    ShapeMismatch { rows: usize, targets: usize },

    /// A row does not have the same width as the first one
    #[error("Ragged rows: row {row} has {actual} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A prediction row does not have the training width
    #[error("Feature mismatch: expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// The dataset has no rows
    #[error("Dataset is empty")]
    Empty,

    /// Binary classification targets outside {0, 1}
    #[error("Binary targets must be coded 0 or 1, found {0:?}")]
    NonBinaryTarget(Vec<f64>),

    /// Class count requested on a continuous target
    #[error("Target is not discrete")]
    NotDiscrete,

    /// More rows requested than available when sampling without replacement
    #[error("Cannot sample {requested} rows from a dataset of {available}")]
    SampleTooLarge { requested: usize, available: usize },
}

/// Error type for metric evaluation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    /// Truth and prediction lengths differ
    #[error("Length mismatch: expected {expected} predictions, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Weight vector does not match the number of observations
    #[error("Weights mismatch: expected {expected} weights, got {actual}")]
    WeightsMismatch { expected: usize, actual: usize },

    /// No observations were given
    #[error("Cannot compute a metric on empty input")]
    Empty,

    /// The metric name is not registered
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

/// Error type for parsing operators from their textual form
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Input ended while an expression was expected
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start or continue an expression
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedChar { position: usize, found: char },

    /// The name is not in the operator registry
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// A function was given the wrong number of operands
    #[error("Operator {name} expects {expected} operands, got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A numeric literal could not be read
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Input remained after a complete expression
    #[error("Trailing input at position {0}")]
    TrailingInput(usize),
}

/// Top-level error type for genetic programming operations
#[derive(Debug, Error)]
pub enum GpError {
    /// Dataset error
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Metric error
    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// No program is available because no search has completed
    #[error("The GP has not been trained yet")]
    NotFitted,

    /// The target has more than two distinct values under a classification metric
    #[error("Multi-class classification is not supported ({0} distinct classes)")]
    MultiClass(usize),

    /// A constant vector does not match the program's constant leaves
    #[error("Constant count mismatch: program has {expected} constants, got {actual}")]
    ConstantCount { expected: usize, actual: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// Configuration (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for genetic programming operations
pub type GpResult<T> = Result<T, GpError>;
