//! Error types for the associative-memory engine.

use thiserror::Error;

/// Engine error types.
///
/// Training rejections (`DegeneratePattern`, `Duplicate`, `CapacityExceeded`,
/// `DimensionMismatch`) leave all state untouched. `Busy` means another
/// recall or training call is in flight. `RecallFailure` is fatal to one
/// recall only.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Pattern has no active (+1) element
    #[error("Degenerate pattern: no active element")]
    DegeneratePattern,

    /// Pattern is already stored
    #[error("Duplicate pattern: already stored")]
    Duplicate,

    /// Store is full
    #[error("Capacity exceeded: store already holds {capacity} patterns")]
    CapacityExceeded { capacity: usize },

    /// Pattern length differs from the store dimension
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Element outside {-1, +1}
    #[error("Invalid value {value} at index {index}: expected -1 or 1")]
    InvalidValue { index: usize, value: i8 },

    /// Grid cell outside the editor bounds
    #[error("Cell ({row}, {col}) outside the grid")]
    CellOutOfRange { row: usize, col: usize },

    /// A recall or training call is already in flight
    #[error("Engine busy: a recall is in progress")]
    Busy,

    /// Recall requested before any pattern was learned
    #[error("No patterns learned yet")]
    NoPatterns,

    /// Unexpected condition during a sweep
    #[error("Recall failed: {0}")]
    RecallFailure(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (config files, worker spawn)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
