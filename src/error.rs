use thiserror::Error;

/// Errors raised by the grid compiler, the symmetry engine and the
/// persistence helpers built on top of them.
#[derive(Debug, Error)]
pub enum CrosswordError {
    /// The block array does not hold exactly `size * size` cells.
    #[error("invalid grid dimensions: expected {expected} cells, got {actual}")]
    InvalidGridDimensions { expected: usize, actual: usize },

    /// `size * size` does not fit in a `usize`.
    #[error("grid size {size} is too large")]
    GridTooLarge { size: usize },

    /// A cell index outside `[0, size * size)`.
    #[error("invalid cell index {index} for a grid of {cells} cells")]
    InvalidCellIndex { index: usize, cells: usize },

    /// A symmetry token other than `r`, `h`, `v`, `all` or `none`.
    #[error("invalid symmetry mode '{0}'")]
    InvalidSymmetryMode(String),

    #[error("invalid grid encoding: {0}")]
    InvalidGridEncoding(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrosswordError>;
