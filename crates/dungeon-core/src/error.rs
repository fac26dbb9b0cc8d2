use thiserror::Error;

/// Errors raised by puzzle construction, resizing and loading.
///
/// Out-of-bounds access, refused edits and unsolved grids are not errors;
/// they are reported through return values.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// A grid must have at least one row and one column.
    #[error("invalid puzzle dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimension { rows: isize, cols: isize },

    #[error("malformed puzzle data: {0}")]
    Json(#[from] serde_json::Error),
}
