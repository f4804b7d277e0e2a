//! Occupancy grid: world/pixel transforms, collision queries, image map loading.
//!
//! # Invariants
//! - A grid is immutable once built and always has at least one cell.
//! - `scale > 0` and the world bounds always agree with the array size.
//! - Anything outside the grid is reported as a collision, never an error.

mod loader;
mod occupancy;

pub use loader::{DEFAULT_SCALE, load_occupancy_grid};
pub use occupancy::{CellIndex, OCCUPIED, OccupancyGrid};

/// Errors from building or loading a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    Empty { rows: usize, cols: usize },
    #[error("grid of {rows}x{cols} cells is too large")]
    TooLarge { rows: usize, cols: usize },
    #[error("data length {actual} does not match grid size {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}
