use std::path::Path;

use crate::{GridError, OccupancyGrid};

/// Default map resolution in meters per pixel.
pub const DEFAULT_SCALE: f64 = 0.05;

/// Load an occupancy grid from an image file.
///
/// The image is reduced to 8-bit luminance and kept in image order, so the
/// top pixel row becomes grid row 0. Black pixels (0) are obstacles, any
/// other intensity is free.
pub fn load_occupancy_grid(path: impl AsRef<Path>, scale: f64) -> Result<OccupancyGrid, GridError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_luma8();
    let (width, height) = image.dimensions();
    let grid = OccupancyGrid::new(height as usize, width as usize, image.into_raw(), scale)?;

    tracing::info!(
        path = %path.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        scale,
        occupied = grid.occupied_count(),
        "loaded occupancy grid"
    );

    Ok(grid)
}
