use crate::GridError;

/// Grid value marking an obstacle. Any other value is free space.
pub const OCCUPIED: u8 = 0;

/// A (row, col) index into the grid.
///
/// Signed so that coordinates left of or above the map stay visibly out of
/// range instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub row: i64,
    pub col: i64,
}

impl CellIndex {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

fn cell_count(rows: usize, cols: usize) -> Result<usize, GridError> {
    rows.checked_mul(cols).ok_or(GridError::TooLarge { rows, cols })
}

/// Immutable occupancy grid with image-style storage.
///
/// Row 0 is the top of the map: increasing row index means decreasing y.
/// Cell values use image polarity, `0` is an obstacle and anything else is
/// free. Bounds are `x_max = cols * scale` and `y_max = rows * scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
    scale: f64,
    x_max: f64,
    y_max: f64,
}

impl OccupancyGrid {
    /// Build a grid from row-major `data`.
    pub fn new(rows: usize, cols: usize, data: Vec<u8>, scale: f64) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty { rows, cols });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GridError::InvalidScale(scale));
        }
        let expected = cell_count(rows, cols)?;
        if data.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            rows,
            cols,
            data,
            scale,
            x_max: cols as f64 * scale,
            y_max: rows as f64 * scale,
        })
    }

    /// Build a grid from nested rows, top row first.
    pub fn from_rows(rows: Vec<Vec<u8>>, scale: f64) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(height * width);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    actual: cells.len(),
                });
            }
            data.extend(cells);
        }
        Self::new(height, width, data, scale)
    }

    /// A grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: u8, scale: f64) -> Result<Self, GridError> {
        let data = vec![value; cell_count(rows, cols)?];
        Self::new(rows, cols, data, scale)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Meters per cell.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Raw row-major cell values, top row first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Cell value, or `None` outside the grid.
    pub fn value(&self, row: i64, col: i64) -> Option<u8> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.data[row * self.cols + col])
    }

    /// Convert world coordinates to a cell index.
    ///
    /// Both axes truncate toward zero, so a point less than one cell left of
    /// `x = 0` (or above `y_max`) still lands in column (row) 0.
    pub fn map_to_pixel(&self, x: f64, y: f64) -> CellIndex {
        CellIndex {
            row: ((self.y_max - y) / self.scale) as i64,
            col: (x / self.scale) as i64,
        }
    }

    /// World coordinates of a cell's top-left corner.
    ///
    /// Not an exact inverse of [`map_to_pixel`](Self::map_to_pixel): a round
    /// trip snaps to the cell corner and may move a point by up to one cell
    /// in each axis.
    pub fn pixel_to_map(&self, cell: CellIndex) -> (f64, f64) {
        (
            cell.col as f64 * self.scale,
            self.y_max - cell.row as f64 * self.scale,
        )
    }

    /// Whether a point is blocked. Points outside the grid count as blocked.
    pub fn in_collision(&self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return true;
        }
        let cell = self.map_to_pixel(x, y);
        match self.value(cell.row, cell.col) {
            Some(v) => v == OCCUPIED,
            None => true,
        }
    }

    /// Number of obstacle cells.
    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == OCCUPIED).count()
    }

    /// Fraction of cells that are free, in `[0, 1]`.
    pub fn free_fraction(&self) -> f64 {
        1.0 - self.occupied_count() as f64 / self.data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREE: u8 = 255;

    fn free_grid(rows: usize, cols: usize, scale: f64) -> OccupancyGrid {
        OccupancyGrid::filled(rows, cols, FREE, scale).unwrap()
    }

    #[test]
    fn bounds_follow_dimensions() {
        let grid = free_grid(4, 10, 0.5);
        assert_eq!(grid.x_max(), 5.0);
        assert_eq!(grid.y_max(), 2.0);
        assert_eq!(grid.data().len(), 40);
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(
            OccupancyGrid::new(0, 5, Vec::new(), 1.0),
            Err(GridError::Empty { rows: 0, cols: 5 })
        ));
        assert!(matches!(
            OccupancyGrid::from_rows(Vec::new(), 1.0),
            Err(GridError::Empty { .. })
        ));
    }

    #[test]
    fn rejects_bad_scale() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                OccupancyGrid::filled(2, 2, FREE, scale),
                Err(GridError::InvalidScale(_))
            ));
        }
    }

    #[test]
    fn rejects_size_mismatch() {
        let err = OccupancyGrid::new(2, 2, vec![FREE; 3], 1.0).unwrap_err();
        assert!(matches!(
            err,
            GridError::SizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let err = OccupancyGrid::new(usize::MAX / 2, 3, Vec::new(), 1.0).unwrap_err();
        assert!(matches!(err, GridError::TooLarge { cols: 3, .. }));
        assert!(matches!(
            OccupancyGrid::filled(usize::MAX, 2, FREE, 1.0),
            Err(GridError::TooLarge { .. })
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = OccupancyGrid::from_rows(vec![vec![FREE; 3], vec![FREE; 2]], 1.0).unwrap_err();
        assert!(matches!(err, GridError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn map_to_pixel_flips_vertical_axis() {
        let grid = free_grid(10, 10, 1.0);
        // Bottom-left corner of the world is the last row.
        assert_eq!(grid.map_to_pixel(0.5, 0.5), CellIndex::new(9, 0));
        // Top-left is row 0.
        assert_eq!(grid.map_to_pixel(0.5, 9.5), CellIndex::new(0, 0));
        assert_eq!(grid.map_to_pixel(3.7, 6.2), CellIndex::new(3, 3));
    }

    #[test]
    fn map_to_pixel_truncates_toward_zero() {
        let grid = free_grid(10, 10, 1.0);
        // -0.5 truncates to 0, not floor's -1.
        assert_eq!(grid.map_to_pixel(-0.5, 5.5).col, 0);
        assert_eq!(grid.map_to_pixel(-1.5, 5.5).col, -1);
        // Above the top edge, still truncates into row 0.
        assert_eq!(grid.map_to_pixel(0.0, 10.4).row, 0);
        assert_eq!(grid.map_to_pixel(2.99, 5.0).col, 2);
    }

    #[test]
    fn pixel_to_map_returns_cell_corner() {
        let grid = free_grid(10, 10, 0.5);
        assert_eq!(grid.pixel_to_map(CellIndex::new(0, 0)), (0.0, 5.0));
        assert_eq!(grid.pixel_to_map(CellIndex::new(9, 3)), (1.5, 0.5));
    }

    #[test]
    fn round_trip_within_one_cell() {
        let grid = free_grid(10, 20, 0.05);
        let scale = grid.scale();
        let mut x = 0.0;
        while x < grid.x_max() {
            let mut y = 0.0;
            while y < grid.y_max() {
                let (bx, by) = grid.pixel_to_map(grid.map_to_pixel(x, y));
                assert!((bx - x).abs() <= scale + 1e-9, "x {x} -> {bx}");
                assert!((by - y).abs() <= scale + 1e-9, "y {y} -> {by}");
                y += 0.013;
            }
            x += 0.017;
        }
    }

    #[test]
    fn round_trip_is_lossy() {
        let grid = free_grid(10, 10, 1.0);
        let (x, y) = grid.pixel_to_map(grid.map_to_pixel(2.6, 3.3));
        assert_eq!(x, 2.0);
        // Row 6 has its top edge at y = 4.
        assert_eq!(y, 4.0);
    }

    #[test]
    fn zero_is_occupied_nonzero_is_free() {
        let grid = OccupancyGrid::from_rows(vec![vec![0, 1], vec![128, 255]], 1.0).unwrap();
        // Top row.
        assert!(grid.in_collision(0.5, 1.5));
        assert!(!grid.in_collision(1.5, 1.5));
        // Bottom row.
        assert!(!grid.in_collision(0.5, 0.5));
        assert!(!grid.in_collision(1.5, 0.5));
    }

    #[test]
    fn out_of_bounds_is_collision() {
        let grid = free_grid(5, 5, 1.0);
        assert!(grid.in_collision(5.0, 2.5));
        assert!(grid.in_collision(2.5, 0.0));
        assert!(grid.in_collision(-1.5, 2.5));
        assert!(grid.in_collision(2.5, 6.5));
        assert!(grid.in_collision(100.0, -100.0));
        assert!(!grid.in_collision(2.5, 2.5));
    }

    #[test]
    fn non_finite_coordinates_collide() {
        let grid = free_grid(5, 5, 1.0);
        assert!(grid.in_collision(f64::NAN, 1.0));
        assert!(grid.in_collision(1.0, f64::INFINITY));
    }

    #[test]
    fn value_out_of_range_is_none() {
        let grid = free_grid(3, 3, 1.0);
        assert_eq!(grid.value(0, 0), Some(FREE));
        assert_eq!(grid.value(-1, 0), None);
        assert_eq!(grid.value(0, 3), None);
        assert_eq!(grid.value(3, 0), None);
    }

    #[test]
    fn occupancy_summary() {
        let grid = OccupancyGrid::from_rows(vec![vec![0, 0], vec![255, 255]], 1.0).unwrap();
        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.free_fraction(), 0.5);
    }
}
