use std::fmt::Write;

use glam::DVec2;
use gridnav_common::Pose;
use gridnav_grid::{CellIndex, OCCUPIED, OccupancyGrid};

/// Length of the heading arrow drawn from the robot, in meters.
pub const ARROW_LENGTH: f64 = 0.2;

/// Tip of the heading arrow for `pose`.
pub fn arrow_tip(pose: &Pose) -> DVec2 {
    pose.position() + DVec2::from_angle(pose.theta) * ARROW_LENGTH
}

/// Per-frame inputs besides the static map.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderView {
    pub pose: Pose,
    pub goal: Option<Pose>,
}

impl RenderView {
    pub fn new(pose: Pose) -> Self {
        Self { pose, goal: None }
    }

    pub fn with_goal(mut self, goal: Pose) -> Self {
        self.goal = Some(goal);
        self
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the grid and a view, then produces output. It never
/// mutates simulation state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, grid: &OccupancyGrid, view: &RenderView) -> Self::Output;
}

/// Text renderer.
///
/// `#` obstacle, `.` free, `R` robot, `*` heading arrow tip, `G` goal.
/// With `stride > 1` each character covers a `stride x stride` block, drawn
/// as an obstacle if any covered cell is one.
#[derive(Debug, Clone, Copy)]
pub struct AsciiRenderer {
    stride: usize,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self { stride: 1 }
    }
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stride(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn block_of(&self, grid: &OccupancyGrid, x: f64, y: f64) -> Option<(usize, usize)> {
        let CellIndex { row, col } = grid.map_to_pixel(x, y);
        grid.value(row, col)?;
        Some((row as usize / self.stride, col as usize / self.stride))
    }

    fn block_occupied(&self, grid: &OccupancyGrid, block_row: usize, block_col: usize) -> bool {
        let row_end = ((block_row + 1) * self.stride).min(grid.rows());
        let col_end = ((block_col + 1) * self.stride).min(grid.cols());
        (block_row * self.stride..row_end).any(|r| {
            (block_col * self.stride..col_end)
                .any(|c| grid.value(r as i64, c as i64) == Some(OCCUPIED))
        })
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, grid: &OccupancyGrid, view: &RenderView) -> String {
        let pose = view.pose;
        let tip = arrow_tip(&pose);
        let robot = self.block_of(grid, pose.x, pose.y);
        let arrow = self.block_of(grid, tip.x, tip.y);
        let goal = view.goal.and_then(|g| self.block_of(grid, g.x, g.y));

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Map {}x{} @ {:.3} m/cell, pose=({:.3}, {:.3}, {:.2}) ===",
            grid.rows(),
            grid.cols(),
            grid.scale(),
            pose.x,
            pose.y,
            pose.theta
        );

        let block_rows = grid.rows().div_ceil(self.stride);
        let block_cols = grid.cols().div_ceil(self.stride);
        for br in 0..block_rows {
            for bc in 0..block_cols {
                let here = Some((br, bc));
                let ch = if here == robot {
                    'R'
                } else if here == arrow {
                    '*'
                } else if here == goal {
                    'G'
                } else if self.block_occupied(grid, br, bc) {
                    '#'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }

        out
    }
}
