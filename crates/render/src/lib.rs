//! Rendering adapter: renderer-agnostic view of the map and robot pose.
//!
//! # Invariants
//! - Renderers read the grid and pose; they never feed back into planning.
//!
//! Ships a text renderer for terminals, logs and tests.

mod renderer;

pub use renderer::{ARROW_LENGTH, AsciiRenderer, RenderView, Renderer, arrow_tip};
