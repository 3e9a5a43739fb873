//! Shared application-wide constants.
//! Centralizes the canvas geometry and the tweakable interaction values.

/// Fixed canvas size, in pixels. The window is sized to match.
pub const CANVAS_WIDTH: f64 = 400.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

pub const COLS: usize = 3;
pub const ROWS: usize = 4;

/// Gap between cells, and between the grid and the canvas edge.
pub const GAP: f64 = 10.0;

const MAX_CELL_W: f64 = (CANVAS_WIDTH - (COLS as f64 + 1.0) * GAP) / COLS as f64;
const MAX_CELL_H: f64 = (CANVAS_HEIGHT - (ROWS as f64 + 1.0) * GAP) / ROWS as f64;

/// Cells are square: the smaller of the two per-axis fits wins.
pub const CELL_SIZE: f64 = if MAX_CELL_W < MAX_CELL_H {
    MAX_CELL_W
} else {
    MAX_CELL_H
};

/// The active ball is half a cell wide.
pub const BALL_RADIUS: f64 = CELL_SIZE / 2.0;

/// Pick radius (in pixels) around a cell corner for curvature drags.
pub const CORNER_HIT_RADIUS: f64 = 20.0;

/// A merge only lands when the release point is this close to the
/// target cell's center.
pub const MERGE_CENTER_THRESHOLD: f64 = 20.0;

/// Drag distance that maps onto the full corner-radius factor range.
pub const MAX_DRAG_INFLUENCE: f64 = 120.0;

/// Upper bound on a corner's radius factor.
pub const MAX_RADIUS_FACTOR: f64 = 3.0;

/// Arrow-key nudge step for the ball, in pixels.
pub const BALL_STEP: f64 = 10.0;

/// Per-frame interpolation factor while the ball follows the pointer.
pub const GRAB_FOLLOW: f64 = 0.2;
