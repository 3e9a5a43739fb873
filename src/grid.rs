use crate::constants::{
    CELL_SIZE, COLS, CORNER_HIT_RADIUS, GAP, MAX_DRAG_INFLUENCE, MAX_RADIUS_FACTOR, ROWS,
};
use eframe::egui::{Color32, CornerRadius, Painter};
use kurbo::{Point, Rect};
use log::debug;

/// pixel rectangle of the unit cell at (row, col), before any merging
pub fn unit_rect(row: usize, col: usize) -> Rect {
    let x = GAP + col as f64 * (CELL_SIZE + GAP);
    let y = GAP + row as f64 * (CELL_SIZE + GAP);
    Rect::new(x, y, x + CELL_SIZE, y + CELL_SIZE)
}

/// pixel rectangle spanning an inclusive range of grid units.
/// the gaps between the covered units are part of the rectangle.
fn span_rect(min_col: usize, max_col: usize, min_row: usize, max_row: usize) -> Rect {
    let x = GAP + min_col as f64 * (CELL_SIZE + GAP);
    let y = GAP + min_row as f64 * (CELL_SIZE + GAP);
    let w = (max_col - min_col + 1) as f64 * CELL_SIZE + (max_col - min_col) as f64 * GAP;
    let h = (max_row - min_row + 1) as f64 * CELL_SIZE + (max_row - min_row) as f64 * GAP;
    Rect::new(x, y, x + w, y + h)
}

/// one grid unit, possibly enlarged by merging.
/// corners are indexed 0 = top-left, 1 = top-right, 2 = bottom-right, 3 = bottom-left.
#[derive(Clone, Debug)]
pub struct Cell {
    pub id: usize,
    pub row: usize,
    pub col: usize,

    // merged bounding box, inclusive, in grid units
    pub min_col: usize,
    pub max_col: usize,
    pub min_row: usize,
    pub max_row: usize,

    /// current pixel rectangle, derived from the bounding box
    pub rect: Rect,

    /// per-corner curvature multipliers in [0, MAX_RADIUS_FACTOR]
    pub radius_factors: [f64; 4],

    pub color: Color32,

    /// true once this cell has been absorbed into a neighbor
    pub is_merged: bool,
}

impl Cell {
    fn new(row: usize, col: usize) -> Self {
        Cell {
            id: row * COLS + col,
            row,
            col,
            min_col: col,
            max_col: col,
            min_row: row,
            max_row: row,
            rect: unit_rect(row, col),
            radius_factors: [0.0; 4],
            color: Color32::BLACK,
            is_merged: false,
        }
    }

    /// still covers exactly one grid unit?
    pub fn is_unit(&self) -> bool {
        self.min_col == self.max_col && self.min_row == self.max_row
    }

    /// pixel position of one of the four corners of the current rect
    pub fn corner_pos(&self, corner: usize) -> Point {
        let x = if corner == 1 || corner == 2 {
            self.rect.x1
        } else {
            self.rect.x0
        };
        let y = if corner == 2 || corner == 3 {
            self.rect.y1
        } else {
            self.rect.y0
        };
        Point::new(x, y)
    }

    /// draw this cell as a rounded rectangle. each factor scales half the
    /// smaller side, clamped so the radius never exceeds the cell itself.
    pub fn draw(&self, painter: &Painter, app: &crate::Squircles) {
        let max_dim = self.rect.width().min(self.rect.height());
        let radius = |i: usize| {
            let r = self.radius_factors[i] * max_dim * 0.5;
            r.min(max_dim).min(255.0) as u8
        };
        painter.rect_filled(
            app.canvas_to_screen_rect(self.rect),
            CornerRadius {
                nw: radius(0),
                ne: radius(1),
                se: radius(2),
                sw: radius(3),
            },
            self.color,
        );
    }
}

/// what the pointer landed on inside the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellHit {
    Corner { cell: usize, corner: usize },
    Body { cell: usize },
    None,
}

/// the full cell grid plus the list of merge masters (cells that have
/// absorbed a neighbor and are drawn once, enlarged)
pub struct Grid {
    cells: Vec<Cell>,
    masters: Vec<usize>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        let mut cells = Vec::with_capacity(ROWS * COLS);
        for row in 0..ROWS {
            for col in 0..COLS {
                cells.push(Cell::new(row, col));
            }
        }
        Grid {
            cells,
            masters: Vec::new(),
        }
    }

    /// throw everything away and rebuild the default grid
    pub fn reset(&mut self) {
        *self = Grid::new();
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn masters(&self) -> &[usize] {
        &self.masters
    }

    pub fn is_master(&self, idx: usize) -> bool {
        self.masters.contains(&idx)
    }

    /// cells that can host a spawned ball: neither absorbed nor a master
    pub fn free_cells(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| !self.cells[i].is_merged && !self.is_master(i))
            .collect()
    }

    /// which unit cell (by its base rectangle) contains this point?
    /// ignores merge state; callers filter on it as needed.
    pub fn cell_at(&self, p: Point) -> Option<usize> {
        for (idx, cell) in self.cells.iter().enumerate() {
            if unit_rect(cell.row, cell.col).contains(p) {
                return Some(idx);
            }
        }
        None
    }

    /// hit-test against the *current* (possibly enlarged) rects.
    /// absorbed cells are invisible to this test. inside a cell, the four
    /// corners get first pick within `CORNER_HIT_RADIUS`.
    pub fn hit_test(&self, p: Point) -> CellHit {
        for (idx, cell) in self.cells.iter().enumerate() {
            if cell.is_merged {
                continue;
            }
            if !cell.rect.contains(p) {
                continue;
            }
            for corner in 0..4 {
                if p.distance(cell.corner_pos(corner)) < CORNER_HIT_RADIUS {
                    return CellHit::Corner { cell: idx, corner };
                }
            }
            return CellHit::Body { cell: idx };
        }
        CellHit::None
    }

    /// map the pointer's distance from the dragged corner onto that
    /// corner's radius factor, capped at `MAX_RADIUS_FACTOR`
    pub fn drag_corner(&mut self, cell: usize, corner: usize, pointer: Point) {
        let dist = pointer.distance(self.cells[cell].corner_pos(corner));
        let factor = (dist / MAX_DRAG_INFLUENCE).min(MAX_RADIUS_FACTOR);
        self.cells[cell].radius_factors[corner] = factor;
    }

    /// grow `start` by absorbing `target`. the target must be a different,
    /// unabsorbed, unit-sized cell strictly adjacent to the start's bounding
    /// box (sharing one full grid edge with aligned ranges). rejections are
    /// logged and leave the grid untouched.
    pub fn merge(&mut self, start: usize, target: usize) -> bool {
        if start == target {
            debug!("merge rejected: start and target are the same cell");
            return false;
        }
        let s = &self.cells[start];
        let t = &self.cells[target];
        if s.is_merged || t.is_merged {
            debug!("merge rejected: cell already absorbed");
            return false;
        }
        if !t.is_unit() {
            debug!("merge rejected: target is not unit-sized");
            return false;
        }

        let adjacent = (t.max_col + 1 == s.min_col && t.row >= s.min_row && t.row <= s.max_row)
            || (t.min_col == s.max_col + 1 && t.row >= s.min_row && t.row <= s.max_row)
            || (t.max_row + 1 == s.min_row && t.col >= s.min_col && t.col <= s.max_col)
            || (t.min_row == s.max_row + 1 && t.col >= s.min_col && t.col <= s.max_col);
        if !adjacent {
            debug!("merge rejected: cells are not strictly adjacent");
            return false;
        }

        let min_col = s.min_col.min(t.min_col);
        let max_col = s.max_col.max(t.max_col);
        let min_row = s.min_row.min(t.min_row);
        let max_row = s.max_row.max(t.max_row);
        debug!("cell {} absorbs cell {}", s.id, t.id);

        let cell = &mut self.cells[start];
        cell.min_col = min_col;
        cell.max_col = max_col;
        cell.min_row = min_row;
        cell.max_row = max_row;
        cell.rect = span_rect(min_col, max_col, min_row, max_row);

        self.cells[target].is_merged = true;

        // registration is idempotent
        if !self.masters.contains(&start) {
            self.masters.push(start);
        }
        true
    }
}
