//! Cursor — a screen position kept inside the viewport.
//!
//! Bounds come from the viewport, not from the text: the cursor may sit
//! past the end of a short row, up to the screen edge. Every mutator
//! clamps, so `row < viewport.rows()` and `col < viewport.cols()` hold
//! after any sequence of calls. The renderer never corrects the cursor.

use kilo_term::viewport::Viewport;

/// A direction of single-cell movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Cursor position in screen cells, 0-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    row: u16,
    col: u16,
}

impl Cursor {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Current row.
    #[inline]
    #[must_use]
    pub const fn row(self) -> u16 {
        self.row
    }

    /// Current column.
    #[inline]
    #[must_use]
    pub const fn col(self) -> u16 {
        self.col
    }

    /// Move one cell. At the edge of the viewport this is a no-op.
    pub const fn step(&mut self, dir: Direction, viewport: Viewport) {
        match dir {
            Direction::Up => {
                if self.row > 0 {
                    self.row -= 1;
                }
            }
            Direction::Down => {
                if self.row + 1 < viewport.rows() {
                    self.row += 1;
                }
            }
            Direction::Left => {
                if self.col > 0 {
                    self.col -= 1;
                }
            }
            Direction::Right => {
                if self.col + 1 < viewport.cols() {
                    self.col += 1;
                }
            }
        }
    }

    /// Move `count` single cells, each one clamped.
    pub const fn step_n(&mut self, dir: Direction, count: u16, viewport: Viewport) {
        let mut i = 0;
        while i < count {
            self.step(dir, viewport);
            i += 1;
        }
    }

    /// Jump to column 0.
    pub const fn line_start(&mut self) {
        self.col = 0;
    }

    /// Jump to the last column of the viewport.
    pub const fn line_end(&mut self, viewport: Viewport) {
        self.col = viewport.cols() - 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
