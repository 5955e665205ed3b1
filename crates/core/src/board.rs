//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is either empty or
//! holds the kind of the piece that locked there. Occupancy and color are both
//! derived from that single value, so they can never disagree.
//! Uses a flat array for better cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.

use crate::types::{Cell, PieceKind, Rgb};

/// The game board using flat row-major storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * self.width + (x as usize))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32
    }

    /// Color of the cell at (x, y), if it is filled
    pub fn color(&self, x: i32, y: i32) -> Option<Rgb> {
        self.get(x, y).flatten().map(PieceKind::color)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Check if a row has no filled cells
    pub fn is_row_empty(&self, y: usize) -> bool {
        if y >= self.height {
            return true;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_none())
    }

    /// Clear a row and shift all rows above down
    /// Returns the number of lines cleared (1 or 0)
    pub fn clear_row(&mut self, y: usize) -> usize {
        if y >= self.height {
            return 0;
        }

        let width = self.width;

        // copy_within handles overlapping ranges safely
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        for cell in &mut self.cells[..width] {
            *cell = None;
        }

        1
    }

    /// Clear all full rows, scanning from the top
    ///
    /// Each full row is removed as soon as it is found, shifting everything
    /// above it down by one. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        for y in 0..self.height {
            if self.is_row_full(y) {
                cleared += self.clear_row(y);
            }
        }
        cleared
    }

    /// Occupancy as 0/1 rows (wire format)
    pub fn occupancy_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| u8::from(c.is_some())).collect())
            .collect()
    }

    /// Occupancy as a 2D bool grid
    pub fn occupancy(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(Option::is_some).collect())
            .collect()
    }

    /// Colors as a 2D grid (cosmetic passthrough)
    pub fn colors(&self) -> Vec<Vec<Option<Rgb>>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.map(PieceKind::color)).collect())
            .collect()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a board from row strings, `.` empty and anything else filled
    ///
    /// Handy for tests and fixtures:
    ///
    /// ```
    /// use lockstep_tetris_core::Board;
    ///
    /// let board = Board::from_ascii(&["....", "##.#"]);
    /// assert_eq!(board.width(), 4);
    /// assert!(board.is_occupied(0, 1));
    /// assert!(!board.is_occupied(2, 1));
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    board.set(x as i32, y as i32, Some(PieceKind::Square));
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(
            crate::types::DEFAULT_FIELD_WIDTH as usize,
            crate::types::DEFAULT_FIELD_HEIGHT as usize,
        )
    }
}
