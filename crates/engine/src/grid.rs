use lockstep_tetris_core::Board;

/// Filled/empty grid, row-major, `y` grows downward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn from_board(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            cells: board.cells().iter().map(Option::is_some).collect(),
        }
    }

    /// Build from 0/1 rows (wire format)
    ///
    /// Returns `None` for empty or ragged input.
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height: rows.len(),
            cells: rows.iter().flatten().map(|&v| v != 0).collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Filled cell; out of bounds reads as empty
    #[inline(always)]
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.cells[y as usize * self.width + x as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, filled: bool) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize * self.width + x as usize] = filled;
        true
    }

    fn row(&self, y: usize) -> &[bool] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        y >= self.height || self.row(y).iter().all(|&c| !c)
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.height && self.row(y).iter().all(|&c| c)
    }

    pub fn full_rows(&self) -> usize {
        (0..self.height).filter(|&y| self.is_row_full(y)).count()
    }
}

impl From<&Board> for Occupancy {
    fn from(board: &Board) -> Self {
        Self::from_board(board)
    }
}
