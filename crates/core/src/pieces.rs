//! Pieces module - shape catalog and rotation rules
//!
//! Every piece kind has four rotation entries. Shapes are stored as small
//! row-major matrices (at most 4x4) whose top-left corner is the piece origin.
//! Kinds with fewer distinct orientations simply repeat their entries.

use crate::types::PieceKind;

/// Largest matrix side used by any catalog entry
pub const MAX_SHAPE_SIDE: usize = 4;

/// A piece shape as a filled/empty matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: u8,
    cols: u8,
    cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl ShapeMatrix {
    const fn new(rows: u8, cols: u8, cells: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE]) -> Self {
        Self { rows, cols, cells }
    }

    /// Build a matrix from 0/1 rows (wire format)
    ///
    /// Returns `None` for empty, ragged, or oversized input, or when no cell is filled.
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if height > MAX_SHAPE_SIDE || width == 0 || width > MAX_SHAPE_SIDE {
            return None;
        }

        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        let mut any = false;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return None;
            }
            for (c, &v) in row.iter().enumerate() {
                if v != 0 {
                    cells[r][c] = 1;
                    any = true;
                }
            }
        }

        any.then_some(Self::new(height as u8, width as u8, cells))
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    #[inline(always)]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col] != 0
    }

    /// Filled cells as `(row, col)` offsets, row-major
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows())
            .flat_map(move |r| (0..self.cols()).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.cells[r][c] != 0)
    }

    /// Matrix as 0/1 rows (wire format)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows())
            .map(|r| self.cells[r][..self.cols()].to_vec())
            .collect()
    }

    /// Rotate the matrix 90° clockwise
    pub fn rotated_cw(&self) -> Self {
        let (h, w) = (self.rows(), self.cols());
        let mut cells = [[0u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for i in 0..h {
            for j in 0..w {
                cells[j][h - 1 - i] = self.cells[i][j];
            }
        }
        Self::new(self.cols, self.rows, cells)
    }
}

const STRAIGHT_FLAT: ShapeMatrix = ShapeMatrix::new(
    1,
    4,
    [[1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const STRAIGHT_UPRIGHT: ShapeMatrix = ShapeMatrix::new(
    4,
    1,
    [[1, 0, 0, 0], [1, 0, 0, 0], [1, 0, 0, 0], [1, 0, 0, 0]],
);
const SQUARE: ShapeMatrix = ShapeMatrix::new(
    2,
    2,
    [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const Z_FLAT: ShapeMatrix = ShapeMatrix::new(
    2,
    3,
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const Z_UPRIGHT: ShapeMatrix = ShapeMatrix::new(
    3,
    2,
    [[0, 1, 0, 0], [1, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
);
const REVERSE_Z_FLAT: ShapeMatrix = ShapeMatrix::new(
    2,
    3,
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
);
const REVERSE_Z_UPRIGHT: ShapeMatrix = ShapeMatrix::new(
    3,
    2,
    [[1, 0, 0, 0], [1, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
);

/// Shape table indexed by `[kind.index()][rotation]`
static SHAPES: [[ShapeMatrix; 4]; 6] = [
    [STRAIGHT_FLAT, STRAIGHT_UPRIGHT, STRAIGHT_FLAT, STRAIGHT_UPRIGHT],
    [SQUARE, SQUARE, SQUARE, SQUARE],
    [Z_FLAT, Z_UPRIGHT, Z_FLAT, Z_UPRIGHT],
    [REVERSE_Z_FLAT, REVERSE_Z_UPRIGHT, REVERSE_Z_FLAT, REVERSE_Z_UPRIGHT],
    // L
    [
        ShapeMatrix::new(2, 3, [[1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        ShapeMatrix::new(3, 2, [[1, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 0, 0, 0]]),
        ShapeMatrix::new(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        ShapeMatrix::new(3, 2, [[1, 0, 0, 0], [1, 0, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]]),
    ],
    // Reverse L
    [
        ShapeMatrix::new(2, 3, [[1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        ShapeMatrix::new(3, 2, [[0, 1, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0]]),
        ShapeMatrix::new(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
        ShapeMatrix::new(3, 2, [[1, 1, 0, 0], [1, 0, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0]]),
    ],
];

/// Get the shape for a piece kind and rotation index (taken mod 4)
pub fn shape_of(kind: PieceKind, rotation: u8) -> &'static ShapeMatrix {
    &SHAPES[kind.index()][(rotation % 4) as usize]
}

/// Number of extra orientations worth searching beyond the spawn one
pub fn max_rotations(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::Square => 0,
        _ => 3,
    }
}

/// Position compensation applied when rotating away from `rotation`
///
/// Returns `(dx, dy)`. Only the straight and L-family pieces shift; the
/// others rotate in place.
pub fn rotation_offset(kind: PieceKind, rotation: u8) -> (i32, i32) {
    match (kind, rotation % 4) {
        (PieceKind::Straight, 1) => (-3, 0),
        (PieceKind::Straight, 2) => (3, -3),
        (PieceKind::Straight, 3) => (0, 3),
        (PieceKind::L | PieceKind::ReverseL, 0) => (-1, 0),
        (PieceKind::L | PieceKind::ReverseL, 1) => (-1, -1),
        (PieceKind::L | PieceKind::ReverseL, 2) => (2, -1),
        (PieceKind::L | PieceKind::ReverseL, 3) => (0, 2),
        _ => (0, 0),
    }
}

/// A piece instance: kind plus rotation index
///
/// The cell matrix is always looked up from the catalog, so it can never
/// disagree with the declared kind and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: u8,
}

impl Piece {
    /// Create a piece in its spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self { kind, rotation: 0 }
    }

    pub fn cells(&self) -> &'static ShapeMatrix {
        shape_of(self.kind, self.rotation)
    }

    /// The same piece, one rotation step further
    pub fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            rotation: (self.rotation + 1) % 4,
        }
    }

    pub fn width(&self) -> usize {
        self.cells().cols()
    }

    pub fn height(&self) -> usize {
        self.cells().rows()
    }
}
