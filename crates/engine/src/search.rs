//! Heuristic placement search
//!
//! Every rotation of the piece is tried at every `(column, row)` anchor,
//! scanning rows bottom-up and columns left to right. The anchor is the
//! **bottom-left** corner of the shape's bounding box: shape row `i` lands on
//! board row `row - (height - 1 - i)`.
//!
//! A candidate is kept only if it scores strictly higher than the best so
//! far, so ties go to the first one found. Scanning a rotation stops after
//! the first empty row above the floor.

use lockstep_tetris_core::{max_rotations, Board, Piece, ShapeMatrix};

use crate::grid::Occupancy;

const CLEAR_WEIGHT: i32 = 300;
const SUPPORT_WEIGHT: i32 = 50;
const HEIGHT_PENALTY: i32 = 10;
const HOLE_PENALTY: i32 = 20;

/// Best landing spot found by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Rotation to reach before landing
    pub rotation: u8,
    /// Leftmost column of the shape
    pub column: i32,
    /// Bottom row of the shape
    pub row: i32,
    pub score: i32,
}

/// Board cells covered by `shape` anchored bottom-left at `(x, y)`
fn cells_at(shape: &ShapeMatrix, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
    let h = shape.rows() as i32;
    shape
        .filled_cells()
        .map(move |(r, c)| (x + c as i32, y - (h - 1 - r as i32)))
}

/// Every cell free and in bounds, and at least one cell resting on the floor or a block
pub fn is_valid_placement(grid: &Occupancy, shape: &ShapeMatrix, x: i32, y: i32) -> bool {
    let floor = grid.height() as i32;
    let mut supported = false;
    for (bx, by) in cells_at(shape, x, y) {
        if !grid.in_bounds(bx, by) || grid.is_filled(bx, by) {
            return false;
        }
        if by + 1 >= floor || grid.is_filled(bx, by + 1) {
            supported = true;
        }
    }
    supported
}

/// Score a valid placement
///
/// Placements that leave a block anywhere above the piece in a column it
/// spans score 0. Otherwise:
///
/// ```text
/// cleared * 300 + supports * 50 - ((height - row) * 10 + holes * 20)
/// ```
///
/// `supports` counts, per filled cell, a floor or block below, a wall or
/// block to the left, and a wall or block to the right. `holes` counts cells
/// left hanging over an empty cell.
pub fn score_placement(grid: &Occupancy, shape: &ShapeMatrix, x: i32, y: i32) -> i32 {
    let width = grid.width() as i32;
    let height = grid.height() as i32;

    let mut placed = grid.clone();
    for (bx, by) in cells_at(shape, x, y) {
        placed.set(bx, by, true);
    }

    let top = y - shape.rows() as i32;
    for col in x..x + shape.cols() as i32 {
        if (0..=top).any(|row| grid.is_filled(col, row)) {
            return 0;
        }
    }

    let mut supports = 0;
    let mut holes = 0;
    for (bx, by) in cells_at(shape, x, y) {
        if by + 1 == height || grid.is_filled(bx, by + 1) {
            supports += 1;
        } else if !placed.is_filled(bx, by + 1) {
            holes += 1;
        }
        if bx == 0 || grid.is_filled(bx - 1, by) {
            supports += 1;
        }
        if bx + 1 >= width || grid.is_filled(bx + 1, by) {
            supports += 1;
        }
    }

    let cleared = placed.full_rows() as i32;
    cleared * CLEAR_WEIGHT + supports * SUPPORT_WEIGHT
        - ((height - y) * HEIGHT_PENALTY + holes * HOLE_PENALTY)
}

/// Extra orientations worth searching for a raw matrix
///
/// Shapes that look the same after a quarter turn only need one.
pub fn max_rotations_of(shape: &ShapeMatrix) -> u8 {
    if shape.rotated_cw() == *shape {
        0
    } else {
        3
    }
}

/// Search `max_rotations + 1` clockwise orientations of `shape`
///
/// The returned rotation counts clockwise steps from `shape`.
pub fn best_placement(grid: &Occupancy, shape: &ShapeMatrix, max_rotations: u8) -> Option<Placement> {
    let height = grid.height() as i32;
    let mut best: Option<Placement> = None;
    let mut shape = *shape;

    for rotation in 0..=max_rotations {
        for y in (0..height).rev() {
            for x in 0..grid.width() as i32 {
                if !is_valid_placement(grid, &shape, x, y) {
                    continue;
                }
                let score = score_placement(grid, &shape, x, y);
                if best.map_or(true, |b| score > b.score) {
                    best = Some(Placement {
                        rotation,
                        column: x,
                        row: y,
                        score,
                    });
                }
            }
            if y < height - 1 && grid.is_row_empty(y as usize) {
                break;
            }
        }
        shape = shape.rotated_cw();
    }

    best
}

/// Search for a live piece; the returned rotation is absolute
pub fn best_placement_for(board: &Board, piece: Piece) -> Option<Placement> {
    let grid = Occupancy::from_board(board);
    best_placement(&grid, piece.cells(), max_rotations(piece.kind)).map(|p| Placement {
        rotation: (piece.rotation + p.rotation) % 4,
        ..p
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_tetris_core::shape_of;
    use lockstep_tetris_core::types::PieceKind;

    #[test]
    fn square_on_empty_board_goes_bottom_left() {
        let board = Board::new(10, 20);
        let best = best_placement_for(&board, Piece::new(PieceKind::Square)).unwrap();
        assert_eq!(
            best,
            Placement {
                rotation: 0,
                column: 0,
                row: 19,
                score: 190
            }
        );
    }

    #[test]
    fn floating_placements_are_invalid() {
        let grid = Occupancy::new(10, 20);
        let shape = shape_of(PieceKind::Square, 0);
        assert!(is_valid_placement(&grid, shape, 3, 19));
        assert!(!is_valid_placement(&grid, shape, 3, 18));
        assert!(!is_valid_placement(&grid, shape, 9, 19));
    }

    #[test]
    fn never_buries_under_an_overhang() {
        let board = Board::from_ascii(&["....", "....", "....", "##..", "....", "...."]);
        let grid = Occupancy::from_board(&board);
        let shape = shape_of(PieceKind::Square, 0);

        assert_eq!(score_placement(&grid, shape, 0, 5), 0);
        assert_eq!(score_placement(&grid, shape, 1, 5), 0);

        let best = best_placement(&grid, shape, 0).unwrap();
        assert_eq!((best.column, best.row), (2, 5));
        assert_eq!(best.score, 190);
    }

    #[test]
    fn prefers_clearing_a_line() {
        let board = Board::from_ascii(&["....", "....", "....", "....", "....", "###."]);
        let best = best_placement_for(&board, Piece::new(PieceKind::Straight)).unwrap();
        assert_eq!(
            best,
            Placement {
                rotation: 1,
                column: 3,
                row: 5,
                score: 590
            }
        );
    }

    #[test]
    fn holes_are_penalised() {
        let board = Board::from_ascii(&["....", "....", "....", "....", "....", "###."]);
        let grid = Occupancy::from_board(&board);
        // Flat straight on top of the stub leaves one cell hanging over column 3.
        assert_eq!(score_placement(&grid, shape_of(PieceKind::Straight, 0), 0, 4), 210);
    }

    #[test]
    fn rotation_is_absolute_for_live_pieces() {
        let board = Board::from_ascii(&["....", "....", "....", "....", "....", "###."]);
        let piece = Piece {
            kind: PieceKind::Straight,
            rotation: 1,
        };
        let best = best_placement_for(&board, piece).unwrap();
        assert_eq!(best.rotation, 1);
        assert_eq!((best.column, best.row), (3, 5));
    }

    #[test]
    fn raw_matrix_rotation_count() {
        assert_eq!(max_rotations_of(shape_of(PieceKind::Square, 0)), 0);
        for kind in [PieceKind::Straight, PieceKind::Z, PieceKind::ReverseL] {
            assert_eq!(max_rotations_of(shape_of(kind, 0)), max_rotations(kind));
        }
    }

    #[test]
    fn full_board_has_no_placement() {
        let board = Board::from_ascii(&["####", "####"]);
        assert_eq!(best_placement_for(&board, Piece::new(PieceKind::Z)), None);
    }
}
