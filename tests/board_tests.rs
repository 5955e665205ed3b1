//! Board tests - grid storage, bounds, and line clearing

use lockstep_tetris::core::Board;
use lockstep_tetris::types::{PieceKind, DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH};

#[test]
fn test_board_new_empty() {
    let board = Board::default();
    assert_eq!(board.width(), DEFAULT_FIELD_WIDTH as usize);
    assert_eq!(board.height(), DEFAULT_FIELD_HEIGHT as usize);

    // All cells should be empty
    for y in 0..board.height() as i32 {
        for x in 0..board.width() as i32 {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(7, 9);

    // Negative coordinates
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);

    // Beyond bounds
    assert_eq!(board.get(7, 0), None);
    assert_eq!(board.get(0, 9), None);
    assert!(!board.is_valid(7, 0));
    assert!(!board.is_occupied(7, 0));
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new(10, 20);

    assert!(board.set(5, 10, Some(PieceKind::Z)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::Z)));
    assert_eq!(board.color(5, 10), Some(PieceKind::Z.color()));

    // Clear a cell
    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));
    assert_eq!(board.color(5, 10), None);

    // Out of bounds writes are dropped
    assert!(!board.set(10, 0, Some(PieceKind::L)));
}

#[test]
fn test_row_queries() {
    let board = Board::from_ascii(&["....", "#.#.", "####"]);
    assert!(board.is_row_empty(0));
    assert!(!board.is_row_empty(1));
    assert!(!board.is_row_full(1));
    assert!(board.is_row_full(2));
    assert!(!board.is_row_full(3));
}

#[test]
fn test_clear_single_row_shifts_everything_above() {
    let mut board = Board::from_ascii(&["#...", ".#..", "..#.", "####"]);
    assert_eq!(board.clear_full_rows(), 1);
    assert_eq!(board, Board::from_ascii(&["....", "#...", ".#..", "..#."]));
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::from_ascii(&["##..", "####", "#..#", "####", ".##."]);
    assert_eq!(board.clear_full_rows(), 2);
    assert_eq!(
        board,
        Board::from_ascii(&["....", "....", "##..", "#..#", ".##."])
    );
}

#[test]
fn test_wire_rows_match_cells() {
    let mut board = Board::new(3, 2);
    board.set(0, 0, Some(PieceKind::Square));
    board.set(2, 1, Some(PieceKind::ReverseL));
    assert_eq!(board.occupancy_rows(), vec![vec![1, 0, 0], vec![0, 0, 1]]);
    assert_eq!(
        board.occupancy(),
        vec![vec![true, false, false], vec![false, false, true]]
    );
}

#[test]
fn test_clear_resets_board() {
    let mut board = Board::from_ascii(&["##", "##"]);
    board.clear();
    assert_eq!(board, Board::new(2, 2));
}
