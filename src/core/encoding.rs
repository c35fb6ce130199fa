//! Dense move encoding for the policy head.
//!
//! The policy tensor has shape (112, 14, 14): 104 queen-like slide planes
//! (8 directions x up to 13 squares) followed by 8 knight planes. A move is
//! addressed by its plane together with the origin square, so the same
//! plane set is shared by every origin. Promotion kind is not encoded;
//! decoded moves are bare `from -> to` records the board completes on
//! replay.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::constants::BOARD_SIZE;
use super::moves::Move;
use super::piece::BoardLocation;

// ============================================================================
// Tables
// ============================================================================

/// Slide distances expressible on a 14-wide board.
pub const NUM_QUEEN_MOVES_PER_DIRECTION: usize = BOARD_SIZE - 1;

/// Queen-like slide planes (8 directions x 13 distances).
pub const NUM_QUEEN_MOVES: usize = 8 * NUM_QUEEN_MOVES_PER_DIRECTION;

/// Knight planes.
pub const NUM_KNIGHT_MOVES: usize = 8;

/// Total policy planes.
pub const NUM_ACTION_CHANNELS: usize = NUM_QUEEN_MOVES + NUM_KNIGHT_MOVES;

/// Flattened action space size (planes x squares).
pub const ACTION_SPACE_SIZE: usize = NUM_ACTION_CHANNELS * BOARD_SIZE * BOARD_SIZE;

/// Slide directions in fixed plane order, applied as `(delta_row,
/// delta_col)` steps. Plane = `direction * 13 + (distance - 1)`.
pub const QUEEN_MOVE_OFFSETS: [(i8, i8); 8] = [
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
];

/// Knight jumps in fixed plane order, applied as `(delta_row, delta_col)`.
pub const KNIGHT_MOVE_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Precomputed offset -> direction index hash for slides.
static QUEEN_DIRECTION_INDEX: LazyLock<HashMap<(i8, i8), usize>> = LazyLock::new(|| {
    QUEEN_MOVE_OFFSETS
        .iter()
        .enumerate()
        .map(|(i, &offset)| (offset, i))
        .collect()
});

/// Precomputed offset -> plane hash for knight jumps.
static KNIGHT_PLANE_INDEX: LazyLock<HashMap<(i8, i8), usize>> = LazyLock::new(|| {
    KNIGHT_MOVE_OFFSETS
        .iter()
        .enumerate()
        .map(|(i, &offset)| (offset, NUM_QUEEN_MOVES + i))
        .collect()
});

// ============================================================================
// Decoding
// ============================================================================

/// Decode `(plane, from_row, from_col)` into a bare `from -> to` move.
/// Capture, promotion, and castling side effects are resolved by the board
/// when the move is replayed.
pub fn index_to_move(action_plane: usize, from_row: i8, from_col: i8) -> Move {
    let from = BoardLocation::new(from_row, from_col);
    let to = if action_plane < NUM_QUEEN_MOVES {
        let direction_idx = action_plane / NUM_QUEEN_MOVES_PER_DIRECTION;
        let distance = (action_plane % NUM_QUEEN_MOVES_PER_DIRECTION) as i8;
        let (delta_row, delta_col) = QUEEN_MOVE_OFFSETS[direction_idx];
        from.relative(delta_row * (distance + 1), delta_col * (distance + 1))
    } else {
        let knight_idx = action_plane - NUM_QUEEN_MOVES;
        let (delta_row, delta_col) = KNIGHT_MOVE_OFFSETS[knight_idx];
        from.relative(delta_row, delta_col)
    };
    Move::standard(from, to, crate::core::Piece::NONE)
}

/// Decode a flattened action index (`plane * 196 + row * 14 + col`).
pub fn move_from_flat_index(flat_index: usize) -> Move {
    let squares = BOARD_SIZE * BOARD_SIZE;
    let action_plane = flat_index / squares;
    let square = flat_index % squares;
    index_to_move(
        action_plane,
        (square / BOARD_SIZE) as i8,
        (square % BOARD_SIZE) as i8,
    )
}

// ============================================================================
// Encoding
// ============================================================================

#[inline]
fn sign(value: i8) -> i8 {
    (value > 0) as i8 - (value < 0) as i8
}

/// Encode a move as `(plane, from_row, from_col)`.
///
/// Panics when the displacement is neither a knight jump nor a queen line;
/// such a move cannot come from this variant's generation and indicates a
/// caller bug.
pub fn move_to_index(mv: &Move) -> (usize, usize, usize) {
    let delta_row = mv.to.row() - mv.from.row();
    let delta_col = mv.to.col() - mv.from.col();

    let action_plane = if let Some(&plane) = KNIGHT_PLANE_INDEX.get(&(delta_row, delta_col)) {
        plane
    } else {
        if delta_row != 0 && delta_col != 0 && delta_row.abs() != delta_col.abs() {
            panic!("move offset ({delta_row}, {delta_col}) not in the encoding table");
        }
        let direction = (sign(delta_row), sign(delta_col));
        let direction_idx = *QUEEN_DIRECTION_INDEX
            .get(&direction)
            .unwrap_or_else(|| panic!("move offset ({delta_row}, {delta_col}) not in the encoding table"));
        let distance = delta_row.abs().max(delta_col.abs()) as usize - 1;
        direction_idx * NUM_QUEEN_MOVES_PER_DIRECTION + distance
    };

    (action_plane, mv.from.row() as usize, mv.from.col() as usize)
}

/// Encode a move as a flat action index.
#[inline]
pub fn move_to_flat_index(mv: &Move) -> usize {
    let (action_plane, from_row, from_col) = move_to_index(mv);
    action_plane * BOARD_SIZE * BOARD_SIZE + from_row * BOARD_SIZE + from_col
}
