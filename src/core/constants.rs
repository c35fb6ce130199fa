//! Board geometry and rule constants.
//!
//! All magic numbers of the 14x14 cut-corner variant live here: board
//! dimensions, promotion ranks, initial rook squares, and buffer bounds.

use super::piece::BoardLocation;
use super::types::{CastlingType, PlayerColor};

// ============================================================================
// Board Geometry
// ============================================================================

/// Board dimensions (14x14 grid with the four 3x3 corners cut out).
pub const BOARD_SIZE: usize = 14;

/// Side length of the excluded corner blocks.
pub const CORNER_CUTOUT: usize = 3;

/// Largest row/column index.
pub const MAX_ROW: i8 = BOARD_SIZE as i8 - 1;
pub const MAX_COL: i8 = BOARD_SIZE as i8 - 1;

/// Check if coordinates lie on the 14x14 grid (cut-outs included).
#[inline]
pub fn is_on_grid(row: i8, col: i8) -> bool {
    row >= 0 && row <= MAX_ROW && col >= 0 && col <= MAX_COL
}

/// Check if coordinates name a playable square: on the grid and not inside
/// one of the four 3x3 corner cut-outs.
#[inline]
pub fn is_playable(row: i8, col: i8) -> bool {
    const CUT: i8 = CORNER_CUTOUT as i8;
    if !is_on_grid(row, col) {
        return false;
    }
    let edge_row = row < CUT || row > MAX_ROW - CUT;
    let edge_col = col < CUT || col > MAX_COL - CUT;
    !(edge_row && edge_col)
}

// ============================================================================
// Step Directions
// ============================================================================

/// Orthogonal step directions `(delta_row, delta_col)`.
pub const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diagonal step directions.
pub const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Knight jump offsets.
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

// ============================================================================
// Pawn Geometry
// ============================================================================

/// Forward direction `(delta_row, delta_col)` for each color's pawns.
#[inline]
pub fn pawn_direction(color: PlayerColor) -> (i8, i8) {
    match color {
        PlayerColor::Red => (-1, 0),
        PlayerColor::Blue => (0, 1),
        PlayerColor::Yellow => (1, 0),
        PlayerColor::Green => (0, -1),
    }
}

/// Whether a pawn of `color` at `(row, col)` still stands on its starting
/// rank (and may advance two squares).
#[inline]
pub fn pawn_on_start_rank(color: PlayerColor, row: i8, col: i8) -> bool {
    match color {
        PlayerColor::Red => row == 12,
        PlayerColor::Blue => col == 1,
        PlayerColor::Yellow => row == 1,
        PlayerColor::Green => col == 12,
    }
}

/// Whether a pawn of `color` arriving at `(row, col)` promotes. The test
/// is at-or-beyond the promotion rank so artificially placed pawns on the
/// rank itself still promote on their next step.
#[inline]
pub fn is_promotion_square(color: PlayerColor, row: i8, col: i8) -> bool {
    match color {
        PlayerColor::Red => row <= 3,
        PlayerColor::Blue => col >= 10,
        PlayerColor::Yellow => row >= 10,
        PlayerColor::Green => col <= 3,
    }
}

// ============================================================================
// Castling Geometry
// ============================================================================

/// Initial rook square for `(color, side)`; rook moves off these squares
/// clear the corresponding castling right.
pub fn initial_rook_location(color: PlayerColor, side: CastlingType) -> BoardLocation {
    match (color, side) {
        (PlayerColor::Red, CastlingType::Kingside) => BoardLocation::new(13, 10),
        (PlayerColor::Red, CastlingType::Queenside) => BoardLocation::new(13, 3),
        (PlayerColor::Blue, CastlingType::Kingside) => BoardLocation::new(10, 0),
        (PlayerColor::Blue, CastlingType::Queenside) => BoardLocation::new(3, 0),
        (PlayerColor::Yellow, CastlingType::Kingside) => BoardLocation::new(0, 3),
        (PlayerColor::Yellow, CastlingType::Queenside) => BoardLocation::new(0, 10),
        (PlayerColor::Green, CastlingType::Kingside) => BoardLocation::new(3, 13),
        (PlayerColor::Green, CastlingType::Queenside) => BoardLocation::new(10, 13),
    }
}

// ============================================================================
// Engine Limits
// ============================================================================

/// Move buffer bound for pseudo-legal generation. No position in this
/// variant produces more; exceeding it is a caller bug and aborts.
pub const MOVE_BUFFER_SIZE: usize = 300;

/// How many recent moves the board remembers for undo. The game itself does
/// not need its full history; only the search's make/undo probes do.
pub const MAX_MOVES_STORAGE: usize = 5;

/// Maximum pieces per color.
pub const MAX_PIECES_PER_COLOR: usize = 16;

/// Mate-magnitude score used by the iterative-deepening driver to stop
/// early once a forced win is found.
pub const MATE_VALUE: i32 = 100_000_000;

// ============================================================================
// Starting Position
// ============================================================================

/// Canonical FEN-like start string (chess.com 4-player teams layout).
pub const START_FEN: &str = "R-0,0,0,0-1,1,1,1-1,1,1,1-0,0,0,0-0-\
x,x,x,yR,yN,yB,yK,yQ,yB,yN,yR,x,x,x/\
x,x,x,yP,yP,yP,yP,yP,yP,yP,yP,x,x,x/\
x,x,x,8,x,x,x/\
bR,bP,10,gP,gR/\
bN,bP,10,gP,gN/\
bB,bP,10,gP,gB/\
bQ,bP,10,gP,gK/\
bK,bP,10,gP,gQ/\
bB,bP,10,gP,gB/\
bN,bP,10,gP,gN/\
bR,bP,10,gP,gR/\
x,x,x,8,x,x,x/\
x,x,x,rP,rP,rP,rP,rP,rP,rP,rP,x,x,x/\
x,x,x,rR,rN,rB,rQ,rK,rB,rN,rR,x,x,x";
