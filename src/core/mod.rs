//! Core primitives for the 4-player chess variant.
//!
//! This module contains the fundamental value types that define the game:
//! pieces, locations, moves, castling rights, geometry constants, and the
//! dense policy-head move encoding.

pub mod constants;
pub mod encoding;
pub mod moves;
pub mod piece;
pub mod types;

// Re-export commonly used types at the module level
pub use constants::{
    initial_rook_location, is_on_grid, is_playable, is_promotion_square, pawn_direction,
    pawn_on_start_rank, BOARD_SIZE, DIAGONAL_DIRS, KNIGHT_JUMPS, MATE_VALUE, MAX_MOVES_STORAGE,
    MAX_PIECES_PER_COLOR, MOVE_BUFFER_SIZE, ORTHOGONAL_DIRS, START_FEN,
};
pub use encoding::{
    index_to_move, move_from_flat_index, move_to_flat_index, move_to_index, ACTION_SPACE_SIZE,
    KNIGHT_MOVE_OFFSETS, NUM_ACTION_CHANNELS, NUM_QUEEN_MOVES, NUM_QUEEN_MOVES_PER_DIRECTION,
    QUEEN_MOVE_OFFSETS,
};
pub use moves::{CastlingRights, Move, MoveBuffer, SimpleMove};
pub use piece::{BoardLocation, Piece, PlacedPiece};
pub use types::{CastlingType, GameResult, PieceType, Player, PlayerColor, Team};
