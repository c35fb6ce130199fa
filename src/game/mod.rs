//! Game engine module.
//!
//! Board state, move generation, attack queries, FEN parsing, and the
//! tensor encodings consumed by the evaluator.

pub mod attacks;
pub mod board;
pub mod fen;
pub mod movegen;
pub mod tensor;

pub use board::{Board, SimpleBoardState};
pub use fen::FenError;
pub use tensor::{
    change_perspective, change_perspective_single, color_channel_offset, encode_state,
    encode_states, legal_moves_mask, moves_mask, parse_actionspace, NUM_STATE_CHANNELS,
    STATE_SPACE_SIZE,
};
// Re-export for convenience
pub use half::f16;
