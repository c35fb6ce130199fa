//! fpchess - a high-performance simulator for 4-player team chess.
//!
//! This crate provides:
//! - A rules engine for the 14x14 cut-corner board: move generation,
//!   attack detection, make/undo with full reversibility, castling,
//!   promotion, and terminal-state evaluation
//! - An AlphaZero-style MCTS core: arena trees with PUCT selection,
//!   batched expansion against an abstract policy/value evaluator, and a
//!   pooled board allocator for the hot path
//! - Tensor encodings (player-relative states, dense action indices) at
//!   the evaluator boundary
//! - A deadline-driven iterative-deepening entry point for classical
//!   searchers

pub mod core;
pub mod eval;
pub mod game;
pub mod mcts;

pub use crate::core::{
    BoardLocation, CastlingRights, GameResult, Move, Piece, PieceType, PlacedPiece, Player,
    PlayerColor, Team,
};
pub use eval::{EvalError, EvaluationOptions, Evaluator, MovePlayer, UniformEvaluator};
pub use game::{Board, FenError, SimpleBoardState};
pub use mcts::{BoardPool, MctsConfig, MemoryEntry, SearchTree};
