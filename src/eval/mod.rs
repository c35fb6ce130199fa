//! Evaluation module.
//!
//! The abstract evaluator port driving MCTS expansion, the masked-uniform
//! reference evaluator, and the deadline-driven iterative-deepening entry
//! point for classical searchers.

pub mod deepening;
pub mod evaluator;

pub use deepening::{EvaluationOptions, MovePlayer};
pub use evaluator::{EvalError, Evaluator, UniformEvaluator};
