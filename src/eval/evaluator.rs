//! The evaluator port: the boundary between the search and whatever
//! produces policy/value estimates.
//!
//! Anything exposing `evaluate(states, legal_mask) -> (policy, value)` can
//! drive the search: a neural network backend, a heuristic, or the masked
//! uniform baseline below. The call is single-shot; cancellation is not
//! modeled, so a stuck evaluator blocks the search.

use half::f16;
use ndarray::{Array4, ArrayView4, Axis};
use thiserror::Error;

/// Recoverable evaluator failures; the search propagates these to its
/// caller without attempting recovery.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("evaluator backend failure: {0}")]
    Backend(String),
    #[error("evaluator returned {got} rows for a batch of {expected}")]
    BatchMismatch { expected: usize, got: usize },
}

/// Batched policy/value evaluator.
///
/// Contract:
/// - `states` is `[B, 24, 14, 14]` with values in {0, 1}, player-relative
///   (see `game::tensor`);
/// - `legal_mask` is `[B, 112, 14, 14]` in {0, 1}, board frame;
/// - the returned policy is `[B, 112, 14, 14]`, a probability distribution
///   over the masked actions per batch row (zero where the mask is zero),
///   in board frame — adapters for raw network output apply
///   `parse_actionspace` themselves;
/// - the returned values are one per batch row in [-1, 1], from the
///   perspective of the side to move.
pub trait Evaluator {
    fn evaluate(
        &self,
        states: ArrayView4<'_, f16>,
        legal_mask: ArrayView4<'_, f32>,
    ) -> Result<(Array4<f32>, Vec<f32>), EvalError>;
}

// ============================================================================
// Masked-uniform Reference Evaluator
// ============================================================================

/// Spreads probability uniformly over the legal actions and returns a
/// fixed value. The no-network baseline, and the workhorse of the search
/// tests.
pub struct UniformEvaluator {
    value: f32,
}

impl UniformEvaluator {
    pub fn new(value: f32) -> UniformEvaluator {
        UniformEvaluator { value }
    }
}

impl Default for UniformEvaluator {
    fn default() -> UniformEvaluator {
        UniformEvaluator::new(0.0)
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(
        &self,
        states: ArrayView4<'_, f16>,
        legal_mask: ArrayView4<'_, f32>,
    ) -> Result<(Array4<f32>, Vec<f32>), EvalError> {
        let batch = states.shape()[0];
        if legal_mask.shape()[0] != batch {
            return Err(EvalError::BatchMismatch {
                expected: batch,
                got: legal_mask.shape()[0],
            });
        }

        let mut policy = legal_mask.to_owned();
        for mut row in policy.axis_iter_mut(Axis(0)) {
            let total: f32 = row.sum();
            if total > 0.0 {
                row.mapv_inplace(|v| v / total);
            }
        }

        Ok((policy, vec![self.value; batch]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{encode_states, legal_moves_mask, Board};

    #[test]
    fn uniform_policy_is_normalized_over_the_mask() {
        let mut board = Board::standard_setup();
        let moves = board.legal_moves();
        let states = encode_states(&[&board]);
        let mask = legal_moves_mask(&[moves.clone()]);

        let evaluator = UniformEvaluator::new(0.25);
        let (policy, values) = evaluator.evaluate(states.view(), mask.view()).unwrap();

        assert_eq!(values, vec![0.25]);
        let sum: f32 = policy.sum();
        assert!((sum - 1.0).abs() < 1e-5);

        // Probability only where the mask is set, and uniform there.
        let expected = 1.0 / moves.len() as f32;
        for (p, m) in policy.iter().zip(mask.iter()) {
            if *m == 0.0 {
                assert_eq!(*p, 0.0);
            } else {
                assert!((p - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn batch_mismatch_is_reported() {
        let board = Board::standard_setup();
        let states = encode_states(&[&board, &board]);
        let mask = legal_moves_mask(&[Vec::new()]);
        let evaluator = UniformEvaluator::default();
        assert!(matches!(
            evaluator.evaluate(states.view(), mask.view()),
            Err(EvalError::BatchMismatch { expected: 2, got: 1 })
        ));
    }
}
