//! Deadline-driven iterative deepening.
//!
//! `Board::eval` is the engine's single time-based entry point: it asks a
//! `MovePlayer` (typically a classical alpha-beta searcher, which lives
//! outside this crate) for a best move at increasing depths until the
//! deadline passes, the depth cap is reached, or a mate score appears.
//! Timeouts are checked between depth iterations, never inside them.

use std::time::{Duration, Instant};

use crate::core::{GameResult, Move, MATE_VALUE};
use crate::game::Board;

/// Options for `Board::eval`. `timelimit` is in milliseconds; absent means
/// search until the depth cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationOptions {
    pub timelimit: Option<u64>,
}

impl EvaluationOptions {
    pub fn with_timelimit(timelimit_ms: u64) -> EvaluationOptions {
        EvaluationOptions {
            timelimit: Some(timelimit_ms),
        }
    }
}

/// A depth-limited move searcher. Implementations return the centipawn
/// score and best move for the given depth, or `None` when they ran out of
/// time or cannot search the position.
pub trait MovePlayer {
    fn make_move(
        &mut self,
        board: &mut Board,
        time_limit: Option<Duration>,
        depth: i32,
    ) -> Option<(i32, Option<Move>)>;
}

impl Board {
    /// Iterative deepening up to depth 100 or until `options.timelimit`
    /// elapses, returning the best result found so far. A position that is
    /// not in progress scores `-1` with no move.
    pub fn eval<P: MovePlayer>(
        &mut self,
        player: &mut P,
        options: EvaluationOptions,
    ) -> (i32, Option<Move>) {
        if self.game_result(None) != GameResult::InProgress {
            return (-1, None);
        }

        let start = Instant::now();
        let deadline = options
            .timelimit
            .map(|ms| start + Duration::from_millis(ms));

        let mut score = 0;
        let mut best_move = None;
        let mut depth = 1;

        while depth < 100 {
            // The deadline only gates re-deepening; depth 1 always gets
            // its attempt, and the player decides what a spent time budget
            // means mid-search.
            if depth > 1 {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        break;
                    }
                }
            }
            let time_limit =
                deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));

            match player.make_move(self, time_limit, depth) {
                Some((depth_score, depth_move)) => {
                    score = depth_score;
                    if depth_move.is_some() {
                        best_move = depth_move;
                    }
                    if score.abs() == MATE_VALUE {
                        break;
                    }
                }
                None => break,
            }

            depth += 1;
        }

        (score, best_move)
    }
}
