//! Thread-safe board pool.
//!
//! MCTS expansion creates one board per child; without pooling, allocation
//! dominates the hot path. The pool keeps preallocated boards behind a
//! mutex and refills lazily by fanning construction out across the rayon
//! thread pool. `acquire` hands out a board overwritten from a template;
//! `release` takes the board back by value, so a double release is ruled
//! out by ownership.

use std::sync::Mutex;

use log::{debug, warn};
use rayon::prelude::*;

use crate::game::Board;

pub struct BoardPool {
    boards: Mutex<Vec<Board>>,
    pool_size: usize,
}

impl BoardPool {
    /// Create a pool that refills in batches of `pool_size`. Exceeding the
    /// size triggers another refill, never a hard failure.
    pub fn new(pool_size: usize) -> BoardPool {
        assert!(pool_size > 0, "pool size must be positive");
        BoardPool {
            boards: Mutex::new(Vec::with_capacity(pool_size)),
            pool_size,
        }
    }

    /// Take a board initialized as a copy of `template`. Blocks only on
    /// the pool mutex (and on refill when the pool ran dry); never returns
    /// an uninitialized board.
    pub fn acquire(&self, template: &Board) -> Board {
        let mut boards = self.boards.lock().unwrap();
        if boards.is_empty() {
            warn!("board pool empty, refilling {} boards", self.pool_size);
            Self::refill(&mut boards, self.pool_size);
        }
        let mut board = boards.pop().expect("refill left the pool non-empty");
        board.copy_from(template);
        board
    }

    /// Return a board to the pool. The caller gives up ownership, so the
    /// board cannot be touched (or released again) afterwards.
    pub fn release(&self, board: Board) {
        self.boards.lock().unwrap().push(board);
    }

    /// Boards currently sitting in the pool.
    pub fn available(&self) -> usize {
        self.boards.lock().unwrap().len()
    }

    fn refill(boards: &mut Vec<Board>, pool_size: usize) {
        let fresh: Vec<Board> = (0..pool_size)
            .into_par_iter()
            .map(|_| Board::empty())
            .collect();
        boards.extend(fresh);
        debug!("board pool refilled to {} boards", boards.len());
    }
}
