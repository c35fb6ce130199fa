//! Training memory.
//!
//! During self-play each completed search appends one entry to the root
//! tree's memory: the position snapshot, the visit-count policy target
//! over the flat action space, and the color that was to move. Rewards
//! are assigned once the game ends.

use crate::core::PlayerColor;
use crate::game::SimpleBoardState;

/// One training record. `policy` is a normalized distribution over the
/// flattened `[112 * 14 * 14]` action space.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    pub state: SimpleBoardState,
    pub policy: Vec<f32>,
    pub color: PlayerColor,
}

impl MemoryEntry {
    pub fn new(state: SimpleBoardState, policy: Vec<f32>, color: PlayerColor) -> MemoryEntry {
        MemoryEntry {
            state,
            policy,
            color,
        }
    }
}
