//! Monte Carlo Tree Search module.
//!
//! This module contains all MCTS-related functionality:
//! - The thread-safe board pool backing zero-allocation expansion
//! - Arena tree nodes with PUCT selection
//! - Batched search orchestration against an evaluator
//! - Training memory attached to search roots

pub mod config;
pub mod memory;
pub mod node;
pub mod pool;
pub mod search;
pub mod tree;

pub use config::MctsConfig;
pub use memory::MemoryEntry;
pub use node::{Node, NodeId};
pub use pool::BoardPool;
pub use search::{
    add_dirichlet_noise, backpropagate_nodes, create_trees, expand_nodes, run_search,
    run_simulations, select_move, SearchOutcome,
};
pub use tree::SearchTree;
