//! Arena-backed search tree.
//!
//! A `SearchTree` owns its nodes in a flat vector and wires parents and
//! children by `u32` index. Selection, expansion, and backpropagation all
//! run here; the batched search in `mcts::search` drives many trees
//! against one evaluator call.

use ndarray::ArrayView3;

use crate::core::{index_to_move, move_to_flat_index, GameResult, Team, ACTION_SPACE_SIZE};
use crate::game::{Board, SimpleBoardState};

use super::memory::MemoryEntry;
use super::node::{Node, NodeId};
use super::pool::BoardPool;

/// Terminal value from the perspective of the player to move, or `None`
/// for a live position: 0 for stalemate, +1 when the mover's team has
/// won, -1 when it has lost.
fn compute_terminal_value(board: &mut Board) -> Option<f32> {
    let mover_team = board.turn().team();
    match board.game_result(None) {
        GameResult::InProgress => None,
        GameResult::Stalemate => Some(0.0),
        GameResult::WinRedYellow => Some(if mover_team == Team::RedYellow { 1.0 } else { -1.0 }),
        GameResult::WinBlueGreen => Some(if mover_team == Team::BlueGreen { 1.0 } else { -1.0 }),
    }
}

pub struct SearchTree {
    /// All nodes, root at index 0.
    pub nodes: Vec<Node>,
    /// Append-only training records attached to this root.
    pub memory: Vec<MemoryEntry>,
    /// Snapshot of the root position, kept for memory entries after the
    /// root's board has gone back to the pool.
    root_state: SimpleBoardState,
    /// PUCT exploration constant, constant across the tree.
    c_puct: f32,
}

impl SearchTree {
    /// Build a tree over `root_board`. The board should come from the
    /// pool; every board this tree acquires is returned by
    /// `release_boards`.
    pub fn new(root_board: Board, c_puct: f32) -> SearchTree {
        let root_state = root_board.simple_state();
        SearchTree {
            nodes: vec![Node::new_root(root_board)],
            memory: Vec::new(),
            root_state,
            c_puct,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    #[inline]
    pub fn root_state(&self) -> &SimpleBoardState {
        &self.root_state
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// The child of `id` maximizing `Q + C * sqrt(N_parent) / (1 + n) * P`.
    pub fn select_child(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        let parent_visits = node.visit_count;

        let mut best = None;
        let mut best_ucb = f32::NEG_INFINITY;
        for &child_id in &node.children {
            let child = self.node(child_id);
            let ucb = child.q_value() + child.ucb(self.c_puct, parent_visits);
            if ucb > best_ucb {
                best_ucb = ucb;
                best = Some(child_id);
            }
        }
        best
    }

    /// Descend by PUCT until an unexpanded node. Terminal leaves are
    /// backpropagated immediately (0 for stalemate, -1 for a lost
    /// position, from the player to move) and yield `None`: there is
    /// nothing to expand.
    pub fn choose_leaf(&mut self) -> Option<NodeId> {
        let mut id: NodeId = 0;
        while self.node(id).is_expanded() {
            id = self.select_child(id).expect("expanded node has children");
        }

        if let Some(value) = self.terminal_value(id) {
            self.backpropagate(id, value);
            return None;
        }
        Some(id)
    }

    /// Cached terminal probe for a leaf.
    pub fn terminal_value(&mut self, id: NodeId) -> Option<f32> {
        if !self.node(id).terminal_checked {
            let board = self.nodes[id as usize]
                .board
                .as_mut()
                .expect("leaf owns a board");
            let value = compute_terminal_value(board);
            let node = self.node_mut(id);
            node.terminal_checked = true;
            node.terminal_value = value;
        }
        self.node(id).terminal_value
    }

    // ========================================================================
    // Expansion
    // ========================================================================

    /// Expand a leaf from a `[112, 14, 14]` policy: every non-zero entry
    /// becomes a child with that probability as its prior, its board drawn
    /// from the pool. Children are stored in insertion order. The leaf's
    /// own board goes back to the pool; the children carry the position
    /// forward.
    pub fn expand(&mut self, id: NodeId, policy: ArrayView3<'_, f32>, pool: &BoardPool) {
        if self.node(id).is_expanded() {
            return;
        }

        let leaf_board = self.nodes[id as usize]
            .board
            .take()
            .expect("expand leaf owns a board");

        let mut children_data = Vec::new();
        for ((plane, row, col), &prob) in policy.indexed_iter() {
            if prob <= 0.0 {
                continue;
            }
            let decoded = index_to_move(plane, row as i8, col as i8);
            if decoded.to.missing() {
                // A masked policy never reaches here; skip junk entries.
                continue;
            }
            let completed = leaf_board.complete_move(&decoded);
            let mut child_board = pool.acquire(&leaf_board);
            child_board.make_move(&completed);
            children_data.push((completed, child_board, prob));
        }

        for (mv, child_board, prob) in children_data {
            let child_id = self.nodes.len() as NodeId;
            self.nodes.push(Node::new_child(child_board, id, mv, prob));
            self.node_mut(id).children.push(child_id);
        }

        pool.release(leaf_board);
    }

    // ========================================================================
    // Backpropagation
    // ========================================================================

    /// Add `value` along the parent chain, negating at each level: the two
    /// teams are zero-sum and adjacent levels belong to opposing teams'
    /// decisions.
    pub fn backpropagate(&mut self, id: NodeId, value: f32) {
        let mut current = Some(id);
        let mut value = value;
        while let Some(node_id) = current {
            let node = self.node_mut(node_id);
            node.value_sum += value;
            node.visit_count += 1;
            value = -value;
            current = node.parent;
        }
    }

    // ========================================================================
    // Root Products
    // ========================================================================

    /// Visit-count policy target over the flat action space, normalized.
    pub fn root_action_distribution(&self) -> Vec<f32> {
        let mut distribution = vec![0.0f32; ACTION_SPACE_SIZE];
        let mut total = 0.0f32;
        for &child_id in &self.root().children {
            let child = self.node(child_id);
            let mv = child.move_made.expect("non-root node has a move");
            let visits = child.visit_count as f32;
            distribution[move_to_flat_index(&mv)] = visits;
            total += visits;
        }
        if total > 0.0 {
            for p in &mut distribution {
                *p /= total;
            }
        }
        distribution
    }

    /// Append this search's training record to the root memory.
    pub fn append_root_memory(&mut self) {
        let entry = MemoryEntry::new(
            self.root_state.clone(),
            self.root_action_distribution(),
            self.root_state.turn.color(),
        );
        self.memory.push(entry);
    }

    /// Return every board still owned by a node to the pool. The tree
    /// stays usable for statistics but cannot search further.
    pub fn release_boards(&mut self, pool: &BoardPool) {
        for node in &mut self.nodes {
            if let Some(board) = node.board.take() {
                pool.release(board);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{move_to_index, Move, NUM_ACTION_CHANNELS};
    use crate::game::moves_mask;
    use ndarray::Array3;

    fn uniform_root_policy(board: &mut Board) -> (Array3<f32>, Vec<Move>) {
        let moves = board.legal_moves();
        let mut policy = moves_mask(&moves);
        let count = moves.len() as f32;
        policy.mapv_inplace(|v| v / count);
        (policy, moves)
    }

    #[test]
    fn expand_creates_one_child_per_nonzero_entry() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, moves) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);

        tree.expand(0, policy.view(), &pool);

        assert_eq!(tree.root().children.len(), moves.len());
        let prior_sum: f32 = tree
            .root()
            .children
            .iter()
            .map(|&c| tree.node(c).prior)
            .sum();
        assert!((prior_sum - 1.0).abs() < 1e-5);

        // Each child's prior matches the policy entry for its move.
        for &child_id in &tree.root().children {
            let child = tree.node(child_id);
            let (plane, row, col) = move_to_index(&child.move_made.unwrap());
            assert_eq!(child.prior, policy[[plane, row, col]]);
            assert_eq!(child.visit_count, 0);
        }
    }

    #[test]
    fn expand_releases_the_leaf_board() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, _) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);

        tree.expand(0, policy.view(), &pool);
        assert!(tree.root().board.is_none());
        for &child_id in &tree.root().children.clone() {
            assert!(tree.node(child_id).board.is_some());
        }
    }

    #[test]
    fn backpropagate_negates_along_the_parent_chain() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, _) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);
        tree.expand(0, policy.view(), &pool);

        let child = tree.root().children[0];
        tree.backpropagate(child, 0.8);

        assert_eq!(tree.node(child).value_sum, 0.8);
        assert_eq!(tree.node(child).visit_count, 1);
        assert_eq!(tree.root().value_sum, -0.8);
        assert_eq!(tree.root().visit_count, 1);
    }

    #[test]
    fn select_child_prefers_the_higher_prior_when_unvisited() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let moves = board.legal_moves();
        let mut policy = Array3::zeros((NUM_ACTION_CHANNELS, 14, 14));
        for (i, mv) in moves.iter().take(3).enumerate() {
            let (plane, row, col) = move_to_index(mv);
            policy[[plane, row, col]] = if i == 1 { 0.6 } else { 0.2 };
        }
        let mut tree = SearchTree::new(board, 3.0);
        tree.expand(0, policy.view(), &pool);
        tree.node_mut(0).visit_count = 1;

        let selected = tree.select_child(0).unwrap();
        assert_eq!(tree.node(selected).prior, 0.6);
    }

    #[test]
    fn choose_leaf_returns_the_unexpanded_frontier() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, _) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);

        assert_eq!(tree.choose_leaf(), Some(0));
        tree.expand(0, policy.view(), &pool);
        tree.backpropagate(0, 0.0);

        let leaf = tree.choose_leaf().expect("live position");
        assert_ne!(leaf, 0);
        assert!(tree.root().children.contains(&leaf));
    }

    #[test]
    fn root_distribution_reflects_visit_counts() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, _) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);
        tree.expand(0, policy.view(), &pool);

        let first = tree.root().children[0];
        let second = tree.root().children[1];
        tree.backpropagate(first, 0.5);
        tree.backpropagate(first, 0.5);
        tree.backpropagate(second, -0.5);

        let distribution = tree.root_action_distribution();
        let total: f32 = distribution.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);

        let first_move = tree.node(first).move_made.unwrap();
        let flat = move_to_flat_index(&first_move);
        assert!((distribution[flat] - 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn memory_append_records_the_root_snapshot() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, _) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);
        tree.expand(0, policy.view(), &pool);
        tree.backpropagate(tree.root().children[0], 0.1);

        tree.append_root_memory();
        assert_eq!(tree.memory.len(), 1);
        let entry = &tree.memory[0];
        assert_eq!(entry.color, crate::core::PlayerColor::Red);
        assert_eq!(entry.policy.len(), ACTION_SPACE_SIZE);
        assert_eq!(entry.state.turn, tree.root_state().turn);
    }

    #[test]
    fn release_boards_returns_everything_to_the_pool() {
        let pool = BoardPool::new(64);
        let mut board = pool.acquire(&Board::standard_setup());
        let (policy, _) = uniform_root_policy(&mut board);
        let mut tree = SearchTree::new(board, 3.0);
        tree.expand(0, policy.view(), &pool);

        let before = pool.available();
        let owned = tree
            .nodes
            .iter()
            .filter(|node| node.board.is_some())
            .count();
        tree.release_boards(&pool);
        assert_eq!(pool.available(), before + owned);
        assert!(tree.nodes.iter().all(|node| node.board.is_none()));
    }
}
