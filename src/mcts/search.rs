//! Batched MCTS search orchestration.
//!
//! A search advances a batch of independent root trees in lockstep: each
//! simulation selects one leaf per tree, encodes the non-terminal leaves
//! into one state batch, makes a single evaluator call, then expands and
//! backpropagates per tree. The loop itself runs cooperatively on one
//! thread; parallelism lives inside the evaluator and the board pool's
//! refill. Terminal leaves backpropagate immediately inside selection and
//! never reach the evaluator.

use half::f16;
use log::debug;
use ndarray::{Array3, Array4, ArrayView4, Axis};

use crate::core::{Move, BOARD_SIZE, NUM_ACTION_CHANNELS};
use crate::eval::{EvalError, Evaluator};
use crate::game::{encode_state, moves_mask, Board, NUM_STATE_CHANNELS};

use super::config::MctsConfig;
use super::node::NodeId;
use super::pool::BoardPool;
use super::tree::SearchTree;

/// Per-root result of a finished search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Move chosen at the root; `None` when the root was terminal.
    pub best_move: Option<Move>,
    /// Normalized visit distribution over the root children, in child
    /// insertion order. Empty when the root was terminal.
    pub move_probs: Vec<f32>,
}

/// Build one tree per board, each root board drawn from the pool.
pub fn create_trees(boards: &[Board], pool: &BoardPool, c_puct: f32) -> Vec<SearchTree> {
    boards
        .iter()
        .map(|board| SearchTree::new(pool.acquire(board), c_puct))
        .collect()
}

// ============================================================================
// Batched Expansion / Backpropagation
// ============================================================================

/// Expand a batch of leaves from one evaluator call. `leaves` pairs each
/// policy row with its `(tree, node)` target.
pub fn expand_nodes(
    trees: &mut [SearchTree],
    leaves: &[(usize, NodeId)],
    policies: ArrayView4<'_, f32>,
    pool: &BoardPool,
) {
    for (batch_idx, &(tree_idx, leaf)) in leaves.iter().enumerate() {
        trees[tree_idx].expand(leaf, policies.index_axis(Axis(0), batch_idx), pool);
    }
}

/// Backpropagate one evaluator value per leaf.
pub fn backpropagate_nodes(trees: &mut [SearchTree], leaves: &[(usize, NodeId)], values: &[f32]) {
    for (&(tree_idx, leaf), &value) in leaves.iter().zip(values) {
        trees[tree_idx].backpropagate(leaf, value);
    }
}

// ============================================================================
// Simulation Loop
// ============================================================================

/// Advance every tree by `num_simulations` simulations.
pub fn run_simulations<E: Evaluator>(
    trees: &mut [SearchTree],
    evaluator: &E,
    pool: &BoardPool,
    num_simulations: usize,
) -> Result<(), EvalError> {
    for _ in 0..num_simulations {
        // Selection and leaf encoding, one tree after another.
        let selections: Vec<Option<(NodeId, Array3<f16>, Vec<Move>)>> = trees
            .iter_mut()
            .map(|tree| {
                let leaf = tree.choose_leaf()?;
                let board = tree
                    .node_mut(leaf)
                    .board
                    .as_mut()
                    .expect("leaf owns a board");
                let moves = board.legal_moves();
                let state = encode_state(board);
                Some((leaf, state, moves))
            })
            .collect();

        // Gather the non-terminal leaves into one batch.
        let mut leaves = Vec::with_capacity(trees.len());
        let mut states_data = Vec::with_capacity(trees.len());
        let mut masks_data = Vec::with_capacity(trees.len());
        for (tree_idx, selection) in selections.into_iter().enumerate() {
            if let Some((leaf, state, moves)) = selection {
                leaves.push((tree_idx, leaf));
                states_data.push(state);
                masks_data.push(moves_mask(&moves));
            }
        }
        if leaves.is_empty() {
            continue;
        }

        let batch = leaves.len();
        let mut states = Array4::from_elem(
            (batch, NUM_STATE_CHANNELS, BOARD_SIZE, BOARD_SIZE),
            f16::ZERO,
        );
        let mut masks = Array4::zeros((batch, NUM_ACTION_CHANNELS, BOARD_SIZE, BOARD_SIZE));
        for (i, (state, mask)) in states_data.into_iter().zip(masks_data).enumerate() {
            states.index_axis_mut(Axis(0), i).assign(&state);
            masks.index_axis_mut(Axis(0), i).assign(&mask);
        }

        // One evaluator call for the whole batch.
        let (policies, values) = evaluator.evaluate(states.view(), masks.view())?;
        if values.len() != batch {
            return Err(EvalError::BatchMismatch {
                expected: batch,
                got: values.len(),
            });
        }

        expand_nodes(trees, &leaves, policies.view(), pool);
        backpropagate_nodes(trees, &leaves, &values);
    }
    Ok(())
}

/// Full search over a batch of positions: build trees, prime the roots
/// with one simulation, mix Dirichlet noise into the root priors, run the
/// configured simulations, and pick a move per root. The returned trees
/// still hold their statistics and memory; hand them back to the pool
/// with `SearchTree::release_boards` when done.
pub fn run_search<E: Evaluator>(
    boards: &[Board],
    evaluator: &E,
    pool: &BoardPool,
    config: &MctsConfig,
) -> Result<(Vec<SearchTree>, Vec<SearchOutcome>), EvalError> {
    let mut trees = create_trees(boards, pool, config.c_puct);

    // Priming pass: expands each live root and seeds its visit count.
    run_simulations(&mut trees, evaluator, pool, 1)?;
    if config.dirichlet_epsilon > 0.0 {
        for tree in &mut trees {
            add_dirichlet_noise(tree, config.dirichlet_alpha, config.dirichlet_epsilon);
        }
    }

    run_simulations(&mut trees, evaluator, pool, config.num_simulations)?;
    debug!(
        "search finished: {} trees, {} simulations each",
        trees.len(),
        config.num_simulations
    );

    let outcomes = trees
        .iter()
        .map(|tree| select_move(tree, config.temperature))
        .collect();
    Ok((trees, outcomes))
}

// ============================================================================
// Root Utilities
// ============================================================================

/// Mix Dirichlet-style noise into the root priors:
/// `prior = (1 - eps) * prior + eps * noise`.
pub fn add_dirichlet_noise(tree: &mut SearchTree, alpha: f32, epsilon: f32) {
    if epsilon <= 0.0 || tree.root().children.is_empty() {
        return;
    }

    let children: Vec<NodeId> = tree.root().children.clone();
    let mut noise: Vec<f32> = (0..children.len())
        .map(|_| fastrand::f32().max(f32::MIN_POSITIVE).powf(1.0 / alpha))
        .collect();
    let total: f32 = noise.iter().sum();
    for n in &mut noise {
        *n /= total;
    }

    for (&child_id, &n) in children.iter().zip(&noise) {
        let child = tree.node_mut(child_id);
        child.prior = (1.0 - epsilon) * child.prior + epsilon * n;
    }
}

/// Pick a move from the root visit counts. Temperature 0 takes the most
/// visited child; otherwise sampling follows `visits^(1/temperature)`.
pub fn select_move(tree: &SearchTree, temperature: f32) -> SearchOutcome {
    let root = tree.root();
    if root.children.is_empty() {
        return SearchOutcome {
            best_move: None,
            move_probs: Vec::new(),
        };
    }

    let visits: Vec<u32> = root
        .children
        .iter()
        .map(|&child_id| tree.node(child_id).visit_count)
        .collect();
    let total: u32 = visits.iter().sum();
    if total == 0 {
        return SearchOutcome {
            best_move: None,
            move_probs: Vec::new(),
        };
    }

    let mut move_probs = vec![0.0f32; visits.len()];
    let selected_idx;

    if temperature == 0.0 {
        let best_idx = visits
            .iter()
            .enumerate()
            .max_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap_or(0);
        move_probs[best_idx] = 1.0;
        selected_idx = best_idx;
    } else {
        let mut sum = 0.0f32;
        for (prob, &v) in move_probs.iter_mut().zip(&visits) {
            *prob = (v as f32).powf(1.0 / temperature);
            sum += *prob;
        }
        for prob in &mut move_probs {
            *prob /= sum;
        }

        let sample = fastrand::f32();
        let mut cumulative = 0.0f32;
        let mut chosen = move_probs.len() - 1;
        for (i, &prob) in move_probs.iter().enumerate() {
            cumulative += prob;
            if cumulative >= sample {
                chosen = i;
                break;
            }
        }
        selected_idx = chosen;
    }

    let child_id = root.children[selected_idx];
    SearchOutcome {
        best_move: tree.node(child_id).move_made,
        move_probs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::UniformEvaluator;

    #[test]
    fn one_simulation_expands_and_visits_each_root() {
        let pool = BoardPool::new(128);
        let boards = vec![Board::standard_setup(), Board::standard_setup()];
        let evaluator = UniformEvaluator::new(0.25);
        let mut trees = create_trees(&boards, &pool, 2.0);

        run_simulations(&mut trees, &evaluator, &pool, 1).unwrap();

        for tree in &trees {
            assert_eq!(tree.root().visit_count, 1);
            assert_eq!(tree.root().children.len(), 20);
            assert!((tree.root().value_sum - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn simulations_accumulate_root_visits() {
        let pool = BoardPool::new(256);
        let boards = vec![Board::standard_setup()];
        let evaluator = UniformEvaluator::new(0.0);
        let mut trees = create_trees(&boards, &pool, 2.0);

        run_simulations(&mut trees, &evaluator, &pool, 8).unwrap();
        assert_eq!(trees[0].root().visit_count, 8);

        // Visits at depth one sum to everything below the root.
        let child_visits: u32 = trees[0]
            .root()
            .children
            .iter()
            .map(|&c| trees[0].node(c).visit_count)
            .sum();
        assert_eq!(child_visits, 7);
    }

    #[test]
    fn run_search_yields_a_move_per_root() {
        let pool = BoardPool::new(512);
        let boards = vec![Board::standard_setup()];
        let evaluator = UniformEvaluator::new(0.0);
        let config = MctsConfig {
            num_simulations: 12,
            temperature: 0.0,
            dirichlet_epsilon: 0.0,
            ..MctsConfig::default()
        };

        let (mut trees, outcomes) = run_search(&boards, &evaluator, &pool, &config).unwrap();
        assert_eq!(outcomes.len(), 1);
        let outcome = &outcomes[0];
        assert!(outcome.best_move.is_some());
        assert_eq!(outcome.move_probs.iter().filter(|&&p| p == 1.0).count(), 1);

        for tree in &mut trees {
            tree.release_boards(&pool);
        }
    }

    #[test]
    fn dirichlet_noise_keeps_priors_normalized() {
        let pool = BoardPool::new(128);
        let boards = vec![Board::standard_setup()];
        let evaluator = UniformEvaluator::new(0.0);
        let mut trees = create_trees(&boards, &pool, 2.0);
        run_simulations(&mut trees, &evaluator, &pool, 1).unwrap();

        fastrand::seed(7);
        add_dirichlet_noise(&mut trees[0], 0.3, 0.25);
        let prior_sum: f32 = trees[0]
            .root()
            .children
            .iter()
            .map(|&c| trees[0].node(c).prior)
            .sum();
        assert!((prior_sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn temperature_zero_picks_the_most_visited_child() {
        let pool = BoardPool::new(128);
        let boards = vec![Board::standard_setup()];
        let evaluator = UniformEvaluator::new(0.0);
        let mut trees = create_trees(&boards, &pool, 2.0);
        run_simulations(&mut trees, &evaluator, &pool, 6).unwrap();

        let outcome = select_move(&trees[0], 0.0);
        let best_idx = outcome
            .move_probs
            .iter()
            .position(|&p| p == 1.0)
            .expect("deterministic pick");
        let best_child = trees[0].root().children[best_idx];
        let best_visits = trees[0].node(best_child).visit_count;
        for &child in &trees[0].root().children {
            assert!(trees[0].node(child).visit_count <= best_visits);
        }
        assert_eq!(outcome.best_move, trees[0].node(best_child).move_made);
    }
}
