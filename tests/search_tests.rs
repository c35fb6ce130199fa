//! End-to-end search scenarios: single-step expansion against a stub
//! evaluator, multi-simulation searches over the standard setup, terminal
//! roots, and the self-play memory hook.

use fpchess::core::{
    CastlingRights, PieceType, PlacedPiece, Player, PlayerColor, ACTION_SPACE_SIZE,
};
use fpchess::eval::UniformEvaluator;
use fpchess::game::Board;
use fpchess::mcts::{create_trees, run_search, run_simulations, select_move, BoardPool, MctsConfig};

#[test]
fn one_search_step_expands_the_root_over_all_legal_actions() {
    // The starting position has exactly 20 legal actions; the masked
    // uniform evaluator returns a policy with exactly those entries
    // non-zero and a fixed value of 0.25.
    let pool = BoardPool::new(256);
    let boards = vec![Board::standard_setup()];
    let evaluator = UniformEvaluator::new(0.25);
    let mut trees = create_trees(&boards, &pool, 2.0);

    run_simulations(&mut trees, &evaluator, &pool, 1).unwrap();

    let root = trees[0].root();
    assert_eq!(root.children.len(), 20);
    assert_eq!(root.visit_count, 1);
    let prior_sum: f32 = root
        .children
        .iter()
        .map(|&c| trees[0].node(c).prior)
        .sum();
    assert!((prior_sum - 1.0).abs() < 1e-5);
    assert!((root.value_sum - 0.25).abs() < 1e-6);
}

#[test]
fn search_over_the_standard_setup_picks_a_legal_move() {
    let pool = BoardPool::new(1024);
    let boards = vec![Board::standard_setup(), Board::standard_setup()];
    let evaluator = UniformEvaluator::new(0.0);
    let config = MctsConfig {
        num_simulations: 24,
        temperature: 0.0,
        dirichlet_epsilon: 0.0,
        ..MctsConfig::default()
    };

    let (mut trees, outcomes) = run_search(&boards, &evaluator, &pool, &config).unwrap();

    let mut reference = Board::standard_setup();
    let legal = reference.legal_moves();
    for outcome in &outcomes {
        let chosen = outcome.best_move.expect("live position yields a move");
        assert!(legal.contains(&chosen));
        let prob_sum: f32 = outcome.move_probs.iter().sum();
        assert!((prob_sum - 1.0).abs() < 1e-5);
    }

    for tree in &mut trees {
        tree.release_boards(&pool);
    }
}

#[test]
fn boards_flow_back_to_the_pool_after_release() {
    let pool = BoardPool::new(64);
    let boards = vec![Board::standard_setup()];
    let evaluator = UniformEvaluator::new(0.0);
    let mut trees = create_trees(&boards, &pool, 2.0);
    run_simulations(&mut trees, &evaluator, &pool, 4).unwrap();

    for tree in &mut trees {
        tree.release_boards(&pool);
    }
    // Everything the search borrowed is back; nothing owns a board now.
    assert!(trees
        .iter()
        .all(|t| t.nodes.iter().all(|n| n.board.is_none())));
    assert!(pool.available() > 0);
}

#[test]
fn terminal_roots_backpropagate_without_an_evaluator_call() {
    // Checkmated RED: the root is terminal, so every simulation resolves
    // inside selection.
    let placed = [
        PlacedPiece::new(
            fpchess::core::BoardLocation::new(13, 7),
            fpchess::core::Piece::new(PlayerColor::Red, PieceType::King),
        ),
        PlacedPiece::new(
            fpchess::core::BoardLocation::new(13, 3),
            fpchess::core::Piece::new(PlayerColor::Blue, PieceType::Rook),
        ),
        PlacedPiece::new(
            fpchess::core::BoardLocation::new(12, 3),
            fpchess::core::Piece::new(PlayerColor::Blue, PieceType::Rook),
        ),
        PlacedPiece::new(
            fpchess::core::BoardLocation::new(7, 0),
            fpchess::core::Piece::new(PlayerColor::Blue, PieceType::King),
        ),
    ];
    let board = Board::new(
        Player::new(PlayerColor::Red),
        &placed,
        [CastlingRights::new(false, false); 4],
    );

    let pool = BoardPool::new(32);
    let evaluator = UniformEvaluator::new(0.0);
    let mut trees = create_trees(&[board], &pool, 2.0);
    run_simulations(&mut trees, &evaluator, &pool, 5).unwrap();

    let root = trees[0].root();
    assert!(root.children.is_empty());
    assert_eq!(root.visit_count, 5);
    // Lost position for the player to move: every backup adds -1.
    assert!((root.value_sum + 5.0).abs() < 1e-6);

    let outcome = select_move(&trees[0], 0.0);
    assert!(outcome.best_move.is_none());
    assert!(outcome.move_probs.is_empty());
}

#[test]
fn self_play_step_appends_a_memory_entry() {
    let pool = BoardPool::new(512);
    let boards = vec![Board::standard_setup()];
    let evaluator = UniformEvaluator::new(0.1);
    let config = MctsConfig {
        num_simulations: 10,
        temperature: 1.0,
        dirichlet_epsilon: 0.25,
        ..MctsConfig::default()
    };

    fastrand::seed(42);
    let (mut trees, outcomes) = run_search(&boards, &evaluator, &pool, &config).unwrap();
    let tree = &mut trees[0];
    tree.append_root_memory();

    assert_eq!(tree.memory.len(), 1);
    let entry = &tree.memory[0];
    assert_eq!(entry.color, PlayerColor::Red);
    assert_eq!(entry.policy.len(), ACTION_SPACE_SIZE);
    let policy_sum: f32 = entry.policy.iter().sum();
    assert!((policy_sum - 1.0).abs() < 1e-4);
    assert_eq!(entry.state.turn.color(), PlayerColor::Red);

    // The sampled move matches a child of the root.
    let chosen = outcomes[0].best_move.expect("live root");
    assert!(tree
        .root()
        .children
        .iter()
        .any(|&c| tree.node(c).move_made == Some(chosen)));

    tree.release_boards(&pool);
}

#[test]
fn deeper_searches_reuse_pool_boards() {
    let pool = BoardPool::new(64);
    let boards = vec![Board::standard_setup()];
    let evaluator = UniformEvaluator::new(0.0);

    for _ in 0..3 {
        let mut trees = create_trees(&boards, &pool, 2.0);
        run_simulations(&mut trees, &evaluator, &pool, 3).unwrap();
        for tree in &mut trees {
            tree.release_boards(&pool);
        }
    }
    // Three searches in a row settle on the pool's refill size: nothing
    // leaks.
    let settled = pool.available();
    let mut trees = create_trees(&boards, &pool, 2.0);
    run_simulations(&mut trees, &evaluator, &pool, 3).unwrap();
    for tree in &mut trees {
        tree.release_boards(&pool);
    }
    assert_eq!(pool.available(), settled);
}
