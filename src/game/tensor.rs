//! Tensor computation for neural network input and output.
//!
//! States are encoded as a 24-channel one-hot stack (4 players x 6 piece
//! kinds) in a player-relative view: the mover's pieces occupy channels
//! 0-5 and the whole stack is spatially rotated so the mover always looks
//! "up the board". Storage is `f16` (the values are exactly 0 or 1); the
//! evaluator boundary widens to `f32`.

use half::f16;
use ndarray::{Array2, Array3, Array4, ArrayView2, ArrayViewMut2, Axis};

use crate::core::{
    move_to_index, Move, Player, PlayerColor, ACTION_SPACE_SIZE, BOARD_SIZE, NUM_ACTION_CHANNELS,
};

use super::board::Board;

// ============================================================================
// Dimensions
// ============================================================================

/// State channels: 4 players x 6 piece kinds.
pub const NUM_STATE_CHANNELS: usize = 24;

/// Flattened state size.
pub const STATE_SPACE_SIZE: usize = NUM_STATE_CHANNELS * BOARD_SIZE * BOARD_SIZE;

/// Channel block for `color` as seen by `mover`: the mover occupies
/// channels 0-5, the next player in turn order 6-11, and so on.
#[inline]
pub fn color_channel_offset(color: PlayerColor, mover: PlayerColor) -> usize {
    6 * ((4 + color as usize - mover as usize) % 4)
}

// ============================================================================
// Perspective Rotation
// ============================================================================

fn rotate_plane_into<T: Copy>(src: ArrayView2<'_, T>, mut dst: ArrayViewMut2<'_, T>, k: usize) {
    let n = src.nrows();
    match k {
        1 => {
            // Quarter turn counterclockwise.
            for r in 0..n {
                for c in 0..n {
                    dst[[r, c]] = src[[c, n - 1 - r]];
                }
            }
        }
        2 => {
            for r in 0..n {
                for c in 0..n {
                    dst[[r, c]] = src[[n - 1 - r, n - 1 - c]];
                }
            }
        }
        3 => {
            // Quarter turn clockwise.
            for r in 0..n {
                for c in 0..n {
                    dst[[r, c]] = src[[n - 1 - c, r]];
                }
            }
        }
        _ => dst.assign(&src),
    }
}

/// Rotate every trailing 14x14 plane of a batched tensor by
/// `quarter_turns` counterclockwise quarter turns (negative = clockwise).
pub fn change_perspective<T: Copy + Default>(
    tensor: &Array4<T>,
    quarter_turns: i32,
) -> Array4<T> {
    let k = quarter_turns.rem_euclid(4) as usize;
    if k == 0 {
        return tensor.clone();
    }
    let mut out = Array4::from_elem(tensor.raw_dim(), T::default());
    for (src_batch, mut dst_batch) in tensor
        .axis_iter(Axis(0))
        .zip(out.axis_iter_mut(Axis(0)))
    {
        for (src_plane, dst_plane) in src_batch
            .axis_iter(Axis(0))
            .zip(dst_batch.axis_iter_mut(Axis(0)))
        {
            rotate_plane_into(src_plane, dst_plane, k);
        }
    }
    out
}

/// Single-state variant of `change_perspective`.
pub fn change_perspective_single<T: Copy + Default>(
    tensor: &Array3<T>,
    quarter_turns: i32,
) -> Array3<T> {
    let k = quarter_turns.rem_euclid(4) as usize;
    if k == 0 {
        return tensor.clone();
    }
    let mut out = Array3::from_elem(tensor.raw_dim(), T::default());
    for (src_plane, dst_plane) in tensor
        .axis_iter(Axis(0))
        .zip(out.axis_iter_mut(Axis(0)))
    {
        rotate_plane_into(src_plane, dst_plane, k);
    }
    out
}

// ============================================================================
// State Encoding
// ============================================================================

/// Encode one board into its `[24, 14, 14]` player-relative tensor.
pub fn encode_state(board: &Board) -> Array3<f16> {
    let mover = board.turn().color();
    let mut tensor = Array3::from_elem(
        (NUM_STATE_CHANNELS, BOARD_SIZE, BOARD_SIZE),
        f16::ZERO,
    );

    for list in board.piece_lists() {
        for placed in list {
            let channel = color_channel_offset(placed.piece.color(), mover)
                + placed.piece.piece_type() as usize
                - 1;
            tensor[[
                channel,
                placed.location.row() as usize,
                placed.location.col() as usize,
            ]] = f16::ONE;
        }
    }

    // Rotate so the mover looks up the board (a quarter turn per seat).
    change_perspective_single(&tensor, mover as i32)
}

/// Encode a batch of boards into `[B, 24, 14, 14]`.
pub fn encode_states(boards: &[&Board]) -> Array4<f16> {
    let mut out = Array4::from_elem(
        (boards.len(), NUM_STATE_CHANNELS, BOARD_SIZE, BOARD_SIZE),
        f16::ZERO,
    );
    for (i, board) in boards.iter().enumerate() {
        out.index_axis_mut(Axis(0), i).assign(&encode_state(board));
    }
    out
}

// ============================================================================
// Legal-move Masks
// ============================================================================

/// Mask one move list into a `[112, 14, 14]` plane stack (board frame).
pub fn moves_mask(moves: &[Move]) -> Array3<f32> {
    let mut mask = Array3::zeros((NUM_ACTION_CHANNELS, BOARD_SIZE, BOARD_SIZE));
    for mv in moves {
        let (plane, row, col) = move_to_index(mv);
        mask[[plane, row, col]] = 1.0;
    }
    mask
}

/// Mask a batch of move lists into `[B, 112, 14, 14]`.
pub fn legal_moves_mask(move_lists: &[Vec<Move>]) -> Array4<f32> {
    let mut masks = Array4::zeros((
        move_lists.len(),
        NUM_ACTION_CHANNELS,
        BOARD_SIZE,
        BOARD_SIZE,
    ));
    for (i, moves) in move_lists.iter().enumerate() {
        masks.index_axis_mut(Axis(0), i).assign(&moves_mask(moves));
    }
    masks
}

// ============================================================================
// Action-space Parsing
// ============================================================================

/// Reshape flattened action distributions `[N, 112*196]` into
/// `[N, 112, 14, 14]` and undo the perspective rotation for `turn`.
/// Adapters apply this to raw network output before masking.
pub fn parse_actionspace(actions: &Array2<f32>, turn: Player) -> Array4<f32> {
    assert_eq!(actions.ncols(), ACTION_SPACE_SIZE, "flat action width");
    let batch = actions.nrows();
    let reshaped = actions
        .to_owned()
        .into_shape_with_order((batch, NUM_ACTION_CHANNELS, BOARD_SIZE, BOARD_SIZE))
        .expect("action reshape");
    change_perspective(&reshaped, -(turn.color() as i32))
}
