//! Board state for the 14x14 cut-corner 4-player variant.
//!
//! The board owns a dense piece grid, per-color piece lists sorted by a
//! fixed move-ordering priority, per-color king locations, castling
//! rights, the turn, and a bounded ring of recent moves that powers exact
//! undo. Make and undo are strict inverses keyed entirely off the move's
//! own fields.

use std::collections::VecDeque;

use crate::core::{
    is_playable, is_promotion_square, BoardLocation, CastlingRights, CastlingType, GameResult,
    Move, Piece, PieceType, PlacedPiece, Player, PlayerColor, Team, BOARD_SIZE,
    MAX_MOVES_STORAGE, MAX_PIECES_PER_COLOR, MOVE_BUFFER_SIZE,
};

// ============================================================================
// SimpleBoardState
// ============================================================================

/// A cheap snapshot of the observable position: turn, placed pieces per
/// color, castling rights, and per-color attacked squares. This is the
/// state half of a training memory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBoardState {
    pub turn: Player,
    pub pieces: [Vec<PlacedPiece>; 4],
    pub castling_rights: [CastlingRights; 4],
    pub attacked_squares: [Vec<BoardLocation>; 4],
}

// ============================================================================
// Board
// ============================================================================

/// The complete game state.
///
/// Conventions: RED sits at the bottom, BLUE left, YELLOW top, GREEN
/// right; rows grow downward and columns rightward.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Dense lookup grid. Cut-out squares always hold `Piece::NONE`.
    grid: [[Piece; BOARD_SIZE]; BOARD_SIZE],
    /// Per-color piece lists, sorted by `PieceType::move_order`.
    piece_list: [Vec<PlacedPiece>; 4],
    /// Per-color king squares; sentinel once the king is captured.
    king_locations: [BoardLocation; 4],
    /// Per-color castling rights.
    castling_rights: [CastlingRights; 4],
    /// Ring of the most recent moves, newest last. The oldest entry is
    /// dropped once `max_moves_storage` is exceeded.
    moves: VecDeque<Move>,
    max_moves_storage: usize,
    /// Side to move.
    turn: Player,
}

impl Board {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Build a board from explicit placed pieces. Piece lists are sorted by
    /// the fixed move-ordering priority (king first).
    pub fn new(
        turn: Player,
        placed_pieces: &[PlacedPiece],
        castling_rights: [CastlingRights; 4],
    ) -> Board {
        let mut board = Board::empty();
        board.turn = turn;
        for (color, rights) in PlayerColor::ALL.iter().zip(castling_rights) {
            board.castling_rights[*color as usize] = if rights.present() {
                rights
            } else {
                CastlingRights::new(false, false)
            };
        }

        for placed in placed_pieces {
            board.set_piece(placed.location, placed.piece);
        }

        for list in &mut board.piece_list {
            list.sort_by_key(|placed| placed.piece.piece_type().move_order());
        }

        board
    }

    /// An empty board (no pieces, RED to move, no rights). Board pools
    /// preallocate these and fill them by `copy_from`.
    pub fn empty() -> Board {
        Board {
            grid: [[Piece::NONE; BOARD_SIZE]; BOARD_SIZE],
            piece_list: std::array::from_fn(|_| Vec::with_capacity(MAX_PIECES_PER_COLOR)),
            king_locations: [BoardLocation::NONE; 4],
            castling_rights: [CastlingRights::new(false, false); 4],
            moves: VecDeque::with_capacity(MAX_MOVES_STORAGE + 1),
            max_moves_storage: MAX_MOVES_STORAGE,
            turn: Player::new(PlayerColor::Red),
        }
    }

    /// The standard starting position, built programmatically. Agrees with
    /// `Board::from_fen(START_FEN)`.
    pub fn standard_setup() -> Board {
        use PieceType::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut placed = Vec::with_capacity(64);
        for color in PlayerColor::ALL {
            // Walk the back rank from its queenside end, pawns one step in
            // front of it.
            let (mut location, delta, pawn_offset) = match color {
                PlayerColor::Red => (BoardLocation::new(13, 3), (0, 1), (-1, 0)),
                PlayerColor::Blue => (BoardLocation::new(3, 0), (1, 0), (0, 1)),
                PlayerColor::Yellow => (BoardLocation::new(0, 10), (0, -1), (1, 0)),
                PlayerColor::Green => (BoardLocation::new(10, 13), (-1, 0), (0, -1)),
            };
            for piece_type in back_rank {
                placed.push(PlacedPiece::new(location, Piece::new(color, piece_type)));
                placed.push(PlacedPiece::new(
                    location.relative(pawn_offset.0, pawn_offset.1),
                    Piece::new(color, Pawn),
                ));
                location = location.relative(delta.0, delta.1);
            }
        }

        Board::new(
            Player::new(PlayerColor::Red),
            &placed,
            [CastlingRights::new(true, true); 4],
        )
    }

    /// Overwrite this board with `other`, reusing existing allocations.
    /// This is the pool's acquire path.
    pub fn copy_from(&mut self, other: &Board) {
        self.grid = other.grid;
        for (dst, src) in self.piece_list.iter_mut().zip(&other.piece_list) {
            dst.clone_from(src);
        }
        self.king_locations = other.king_locations;
        self.castling_rights = other.castling_rights;
        self.moves.clone_from(&other.moves);
        self.max_moves_storage = other.max_moves_storage;
        self.turn = other.turn;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Use with caution: after overriding the player you must restore it
    /// before undoing past the current moves. Null-move style callers only.
    #[inline]
    pub fn set_turn(&mut self, player: Player) {
        self.turn = player;
    }

    #[inline]
    pub fn team_to_play(&self) -> Team {
        self.turn.team()
    }

    /// Piece at a grid square; assumes the coordinates are on the grid.
    #[inline]
    pub(crate) fn piece(&self, location: BoardLocation) -> Piece {
        self.grid[location.row() as usize][location.col() as usize]
    }

    #[inline]
    pub(crate) fn piece_rc(&self, row: i8, col: i8) -> Piece {
        self.grid[row as usize][col as usize]
    }

    /// Bounds-checked piece lookup; `None` for out-of-grid coordinates.
    #[inline]
    pub fn get_piece_at(&self, row: i8, col: i8) -> Option<Piece> {
        if crate::core::is_on_grid(row, col) {
            Some(self.piece_rc(row, col))
        } else {
            None
        }
    }

    #[inline]
    pub fn pieces(&self, color: PlayerColor) -> &[PlacedPiece] {
        &self.piece_list[color as usize]
    }

    #[inline]
    pub fn piece_lists(&self) -> &[Vec<PlacedPiece>; 4] {
        &self.piece_list
    }

    #[inline]
    pub fn king_location(&self, color: PlayerColor) -> BoardLocation {
        self.king_locations[color as usize]
    }

    #[inline]
    pub fn castling_rights(&self, color: PlayerColor) -> CastlingRights {
        self.castling_rights[color as usize]
    }

    #[inline]
    pub fn all_castling_rights(&self) -> &[CastlingRights; 4] {
        &self.castling_rights
    }

    /// Most recent move, if the ring still holds one.
    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.back()
    }

    /// The retained tail of the move ring, oldest first.
    pub fn move_ring(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    /// Which castling side `location` is an initial rook square for, if any.
    pub(crate) fn rook_location_type(
        &self,
        color: PlayerColor,
        location: BoardLocation,
    ) -> Option<CastlingType> {
        if location == crate::core::initial_rook_location(color, CastlingType::Kingside) {
            Some(CastlingType::Kingside)
        } else if location == crate::core::initial_rook_location(color, CastlingType::Queenside) {
            Some(CastlingType::Queenside)
        } else {
            None
        }
    }

    // ========================================================================
    // Piece Placement
    // ========================================================================

    /// Place a piece: grid, piece list, and king location stay in sync.
    pub(crate) fn set_piece(&mut self, location: BoardLocation, piece: Piece) {
        self.grid[location.row() as usize][location.col() as usize] = piece;
        self.piece_list[piece.color() as usize].push(PlacedPiece::new(location, piece));
        if piece.piece_type() == PieceType::King {
            self.king_locations[piece.color() as usize] = location;
        }
    }

    /// Remove the piece standing on `location`. Panics if the square is
    /// empty; callers name squares they know to be occupied.
    pub(crate) fn remove_piece(&mut self, location: BoardLocation) {
        let piece = self.piece(location);
        if piece.missing() {
            panic!("no piece to remove at {location}");
        }
        self.grid[location.row() as usize][location.col() as usize] = Piece::NONE;
        let list = &mut self.piece_list[piece.color() as usize];
        if let Some(pos) = list.iter().position(|placed| placed.location == location) {
            list.remove(pos);
        }
        if piece.piece_type() == PieceType::King {
            self.king_locations[piece.color() as usize] = BoardLocation::NONE;
        }
    }

    // ========================================================================
    // Make / Undo
    // ========================================================================

    /// Apply a move. Effects land in a fixed order: standard capture
    /// removal, mover removal, placement (promoted piece if promoting),
    /// en-passant victim removal, rook leg, castling-rights install, turn
    /// advance, move-ring append.
    pub fn make_move(&mut self, mv: &Move) {
        let piece = self.piece(mv.from);
        if piece.missing() {
            panic!(
                "piece missing for move {} (turn: {})",
                mv.pretty(),
                self.turn
            );
        }

        let standard_capture = self.piece(mv.to);
        if standard_capture.present() {
            self.remove_piece(mv.to);
        }

        self.remove_piece(mv.from);
        if mv.promotion_piece_type != PieceType::None {
            self.set_piece(mv.to, Piece::new(self.turn.color(), mv.promotion_piece_type));
        } else {
            self.set_piece(mv.to, piece);
        }

        if mv.en_passant_location.present() {
            self.remove_piece(mv.en_passant_location);
        } else {
            if mv.rook_move.present() {
                let rook = self.piece(mv.rook_move.from);
                self.remove_piece(mv.rook_move.from);
                self.set_piece(mv.rook_move.to, rook);
            }
            if mv.castling_rights.present() {
                self.castling_rights[self.turn.color() as usize] = mv.castling_rights;
            }
        }

        self.turn = self.turn.next();
        self.moves.push_back(*mv);
        if self.moves.len() > self.max_moves_storage {
            self.moves.pop_front();
        }
    }

    /// Reverse the most recent move, keyed entirely off the move's own
    /// fields. Panics if the ring is empty or the moved piece is gone.
    pub fn undo_move(&mut self) {
        let mv = *self
            .moves
            .back()
            .unwrap_or_else(|| panic!("undo with an empty move ring"));
        let turn_before = self.turn.previous();

        let piece = self.piece(mv.to);
        if piece.missing() {
            panic!("piece missing at {} in undo of {}", mv.to, mv.pretty());
        }

        self.remove_piece(mv.to);
        if mv.promotion_piece_type != PieceType::None {
            self.set_piece(mv.from, Piece::new(turn_before.color(), PieceType::Pawn));
        } else {
            self.set_piece(mv.from, piece);
        }

        if mv.standard_capture.present() {
            self.set_piece(mv.to, mv.standard_capture);
        }

        if mv.en_passant_location.present() {
            self.set_piece(mv.en_passant_location, mv.en_passant_capture);
        } else {
            if mv.rook_move.present() {
                self.remove_piece(mv.rook_move.to);
                self.set_piece(
                    mv.rook_move.from,
                    Piece::new(turn_before.color(), PieceType::Rook),
                );
            }
            if mv.initial_castling_rights.present() {
                self.castling_rights[turn_before.color() as usize] = mv.initial_castling_rights;
            }
        }

        self.turn = turn_before;
        self.moves.pop_back();
    }

    /// Advance the turn without moving anything (null-move pruning hook).
    pub fn make_null_move(&mut self) {
        self.turn = self.turn.next();
    }

    pub fn undo_null_move(&mut self) {
        self.turn = self.turn.previous();
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Resolve a bare decoded `from -> to` move into the full record the
    /// current position implies: capture filled from the grid, promotion
    /// collapsed to QUEEN, castling recognized with its rook leg. Falls
    /// back to grid-level completion when the index does not match any
    /// pseudo-legal move.
    pub fn complete_move(&self, mv: &Move) -> Move {
        let mut buffer = [Move::default(); MOVE_BUFFER_SIZE];
        let count = self.pseudo_legal_moves(&mut buffer);

        let mut promotion_fallback = None;
        for candidate in &buffer[..count] {
            if candidate.from != mv.from || candidate.to != mv.to {
                continue;
            }
            match candidate.promotion_piece_type {
                PieceType::None | PieceType::Queen => return *candidate,
                _ => promotion_fallback = Some(*candidate),
            }
        }
        if let Some(candidate) = promotion_fallback {
            return candidate;
        }

        // Not pseudo-legal here; complete what the grid can tell us.
        let mut completed = *mv;
        if completed.from.missing() || completed.to.missing() {
            return completed;
        }
        completed.standard_capture = self.piece(mv.to);
        let mover = self.piece(mv.from);
        if mover.present()
            && mover.piece_type() == PieceType::Pawn
            && is_promotion_square(mover.color(), mv.to.row(), mv.to.col())
        {
            completed.promotion_piece_type = PieceType::Queen;
        }
        completed
    }

    /// Copy the board and play a (completed) replay move on the copy.
    pub fn take_action(&self, mv: &Move) -> Board {
        let completed = self.complete_move(mv);
        let mut next = self.clone();
        next.make_move(&completed);
        next
    }

    // ========================================================================
    // Terminal Detection
    // ========================================================================

    /// Early-exit probe: did the most recent move capture a king?
    pub fn check_was_last_move_king_capture(&self) -> GameResult {
        if let Some(last) = self.moves.back() {
            let capture = last.capture_piece();
            if capture.present() && capture.piece_type() == PieceType::King {
                return GameResult::win_for_other(capture.team());
            }
        }
        GameResult::InProgress
    }

    /// Game result for `player` (side to move when omitted).
    ///
    /// A missing king loses immediately. Otherwise pseudo-legal moves are
    /// probed one by one; the first that leaves the mover's own king out of
    /// check proves the game is still in progress. With no such move the
    /// position is stalemate or a loss depending on whether the king is
    /// currently checked. Avoid calling this from search inner loops.
    pub fn game_result(&mut self, player: Option<Player>) -> GameResult {
        let player = player.unwrap_or(self.turn);

        if self.king_location(player.color()).missing() {
            return GameResult::win_for_other(player.team());
        }

        let mut buffer = [Move::default(); MOVE_BUFFER_SIZE];
        let count = self.pseudo_legal_moves_for(player, &mut buffer);

        for i in 0..count {
            let mv = buffer[i];
            self.make_move(&mv);
            let king_capture = self.check_was_last_move_king_capture();
            if king_capture != GameResult::InProgress {
                self.undo_move();
                return king_capture;
            }
            let legal = !self.is_king_in_check(player);
            self.undo_move();
            if legal {
                return GameResult::InProgress;
            }
        }

        if !self.is_king_in_check(player) {
            return GameResult::Stalemate;
        }
        GameResult::win_for_other(player.team())
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Snapshot the observable position (memory entries, UIs).
    pub fn simple_state(&self) -> SimpleBoardState {
        SimpleBoardState {
            turn: self.turn,
            pieces: self.piece_list.clone(),
            castling_rights: self.castling_rights,
            attacked_squares: self.attacked_squares(),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_SIZE as i8 {
            let rank = BOARD_SIZE as i8 - row;
            write!(f, "{rank:>2}:")?;
            for col in 0..BOARD_SIZE as i8 {
                if !is_playable(row, col) {
                    write!(f, "   ")?;
                    continue;
                }
                let piece = self.piece_rc(row, col);
                if piece.missing() {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{}{} ", piece.color() as u8, piece.piece_type().letter())?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE as u8 {
            write!(f, " {} ", (b'a' + col) as char)?;
        }
        writeln!(f)?;
        writeln!(f, "Turn: {}", self.turn)
    }
}
