//! Pseudo-legal and legal move generation.
//!
//! Generation walks the piece list of the side to move and writes into a
//! caller-supplied buffer. Pseudo-legal moves obey piece movement and
//! never land on a friendly piece but may leave the mover's own king in
//! check; `legal_moves` filters those with a make/undo probe.

use crate::core::{
    is_playable, is_promotion_square, pawn_direction, pawn_on_start_rank, BoardLocation,
    CastlingRights, CastlingType, Move, MoveBuffer, Piece, PieceType, Player, PlayerColor,
    SimpleMove, Team, KNIGHT_JUMPS, MOVE_BUFFER_SIZE, ORTHOGONAL_DIRS,
};

use super::board::Board;

/// Promotion expansion order.
const PROMOTION_KINDS: [PieceType; 4] = [
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
];

/// Push a pawn arrival, expanding into the four promotion moves when the
/// destination is the pawn's promotion rank.
fn add_pawn_moves(
    moves: &mut MoveBuffer<'_>,
    from: BoardLocation,
    to: BoardLocation,
    color: PlayerColor,
    capture: Piece,
) {
    if is_promotion_square(color, to.row(), to.col()) {
        for kind in PROMOTION_KINDS {
            moves.push(Move::pawn(from, to, capture, kind));
        }
    } else {
        moves.push(Move::pawn(from, to, capture, PieceType::None));
    }
}

impl Board {
    // ========================================================================
    // Pseudo-legal Generation
    // ========================================================================

    /// Write all pseudo-legal moves for the side to move into `buffer` and
    /// return the count. Produces zero moves when the mover's king has
    /// already been captured. Panics on buffer overflow (the default bound
    /// of 300 suffices for every position of this variant).
    pub fn pseudo_legal_moves(&self, buffer: &mut [Move]) -> usize {
        self.pseudo_legal_moves_for(self.turn(), buffer)
    }

    /// Same as `pseudo_legal_moves`, for an explicit player.
    pub fn pseudo_legal_moves_for(&self, player: Player, buffer: &mut [Move]) -> usize {
        let mut moves = MoveBuffer::new(buffer);
        let color = player.color();

        if self.king_location(color).missing() {
            return 0;
        }

        // The piece list is iterated by index: generators only read the
        // board, and the list is not mutated during generation.
        for i in 0..self.pieces(color).len() {
            let placed = self.pieces(color)[i];
            match placed.piece.piece_type() {
                PieceType::Pawn => self.pawn_moves(&mut moves, placed.location, placed.piece),
                PieceType::Knight => self.knight_moves(&mut moves, placed.location, placed.piece),
                PieceType::Bishop => self.bishop_moves(&mut moves, placed.location, placed.piece),
                PieceType::Rook => self.rook_moves(&mut moves, placed.location, placed.piece),
                PieceType::Queen => self.queen_moves(&mut moves, placed.location, placed.piece),
                PieceType::King => self.king_moves(&mut moves, placed.location, placed.piece),
                PieceType::None => unreachable!("empty piece in piece list"),
            }
        }

        moves.len()
    }

    fn pawn_moves(&self, moves: &mut MoveBuffer<'_>, from: BoardLocation, piece: Piece) {
        let color = piece.color();
        let team = piece.team();
        let (delta_row, delta_col) = pawn_direction(color);

        // Forward pushes.
        let to = from.relative(delta_row, delta_col);
        if is_playable(to.row(), to.col()) && self.piece(to).missing() {
            add_pawn_moves(moves, from, to, color, Piece::NONE);
            if pawn_on_start_rank(color, from.row(), from.col()) {
                let to2 = from.relative(delta_row * 2, delta_col * 2);
                if self.piece(to2).missing() {
                    add_pawn_moves(moves, from, to2, color, Piece::NONE);
                }
            }
        }

        // Diagonal-forward captures: forward plus one step perpendicular,
        // where perpendicular means column for RY pawns and row for BG.
        let check_cols = team == Team::RedYellow;
        for side in [-1i8, 1] {
            let mut capture_row = from.row() + delta_row;
            let mut capture_col = from.col() + delta_col;
            if check_cols {
                capture_col += side;
            } else {
                capture_row += side;
            }
            if is_playable(capture_row, capture_col) {
                let other = self.piece_rc(capture_row, capture_col);
                if other.present() && other.team() != team {
                    add_pawn_moves(
                        moves,
                        from,
                        BoardLocation::new(capture_row, capture_col),
                        color,
                        other,
                    );
                }
            }
        }
    }

    fn knight_moves(&self, moves: &mut MoveBuffer<'_>, from: BoardLocation, piece: Piece) {
        for (delta_row, delta_col) in KNIGHT_JUMPS {
            let to = from.relative(delta_row, delta_col);
            if !is_playable(to.row(), to.col()) {
                continue;
            }
            let capture = self.piece(to);
            if capture.missing() || capture.team() != piece.team() {
                moves.push(Move::standard(from, to, capture));
            }
        }
    }

    /// Slide along one ray, stopping at the first occupied square (capture
    /// if enemy-team). Rights pairs ride along on every emitted move.
    fn slide_moves(
        &self,
        moves: &mut MoveBuffer<'_>,
        piece: Piece,
        from: BoardLocation,
        incr_row: i8,
        incr_col: i8,
        initial_castling_rights: CastlingRights,
        castling_rights: CastlingRights,
    ) {
        let mut to = from.relative(incr_row, incr_col);
        while is_playable(to.row(), to.col()) {
            let capture = self.piece(to);
            if capture.missing() {
                moves.push(Move::with_rights(
                    from,
                    to,
                    Piece::NONE,
                    initial_castling_rights,
                    castling_rights,
                ));
            } else {
                if capture.team() != piece.team() {
                    moves.push(Move::with_rights(
                        from,
                        to,
                        capture,
                        initial_castling_rights,
                        castling_rights,
                    ));
                }
                break;
            }
            to = to.relative(incr_row, incr_col);
        }
    }

    fn bishop_moves(&self, moves: &mut MoveBuffer<'_>, from: BoardLocation, piece: Piece) {
        for incr_row in [-1i8, 1] {
            for incr_col in [-1i8, 1] {
                self.slide_moves(
                    moves,
                    piece,
                    from,
                    incr_row,
                    incr_col,
                    CastlingRights::MISSING,
                    CastlingRights::MISSING,
                );
            }
        }
    }

    fn rook_moves(&self, moves: &mut MoveBuffer<'_>, from: BoardLocation, piece: Piece) {
        // A rook leaving one of its initial squares gives up that side's
        // castling right; the move carries the before/after pair.
        let mut initial_castling_rights = CastlingRights::MISSING;
        let mut castling_rights = CastlingRights::MISSING;
        if let Some(castling_type) = self.rook_location_type(piece.color(), from) {
            let current = self.castling_rights(piece.color());
            if current.kingside() || current.queenside() {
                match castling_type {
                    CastlingType::Kingside if current.kingside() => {
                        initial_castling_rights = current;
                        castling_rights = CastlingRights::new(false, current.queenside());
                    }
                    CastlingType::Queenside if current.queenside() => {
                        initial_castling_rights = current;
                        castling_rights = CastlingRights::new(current.kingside(), false);
                    }
                    _ => {}
                }
            }
        }

        for (incr_row, incr_col) in ORTHOGONAL_DIRS {
            self.slide_moves(
                moves,
                piece,
                from,
                incr_row,
                incr_col,
                initial_castling_rights,
                castling_rights,
            );
        }
    }

    fn queen_moves(&self, moves: &mut MoveBuffer<'_>, from: BoardLocation, piece: Piece) {
        self.bishop_moves(moves, from, piece);
        self.rook_moves(moves, from, piece);
    }

    fn king_moves(&self, moves: &mut MoveBuffer<'_>, from: BoardLocation, piece: Piece) {
        let initial_castling_rights = self.castling_rights(piece.color());
        let castling_rights = CastlingRights::new(false, false);

        // Single steps; any king move gives up both rights.
        for delta_row in -1i8..=1 {
            for delta_col in -1i8..=1 {
                if delta_row == 0 && delta_col == 0 {
                    continue;
                }
                let to = from.relative(delta_row, delta_col);
                if !is_playable(to.row(), to.col()) {
                    continue;
                }
                let capture = self.piece(to);
                if capture.missing() || capture.team() != piece.team() {
                    moves.push(Move::with_rights(
                        from,
                        to,
                        capture,
                        initial_castling_rights,
                        castling_rights,
                    ));
                }
            }
        }

        // Castling. The king slides two squares toward the rook; the rook
        // lands on the square the king crossed.
        let other_team = piece.team().other();
        for castling_type in [CastlingType::Kingside, CastlingType::Queenside] {
            let allowed = match castling_type {
                CastlingType::Kingside => initial_castling_rights.kingside(),
                CastlingType::Queenside => initial_castling_rights.queenside(),
            };
            if !allowed {
                continue;
            }

            // Step direction from the king toward this side's rook.
            let (step_row, step_col) = match (piece.color(), castling_type) {
                (PlayerColor::Red, CastlingType::Kingside) => (0, 1),
                (PlayerColor::Red, CastlingType::Queenside) => (0, -1),
                (PlayerColor::Blue, CastlingType::Kingside) => (1, 0),
                (PlayerColor::Blue, CastlingType::Queenside) => (-1, 0),
                (PlayerColor::Yellow, CastlingType::Kingside) => (0, -1),
                (PlayerColor::Yellow, CastlingType::Queenside) => (0, 1),
                (PlayerColor::Green, CastlingType::Kingside) => (-1, 0),
                (PlayerColor::Green, CastlingType::Queenside) => (1, 0),
            };
            // Kingside rooks sit three steps out, queenside four.
            let gap = match castling_type {
                CastlingType::Kingside => 2,
                CastlingType::Queenside => 3,
            };

            let rook_location = from.relative(step_row * (gap + 1), step_col * (gap + 1));
            if rook_location.missing() {
                continue;
            }
            let rook = self.piece(rook_location);
            if rook.missing()
                || rook.piece_type() != PieceType::Rook
                || rook.team() != piece.team()
            {
                continue;
            }

            let mut piece_between = false;
            for step in 1..=gap {
                let between = from.relative(step_row * step, step_col * step);
                if self.piece(between).present() {
                    piece_between = true;
                    break;
                }
            }
            if piece_between {
                continue;
            }

            // Neither the king's square nor the square it crosses may be
            // attacked by the opposing team.
            let crossed = from.relative(step_row, step_col);
            if self.is_attacked_by_team(other_team, crossed)
                || self.is_attacked_by_team(other_team, from)
            {
                continue;
            }

            let king_to = from.relative(step_row * 2, step_col * 2);
            moves.push(Move::castle(
                from,
                king_to,
                SimpleMove::new(rook_location, crossed),
                initial_castling_rights,
                castling_rights,
            ));
        }
    }

    // ========================================================================
    // Legality
    // ========================================================================

    /// Does playing `mv` leave the current mover's own king out of check?
    pub fn is_king_safe_after_move(&mut self, mv: &Move) -> bool {
        let mover = self.turn();
        self.make_move(mv);
        let safe = !self.is_king_in_check(mover);
        self.undo_move();
        safe
    }

    /// All legal moves for the side to move: pseudo-legal filtered by the
    /// king-safety probe.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let mut buffer = [Move::default(); MOVE_BUFFER_SIZE];
        let count = self.pseudo_legal_moves(&mut buffer);

        let mut legal = Vec::with_capacity(count);
        for i in 0..count {
            let mv = buffer[i];
            if self.is_king_safe_after_move(&mv) {
                legal.push(mv);
            }
        }
        legal
    }

    /// Membership in the pseudo-legal set followed by the king-safety probe.
    pub fn is_move_legal(&mut self, mv: &Move) -> bool {
        let mut buffer = [Move::default(); MOVE_BUFFER_SIZE];
        let count = self.pseudo_legal_moves(&mut buffer);
        if !buffer[..count].contains(mv) {
            return false;
        }
        self.is_king_safe_after_move(mv)
    }
}
