//! Attack detection and check queries.
//!
//! These run direct geometric scans from the queried square (reverse rays
//! for sliders, fixed-offset probes for knights, pawns, and kings) rather
//! than re-running move generation. They are the inner loop of check
//! detection, so they return as early as the caller allows.

use crate::core::{
    is_playable, BoardLocation, Move, PieceType, PlacedPiece, Player, PlayerColor, Team,
    DIAGONAL_DIRS, KNIGHT_JUMPS, ORTHOGONAL_DIRS,
};

use super::board::Board;

#[inline]
fn order(a: i8, b: i8) -> (i8, i8) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Board {
    // ========================================================================
    // Per-kind Attack Predicates
    // ========================================================================

    /// Rook on `rook_loc` attacks `other_loc`: shared rank or file with no
    /// piece between.
    pub(crate) fn rook_attacks(&self, rook_loc: BoardLocation, other_loc: BoardLocation) -> bool {
        if rook_loc.row() == other_loc.row() {
            let row = rook_loc.row();
            let (lo, hi) = order(rook_loc.col(), other_loc.col());
            if (lo + 1..hi).all(|col| self.piece_rc(row, col).missing()) {
                return true;
            }
        }
        if rook_loc.col() == other_loc.col() {
            let col = rook_loc.col();
            let (lo, hi) = order(rook_loc.row(), other_loc.row());
            if (lo + 1..hi).all(|row| self.piece_rc(row, col).missing()) {
                return true;
            }
        }
        false
    }

    /// Bishop on `bishop_loc` attacks `other_loc`: shared diagonal with no
    /// piece between.
    pub(crate) fn bishop_attacks(
        &self,
        bishop_loc: BoardLocation,
        other_loc: BoardLocation,
    ) -> bool {
        let delta_row = other_loc.row() - bishop_loc.row();
        let delta_col = other_loc.col() - bishop_loc.col();
        if delta_row.abs() != delta_col.abs() || delta_row == 0 {
            return false;
        }
        let step_row = delta_row.signum();
        let step_col = delta_col.signum();
        let mut row = bishop_loc.row() + step_row;
        let mut col = bishop_loc.col() + step_col;
        while row != other_loc.row() {
            if self.piece_rc(row, col).present() {
                return false;
            }
            row += step_row;
            col += step_col;
        }
        true
    }

    #[inline]
    pub(crate) fn queen_attacks(&self, queen_loc: BoardLocation, other_loc: BoardLocation) -> bool {
        self.rook_attacks(queen_loc, other_loc) || self.bishop_attacks(queen_loc, other_loc)
    }

    #[inline]
    pub(crate) fn knight_attacks(knight_loc: BoardLocation, other_loc: BoardLocation) -> bool {
        let abs_row = (knight_loc.row() - other_loc.row()).abs();
        let abs_col = (knight_loc.col() - other_loc.col()).abs();
        (abs_row == 1 && abs_col == 2) || (abs_row == 2 && abs_col == 1)
    }

    /// Pawn on `pawn_loc` attacks `other_loc`: one square diagonally
    /// forward relative to the pawn's color.
    pub(crate) fn pawn_attacks(
        pawn_loc: BoardLocation,
        pawn_color: PlayerColor,
        other_loc: BoardLocation,
    ) -> bool {
        let row_diff = other_loc.row() - pawn_loc.row();
        let col_diff = other_loc.col() - pawn_loc.col();
        match pawn_color {
            PlayerColor::Red => row_diff == -1 && col_diff.abs() == 1,
            PlayerColor::Blue => col_diff == 1 && row_diff.abs() == 1,
            PlayerColor::Yellow => row_diff == 1 && col_diff.abs() == 1,
            PlayerColor::Green => col_diff == -1 && row_diff.abs() == 1,
        }
    }

    // ========================================================================
    // Attacker Enumeration
    // ========================================================================

    /// Write the pieces of `team` attacking `location` into `buffer`,
    /// returning the count; stops early once the buffer is full. A limit of
    /// one turns this into an any-attacker probe.
    pub fn attackers(
        &self,
        buffer: &mut [PlacedPiece],
        team: Team,
        location: BoardLocation,
    ) -> usize {
        assert!(!buffer.is_empty());
        let mut pos = 0;

        macro_rules! add_attacker {
            ($row:expr, $col:expr, $piece:expr) => {
                buffer[pos] = PlacedPiece::new(BoardLocation::new($row, $col), $piece);
                pos += 1;
                if pos == buffer.len() {
                    return pos;
                }
            };
        }

        let loc_row = location.row();
        let loc_col = location.col();

        // Rooks and queens: walk each orthogonal ray to the first piece.
        for (step_row, step_col) in ORTHOGONAL_DIRS {
            let mut row = loc_row + step_row;
            let mut col = loc_col + step_col;
            while is_playable(row, col) {
                let piece = self.piece_rc(row, col);
                if piece.present() {
                    if piece.team() == team
                        && matches!(piece.piece_type(), PieceType::Rook | PieceType::Queen)
                    {
                        add_attacker!(row, col, piece);
                    }
                    break;
                }
                row += step_row;
                col += step_col;
            }
        }

        // Bishops and queens on the diagonals.
        for (step_row, step_col) in DIAGONAL_DIRS {
            let mut row = loc_row + step_row;
            let mut col = loc_col + step_col;
            while is_playable(row, col) {
                let piece = self.piece_rc(row, col);
                if piece.present() {
                    if piece.team() == team
                        && matches!(piece.piece_type(), PieceType::Bishop | PieceType::Queen)
                    {
                        add_attacker!(row, col, piece);
                    }
                    break;
                }
                row += step_row;
                col += step_col;
            }
        }

        // Knights.
        for (delta_row, delta_col) in KNIGHT_JUMPS {
            let row = loc_row + delta_row;
            let col = loc_col + delta_col;
            if is_playable(row, col) {
                let piece = self.piece_rc(row, col);
                if piece.present()
                    && piece.team() == team
                    && piece.piece_type() == PieceType::Knight
                {
                    add_attacker!(row, col, piece);
                }
            }
        }

        // Pawns on the four diagonal neighbors, honoring their forward
        // direction.
        for delta_row in [-1i8, 1] {
            for delta_col in [-1i8, 1] {
                let row = loc_row + delta_row;
                let col = loc_col + delta_col;
                if !is_playable(row, col) {
                    continue;
                }
                let piece = self.piece_rc(row, col);
                if piece.present() && piece.team() == team && piece.piece_type() == PieceType::Pawn
                {
                    let pawn_loc = BoardLocation::new(row, col);
                    if Self::pawn_attacks(pawn_loc, piece.color(), location) {
                        add_attacker!(row, col, piece);
                    }
                }
            }
        }

        // Kings on the eight neighbors.
        for delta_row in -1i8..=1 {
            for delta_col in -1i8..=1 {
                if delta_row == 0 && delta_col == 0 {
                    continue;
                }
                let row = loc_row + delta_row;
                let col = loc_col + delta_col;
                if is_playable(row, col) {
                    let piece = self.piece_rc(row, col);
                    if piece.present()
                        && piece.team() == team
                        && piece.piece_type() == PieceType::King
                    {
                        add_attacker!(row, col, piece);
                    }
                }
            }
        }

        pos
    }

    /// Does any piece of `team` attack `location`?
    pub fn is_attacked_by_team(&self, team: Team, location: BoardLocation) -> bool {
        let mut buffer = [PlacedPiece::new(BoardLocation::NONE, crate::core::Piece::NONE); 1];
        self.attackers(&mut buffer, team, location) > 0
    }

    /// Does any piece of the single color `color` attack `location`?
    pub fn is_attacked_by_player(&self, location: BoardLocation, color: PlayerColor) -> bool {
        // A team fields at most 32 pieces, so the buffer never saturates.
        let mut buffer =
            [PlacedPiece::new(BoardLocation::NONE, crate::core::Piece::NONE); 32];
        let count = self.attackers(&mut buffer, color.team(), location);
        buffer[..count]
            .iter()
            .any(|placed| placed.piece.color() == color)
    }

    /// Per-color lists of attacked squares over the whole playable board.
    /// Snapshot material; not for search inner loops.
    pub fn attacked_squares(&self) -> [Vec<BoardLocation>; 4] {
        let mut result: [Vec<BoardLocation>; 4] = Default::default();
        for row in 0..crate::core::BOARD_SIZE as i8 {
            for col in 0..crate::core::BOARD_SIZE as i8 {
                if !is_playable(row, col) {
                    continue;
                }
                let location = BoardLocation::new(row, col);
                for color in PlayerColor::ALL {
                    if self.is_attacked_by_player(location, color) {
                        result[color as usize].push(location);
                    }
                }
            }
        }
        result
    }

    // ========================================================================
    // Checks
    // ========================================================================

    /// Is `player`'s king attacked by the opposing team? False once the
    /// king has been captured.
    pub fn is_king_in_check(&self, player: Player) -> bool {
        let king_location = self.king_location(player.color());
        if king_location.missing() {
            return false;
        }
        self.is_attacked_by_team(player.team().other(), king_location)
    }

    /// Is either of the team's kings in check?
    pub fn is_king_in_check_team(&self, team: Team) -> bool {
        match team {
            Team::RedYellow => {
                self.is_king_in_check(Player::new(PlayerColor::Red))
                    || self.is_king_in_check(Player::new(PlayerColor::Yellow))
            }
            Team::BlueGreen => {
                self.is_king_in_check(Player::new(PlayerColor::Blue))
                    || self.is_king_in_check(Player::new(PlayerColor::Green))
            }
        }
    }

    /// Would `mv` attack either enemy king from its destination? Discovered
    /// checks are not found; use `discovers_check` for those.
    pub fn delivers_check(&self, mv: &Move) -> bool {
        let color = self.turn().color();
        let piece = self.piece(mv.from);

        for add in [1u8, 3] {
            let other = PlayerColor::from_u8(color as u8 + add);
            let king_loc = self.king_location(other);
            if king_loc.missing() {
                continue;
            }
            if king_loc == mv.to {
                return true;
            }
            let checks = match piece.piece_type() {
                PieceType::Pawn => Self::pawn_attacks(mv.to, piece.color(), king_loc),
                PieceType::Knight => Self::knight_attacks(mv.to, king_loc),
                PieceType::Bishop => self.bishop_attacks(mv.to, king_loc),
                PieceType::Rook => self.rook_attacks(mv.to, king_loc),
                PieceType::Queen => self.queen_attacks(mv.to, king_loc),
                _ => false,
            };
            if checks {
                return true;
            }
        }
        false
    }

    /// Does vacating `move_from` open a slider line from `attacking_team`
    /// onto `king_location`? `move_to` is exempted since the mover may stay
    /// on the line.
    pub fn discovers_check(
        &self,
        king_location: BoardLocation,
        move_from: BoardLocation,
        move_to: BoardLocation,
        attacking_team: Team,
    ) -> bool {
        let delta_row = move_from.row() - king_location.row();
        let delta_col = move_from.col() - king_location.col();
        if delta_row.abs() != delta_col.abs() && delta_row != 0 && delta_col != 0 {
            return false;
        }

        let step_row = delta_row.signum();
        let step_col = delta_col.signum();
        if step_row == 0 && step_col == 0 {
            return false;
        }
        let orthogonal = delta_row == 0 || delta_col == 0;

        let mut row = king_location.row() + step_row;
        let mut col = king_location.col() + step_col;
        while is_playable(row, col) {
            if row != move_from.row() || col != move_from.col() {
                if row == move_to.row() && col == move_to.col() {
                    return false;
                }
                let piece = self.piece_rc(row, col);
                if piece.present() {
                    if piece.team() == attacking_team {
                        let slider = match piece.piece_type() {
                            PieceType::Queen => true,
                            PieceType::Rook => orthogonal,
                            PieceType::Bishop => !orthogonal,
                            _ => false,
                        };
                        if slider {
                            return true;
                        }
                    }
                    break;
                }
            }
            row += step_row;
            col += step_col;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CastlingRights, Piece, PlacedPiece};

    fn sparse_board(placed: &[PlacedPiece]) -> Board {
        Board::new(
            Player::new(PlayerColor::Red),
            placed,
            [CastlingRights::new(false, false); 4],
        )
    }

    fn at(row: i8, col: i8) -> BoardLocation {
        BoardLocation::new(row, col)
    }

    #[test]
    fn rook_attacks_along_open_lines_only() {
        let board = sparse_board(&[
            PlacedPiece::new(at(7, 3), Piece::new(PlayerColor::Blue, PieceType::Rook)),
            PlacedPiece::new(at(7, 8), Piece::new(PlayerColor::Red, PieceType::Pawn)),
        ]);
        assert!(board.rook_attacks(at(7, 3), at(7, 8)));
        assert!(board.rook_attacks(at(7, 3), at(12, 3)));
        assert!(!board.rook_attacks(at(7, 3), at(7, 10))); // blocked by the pawn
        assert!(!board.rook_attacks(at(7, 3), at(8, 4)));
    }

    #[test]
    fn bishop_attacks_respect_blockers() {
        let board = sparse_board(&[
            PlacedPiece::new(at(7, 7), Piece::new(PlayerColor::Green, PieceType::Bishop)),
            PlacedPiece::new(at(5, 5), Piece::new(PlayerColor::Red, PieceType::Pawn)),
        ]);
        assert!(board.bishop_attacks(at(7, 7), at(5, 5)));
        assert!(!board.bishop_attacks(at(7, 7), at(4, 4)));
        assert!(board.bishop_attacks(at(7, 7), at(10, 10)));
        assert!(!board.bishop_attacks(at(7, 7), at(7, 9)));
    }

    #[test]
    fn pawn_attack_direction_depends_on_color() {
        // RED pawns attack upward (toward lower rows).
        assert!(Board::pawn_attacks(at(8, 5), PlayerColor::Red, at(7, 4)));
        assert!(Board::pawn_attacks(at(8, 5), PlayerColor::Red, at(7, 6)));
        assert!(!Board::pawn_attacks(at(8, 5), PlayerColor::Red, at(9, 4)));
        // BLUE pawns attack rightward.
        assert!(Board::pawn_attacks(at(8, 5), PlayerColor::Blue, at(7, 6)));
        assert!(!Board::pawn_attacks(at(8, 5), PlayerColor::Blue, at(7, 4)));
        // YELLOW pawns attack downward, GREEN leftward.
        assert!(Board::pawn_attacks(at(8, 5), PlayerColor::Yellow, at(9, 6)));
        assert!(Board::pawn_attacks(at(8, 5), PlayerColor::Green, at(9, 4)));
    }

    #[test]
    fn attackers_collects_every_attacking_piece() {
        let board = sparse_board(&[
            PlacedPiece::new(at(7, 3), Piece::new(PlayerColor::Blue, PieceType::Rook)),
            PlacedPiece::new(at(4, 4), Piece::new(PlayerColor::Green, PieceType::Bishop)),
            PlacedPiece::new(at(5, 6), Piece::new(PlayerColor::Blue, PieceType::Knight)),
            PlacedPiece::new(at(7, 7), Piece::new(PlayerColor::Red, PieceType::King)),
        ]);
        let mut buffer = [PlacedPiece::new(BoardLocation::NONE, Piece::NONE); 8];
        let count = board.attackers(&mut buffer, Team::BlueGreen, at(7, 7));
        assert_eq!(count, 3);
    }

    #[test]
    fn attackers_respects_the_buffer_limit() {
        let board = sparse_board(&[
            PlacedPiece::new(at(7, 3), Piece::new(PlayerColor::Blue, PieceType::Rook)),
            PlacedPiece::new(at(3, 7), Piece::new(PlayerColor::Blue, PieceType::Rook)),
        ]);
        let mut buffer = [PlacedPiece::new(BoardLocation::NONE, Piece::NONE); 1];
        assert_eq!(board.attackers(&mut buffer, Team::BlueGreen, at(7, 7)), 1);
    }

    #[test]
    fn king_in_check_sees_through_open_files() {
        let board = sparse_board(&[
            PlacedPiece::new(at(13, 7), Piece::new(PlayerColor::Red, PieceType::King)),
            PlacedPiece::new(at(5, 7), Piece::new(PlayerColor::Blue, PieceType::Rook)),
        ]);
        assert!(board.is_king_in_check(Player::new(PlayerColor::Red)));
        assert!(board.is_king_in_check_team(Team::RedYellow));
        assert!(!board.is_king_in_check_team(Team::BlueGreen));
    }

    #[test]
    fn no_check_without_a_king() {
        let board = sparse_board(&[PlacedPiece::new(
            at(5, 7),
            Piece::new(PlayerColor::Blue, PieceType::Rook),
        )]);
        assert!(!board.is_king_in_check(Player::new(PlayerColor::Red)));
    }

    #[test]
    fn starting_position_has_no_checks() {
        let board = Board::standard_setup();
        for color in PlayerColor::ALL {
            assert!(!board.is_king_in_check(Player::new(color)));
        }
    }

    #[test]
    fn delivers_check_spots_a_rook_lining_up() {
        let board = sparse_board(&[
            PlacedPiece::new(at(13, 3), Piece::new(PlayerColor::Red, PieceType::Rook)),
            PlacedPiece::new(at(7, 0), Piece::new(PlayerColor::Blue, PieceType::King)),
        ]);
        let checking = Move::standard(at(13, 3), at(7, 3), Piece::NONE);
        assert!(board.delivers_check(&checking));
        let quiet = Move::standard(at(13, 3), at(12, 3), Piece::NONE);
        assert!(!board.delivers_check(&quiet));
    }

    #[test]
    fn discovers_check_finds_the_unmasked_slider() {
        let board = sparse_board(&[
            PlacedPiece::new(at(7, 7), Piece::new(PlayerColor::Red, PieceType::King)),
            PlacedPiece::new(at(7, 5), Piece::new(PlayerColor::Red, PieceType::Knight)),
            PlacedPiece::new(at(7, 2), Piece::new(PlayerColor::Blue, PieceType::Rook)),
        ]);
        // The knight stepping off the file unmasks the rook.
        assert!(board.discovers_check(at(7, 7), at(7, 5), at(5, 4), Team::BlueGreen));
        // Staying on the line keeps the king covered.
        assert!(!board.discovers_check(at(7, 7), at(7, 5), at(7, 4), Team::BlueGreen));
    }
}
