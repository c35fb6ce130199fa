//! Packed piece and board location representations.
//!
//! Both types fit in a single byte so the 14x14 grid and the per-color
//! piece lists stay small and cheap to copy during MCTS expansion.

use super::constants::{is_on_grid, BOARD_SIZE};
use super::types::{PieceType, Player, PlayerColor, Team};

// ============================================================================
// Piece
// ============================================================================

/// A compact piece (1 byte).
///
/// Bit layout:
/// - bit 7: presence
/// - bits 5-6: color
/// - bits 2-4: piece kind
///
/// The all-zero byte is the empty square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// The empty square.
    pub const NONE: Piece = Piece(0);

    /// Create a present piece of `color` and `piece_type`.
    #[inline]
    pub fn new(color: PlayerColor, piece_type: PieceType) -> Piece {
        Piece(0x80 | ((color as u8) << 5) | ((piece_type as u8) << 2))
    }

    #[inline]
    pub fn present(self) -> bool {
        self.0 & 0x80 != 0
    }

    #[inline]
    pub fn missing(self) -> bool {
        !self.present()
    }

    #[inline]
    pub fn color(self) -> PlayerColor {
        PlayerColor::from_u8((self.0 >> 5) & 0b11)
    }

    #[inline]
    pub fn piece_type(self) -> PieceType {
        PieceType::from_u8((self.0 >> 2) & 0b111)
    }

    #[inline]
    pub fn player(self) -> Player {
        Player::new(self.color())
    }

    #[inline]
    pub fn team(self) -> Team {
        self.color().team()
    }
}

impl Default for Piece {
    fn default() -> Piece {
        Piece::NONE
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.missing() {
            return f.write_str("--");
        }
        write!(f, "{}({})", self.color(), self.piece_type().letter())
    }
}

// ============================================================================
// BoardLocation
// ============================================================================

/// Sentinel encoding for "no location".
const NO_LOCATION: u8 = (BOARD_SIZE * BOARD_SIZE) as u8;

/// A square on the 14x14 grid, encoded as `row * 14 + col` in a single
/// byte. Value 196 is the "absent" sentinel; out-of-grid coordinates
/// collapse to it on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BoardLocation(u8);

impl BoardLocation {
    /// The absent location.
    pub const NONE: BoardLocation = BoardLocation(NO_LOCATION);

    #[inline]
    pub fn new(row: i8, col: i8) -> BoardLocation {
        if is_on_grid(row, col) {
            BoardLocation(row as u8 * BOARD_SIZE as u8 + col as u8)
        } else {
            BoardLocation::NONE
        }
    }

    #[inline]
    pub fn present(self) -> bool {
        self.0 < NO_LOCATION
    }

    #[inline]
    pub fn missing(self) -> bool {
        !self.present()
    }

    #[inline]
    pub fn row(self) -> i8 {
        (self.0 / BOARD_SIZE as u8) as i8
    }

    #[inline]
    pub fn col(self) -> i8 {
        (self.0 % BOARD_SIZE as u8) as i8
    }

    /// The square offset by `(delta_row, delta_col)`, or the absent
    /// sentinel when that falls off the grid.
    #[inline]
    pub fn relative(self, delta_row: i8, delta_col: i8) -> BoardLocation {
        BoardLocation::new(self.row() + delta_row, self.col() + delta_col)
    }

    /// Algebraic-style name: file letter (a..n) then rank counted from the
    /// bottom (14 - row).
    pub fn pretty(self) -> String {
        if self.missing() {
            return "-".to_string();
        }
        format!("{}{}", (b'a' + self.col() as u8) as char, 14 - self.row())
    }
}

impl Default for BoardLocation {
    fn default() -> BoardLocation {
        BoardLocation::NONE
    }
}

impl std::fmt::Display for BoardLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pretty())
    }
}

// ============================================================================
// PlacedPiece
// ============================================================================

/// A piece together with the square it stands on; the element type of the
/// per-color piece lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPiece {
    pub location: BoardLocation,
    pub piece: Piece,
}

impl PlacedPiece {
    #[inline]
    pub fn new(location: BoardLocation, piece: Piece) -> PlacedPiece {
        PlacedPiece { location, piece }
    }
}

impl std::fmt::Display for PlacedPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.piece, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_byte_round_trips_color_and_kind() {
        for color in PlayerColor::ALL {
            for piece_type in [
                PieceType::Pawn,
                PieceType::Knight,
                PieceType::Bishop,
                PieceType::Rook,
                PieceType::Queen,
                PieceType::King,
            ] {
                let piece = Piece::new(color, piece_type);
                assert!(piece.present());
                assert_eq!(piece.color(), color);
                assert_eq!(piece.piece_type(), piece_type);
            }
        }
    }

    #[test]
    fn empty_piece_is_all_zero() {
        assert!(Piece::NONE.missing());
        assert_eq!(Piece::default(), Piece::NONE);
        assert_eq!(Piece::NONE.piece_type(), PieceType::None);
    }

    #[test]
    fn location_round_trips_row_and_col() {
        for row in 0..14 {
            for col in 0..14 {
                let loc = BoardLocation::new(row, col);
                assert!(loc.present());
                assert_eq!(loc.row(), row);
                assert_eq!(loc.col(), col);
            }
        }
    }

    #[test]
    fn off_grid_coordinates_collapse_to_sentinel() {
        assert!(BoardLocation::new(-1, 0).missing());
        assert!(BoardLocation::new(0, 14).missing());
        assert!(BoardLocation::new(14, 7).missing());
        assert!(BoardLocation::new(5, 5).relative(10, 0).missing());
    }

    #[test]
    fn pretty_names_match_board_orientation() {
        assert_eq!(BoardLocation::new(13, 0).pretty(), "a1");
        assert_eq!(BoardLocation::new(0, 13).pretty(), "n14");
        assert_eq!(BoardLocation::new(13, 7).pretty(), "h1");
    }
}
