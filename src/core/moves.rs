//! Move representation.
//!
//! A `Move` carries everything needed to undo it without scanning history:
//! the captured piece, the promotion kind, the castling rook sub-move, and
//! the castling rights both before and after the move. En-passant fields
//! are reserved by the record but never produced by generation.

use super::piece::{BoardLocation, Piece};
use super::types::PieceType;

// ============================================================================
// SimpleMove
// ============================================================================

/// A bare displacement, used for the rook leg of a castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleMove {
    pub from: BoardLocation,
    pub to: BoardLocation,
}

impl SimpleMove {
    #[inline]
    pub fn new(from: BoardLocation, to: BoardLocation) -> SimpleMove {
        SimpleMove { from, to }
    }

    #[inline]
    pub fn present(self) -> bool {
        self.from.present() && self.to.present()
    }
}

// ============================================================================
// CastlingRights
// ============================================================================

/// Per-player castling availability (1 byte).
///
/// Bit layout:
/// - bit 7: presence
/// - bit 6: kingside
/// - bit 5: queenside
///
/// The missing value (all zero) on a `Move` means "this move does not
/// change the mover's rights".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// The absent marker.
    pub const MISSING: CastlingRights = CastlingRights(0);

    #[inline]
    pub fn new(kingside: bool, queenside: bool) -> CastlingRights {
        CastlingRights(0x80 | ((kingside as u8) << 6) | ((queenside as u8) << 5))
    }

    #[inline]
    pub fn present(self) -> bool {
        self.0 & 0x80 != 0
    }

    #[inline]
    pub fn kingside(self) -> bool {
        self.0 & 0x40 != 0
    }

    #[inline]
    pub fn queenside(self) -> bool {
        self.0 & 0x20 != 0
    }
}

impl Default for CastlingRights {
    fn default() -> CastlingRights {
        CastlingRights::MISSING
    }
}

impl std::fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CastlingRights(K={}, Q={})",
            self.kingside(),
            self.queenside()
        )
    }
}

// ============================================================================
// Move
// ============================================================================

/// A move with full undo information. Moves are value-equal over every
/// field, which is what pseudo-legal membership tests rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Move {
    pub from: BoardLocation,
    pub to: BoardLocation,

    /// Captured piece on `to`, or `Piece::NONE`.
    pub standard_capture: Piece,

    /// Promotion kind, or `PieceType::None`.
    pub promotion_piece_type: PieceType,

    /// Reserved en-passant fields (never produced by generation).
    pub en_passant_location: BoardLocation,
    pub en_passant_capture: Piece,

    /// Rook leg of a castling move.
    pub rook_move: SimpleMove,

    /// Mover's castling rights before and after the move; missing when the
    /// move leaves rights untouched.
    pub initial_castling_rights: CastlingRights,
    pub castling_rights: CastlingRights,
}

impl Move {
    /// Quiet move or plain capture.
    #[inline]
    pub fn standard(from: BoardLocation, to: BoardLocation, standard_capture: Piece) -> Move {
        Move {
            from,
            to,
            standard_capture,
            ..Move::default()
        }
    }

    /// Standard move that also updates the mover's castling rights (rook or
    /// king displacement).
    #[inline]
    pub fn with_rights(
        from: BoardLocation,
        to: BoardLocation,
        standard_capture: Piece,
        initial_castling_rights: CastlingRights,
        castling_rights: CastlingRights,
    ) -> Move {
        Move {
            from,
            to,
            standard_capture,
            initial_castling_rights,
            castling_rights,
            ..Move::default()
        }
    }

    /// Pawn move, optionally promoting.
    #[inline]
    pub fn pawn(
        from: BoardLocation,
        to: BoardLocation,
        standard_capture: Piece,
        promotion_piece_type: PieceType,
    ) -> Move {
        Move {
            from,
            to,
            standard_capture,
            promotion_piece_type,
            ..Move::default()
        }
    }

    /// Castling move: king displacement plus the rook leg.
    #[inline]
    pub fn castle(
        from: BoardLocation,
        to: BoardLocation,
        rook_move: SimpleMove,
        initial_castling_rights: CastlingRights,
        castling_rights: CastlingRights,
    ) -> Move {
        Move {
            from,
            to,
            rook_move,
            initial_castling_rights,
            castling_rights,
            ..Move::default()
        }
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.standard_capture.present() || self.en_passant_capture.present()
    }

    /// The captured piece, standard capture winning over en-passant.
    #[inline]
    pub fn capture_piece(self) -> Piece {
        if self.standard_capture.present() {
            self.standard_capture
        } else {
            self.en_passant_capture
        }
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        self.rook_move.present()
    }

    #[inline]
    pub fn manhattan_distance(self) -> i8 {
        (self.from.row() - self.to.row()).abs() + (self.from.col() - self.to.col()).abs()
    }

    /// Long-algebraic style notation, promotion kind appended.
    pub fn pretty(self) -> String {
        let mut s = format!("{}-{}", self.from.pretty(), self.to.pretty());
        if self.promotion_piece_type != PieceType::None {
            s.push('=');
            s.push(self.promotion_piece_type.letter());
        }
        s
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pretty())
    }
}

// ============================================================================
// MoveBuffer
// ============================================================================

/// Caller-supplied move sink for pseudo-legal generation. Overflow means
/// the caller under-sized the buffer, which is a programming error.
pub struct MoveBuffer<'a> {
    buffer: &'a mut [Move],
    pos: usize,
}

impl<'a> MoveBuffer<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [Move]) -> MoveBuffer<'a> {
        MoveBuffer { buffer, pos: 0 }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        if self.pos >= self.buffer.len() {
            panic!("move buffer overflow ({} moves)", self.buffer.len());
        }
        self.buffer[self.pos] = mv;
        self.pos += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}
