//! Core type definitions for the 4-player chess variant.
//!
//! These enums represent the fundamental game concepts:
//! piece kinds, player colors, teams, and game outcomes.

// ============================================================================
// Piece Kinds
// ============================================================================

/// The chess piece kinds. `None` marks an empty square so that an all-zero
/// packed piece byte reads as "no piece".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PieceType {
    #[default]
    None = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceType {
    /// Convert from the 3-bit field of a packed piece byte.
    #[inline]
    pub fn from_u8(value: u8) -> PieceType {
        match value {
            1 => PieceType::Pawn,
            2 => PieceType::Knight,
            3 => PieceType::Bishop,
            4 => PieceType::Rook,
            5 => PieceType::Queen,
            6 => PieceType::King,
            _ => PieceType::None,
        }
    }

    /// Piece-list ordering score. Kings sort first so the side's king is
    /// found immediately during generation; the rest follow the fixed
    /// move-ordering priority.
    #[inline]
    pub fn move_order(self) -> u8 {
        match self {
            PieceType::King => 0,
            PieceType::Pawn => 1,
            PieceType::Knight => 2,
            PieceType::Bishop => 3,
            PieceType::Rook => 4,
            PieceType::Queen => 5,
            PieceType::None => 7,
        }
    }

    /// Single-letter notation used by `Display` impls and FEN cells.
    pub fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
            PieceType::None => '.',
        }
    }
}

// ============================================================================
// Players and Teams
// ============================================================================

/// The four player colors, seated RED bottom, BLUE left, YELLOW top,
/// GREEN right. The numeric order is also the turn rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlayerColor {
    Red = 0,
    Blue = 1,
    Yellow = 2,
    Green = 3,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Yellow,
        PlayerColor::Green,
    ];

    #[inline]
    pub fn from_u8(value: u8) -> PlayerColor {
        match value & 3 {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Yellow,
            _ => PlayerColor::Green,
        }
    }

    /// The team this color plays for.
    #[inline]
    pub fn team(self) -> Team {
        match self {
            PlayerColor::Red | PlayerColor::Yellow => Team::RedYellow,
            PlayerColor::Blue | PlayerColor::Green => Team::BlueGreen,
        }
    }

    /// Next color in the RED -> BLUE -> YELLOW -> GREEN rotation.
    #[inline]
    pub fn next(self) -> PlayerColor {
        PlayerColor::from_u8(self as u8 + 1)
    }

    /// Previous color in the turn rotation.
    #[inline]
    pub fn previous(self) -> PlayerColor {
        PlayerColor::from_u8(self as u8 + 3)
    }

    /// Teammate sitting across the board.
    #[inline]
    pub fn partner(self) -> PlayerColor {
        PlayerColor::from_u8(self as u8 + 2)
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "Red",
            PlayerColor::Blue => "Blue",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Green => "Green",
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The two opposing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Team {
    RedYellow = 0,
    BlueGreen = 1,
}

impl Team {
    /// Get the opposing team.
    #[inline]
    pub fn other(self) -> Team {
        match self {
            Team::RedYellow => Team::BlueGreen,
            Team::BlueGreen => Team::RedYellow,
        }
    }
}

/// A player, identified by color. Kept distinct from `PlayerColor` so APIs
/// taking "whose move" read unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player(PlayerColor);

impl Player {
    #[inline]
    pub fn new(color: PlayerColor) -> Player {
        Player(color)
    }

    #[inline]
    pub fn color(self) -> PlayerColor {
        self.0
    }

    #[inline]
    pub fn team(self) -> Team {
        self.0.team()
    }

    #[inline]
    pub fn next(self) -> Player {
        Player(self.0.next())
    }

    #[inline]
    pub fn previous(self) -> Player {
        Player(self.0.previous())
    }

    #[inline]
    pub fn partner(self) -> Player {
        Player(self.0.partner())
    }
}

impl From<PlayerColor> for Player {
    fn from(color: PlayerColor) -> Player {
        Player(color)
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

// ============================================================================
// Castling
// ============================================================================

/// The two castling sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CastlingType {
    Kingside = 0,
    Queenside = 1,
}

// ============================================================================
// Game Outcomes
// ============================================================================

/// Result of a game from the board's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GameResult {
    InProgress = 0,
    WinRedYellow = 1,
    WinBlueGreen = 2,
    Stalemate = 3,
}

impl GameResult {
    /// The winning result for the team opposing `team`.
    #[inline]
    pub fn win_for_other(team: Team) -> GameResult {
        match team {
            Team::RedYellow => GameResult::WinBlueGreen,
            Team::BlueGreen => GameResult::WinRedYellow,
        }
    }
}
