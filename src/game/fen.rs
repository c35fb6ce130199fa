//! FEN-like start-string parsing.
//!
//! The format is dash-separated: player to move, four per-player flags
//! (unused), kingside castling availability, queenside availability, two
//! more legacy sections, then the 14-row piece placement. Rows are
//! comma-separated cells: `x` for a cut-out square, a digit run for that
//! many empty squares, or a two-character color+kind pair such as `rK`.

use thiserror::Error;

use crate::core::{
    BoardLocation, CastlingRights, Piece, PieceType, PlacedPiece, Player, PlayerColor, BOARD_SIZE,
};

use super::board::Board;

/// Errors for malformed start strings. All recoverable; nothing here
/// aborts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 7 or 8 dash-separated sections, found {0}")]
    SectionCount(usize),
    #[error("unrecognized player {0:?}")]
    Player(String),
    #[error("malformed castling availability {0:?}")]
    Castling(String),
    #[error("expected 14 piece rows, found {0}")]
    RowCount(usize),
    #[error("unrecognized cell {cell:?} in row {row}")]
    Cell { row: usize, cell: String },
    #[error("row {row} spans {cols} columns")]
    RowWidth { row: usize, cols: usize },
}

fn parse_player(section: &str) -> Result<Player, FenError> {
    let color = match section {
        "R" => PlayerColor::Red,
        "B" => PlayerColor::Blue,
        "Y" => PlayerColor::Yellow,
        "G" => PlayerColor::Green,
        other => return Err(FenError::Player(other.to_string())),
    };
    Ok(Player::new(color))
}

fn parse_availability(section: &str) -> Result<[bool; 4], FenError> {
    let parts: Vec<&str> = section.split(',').collect();
    if parts.len() != 4 {
        return Err(FenError::Castling(section.to_string()));
    }
    let mut availability = [false; 4];
    for (slot, part) in availability.iter_mut().zip(&parts) {
        *slot = *part == "1";
    }
    Ok(availability)
}

fn parse_piece_cell(cell: &str) -> Option<Piece> {
    let mut chars = cell.chars();
    let color = match chars.next()? {
        'r' => PlayerColor::Red,
        'b' => PlayerColor::Blue,
        'y' => PlayerColor::Yellow,
        'g' => PlayerColor::Green,
        _ => return None,
    };
    let piece_type = match chars.next()? {
        'P' => PieceType::Pawn,
        'N' => PieceType::Knight,
        'B' => PieceType::Bishop,
        'R' => PieceType::Rook,
        'Q' => PieceType::Queen,
        'K' => PieceType::King,
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(Piece::new(color, piece_type))
}

impl Board {
    /// Parse a board from its FEN-like start string. The en-passant
    /// section, when present, is accepted and ignored.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let sections: Vec<&str> = fen.split('-').collect();
        if sections.len() < 7 || sections.len() > 8 {
            return Err(FenError::SectionCount(sections.len()));
        }

        let turn = parse_player(sections[0])?;
        let kingside = parse_availability(sections[2])?;
        let queenside = parse_availability(sections[3])?;
        let placement = sections[sections.len() - 1];

        let mut castling_rights = [CastlingRights::new(false, false); 4];
        for color in PlayerColor::ALL {
            castling_rights[color as usize] =
                CastlingRights::new(kingside[color as usize], queenside[color as usize]);
        }

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != BOARD_SIZE {
            return Err(FenError::RowCount(rows.len()));
        }

        let mut placed = Vec::with_capacity(64);
        for (row, row_str) in rows.iter().enumerate() {
            let mut col = 0usize;
            for cell in row_str.split(',') {
                if cell.is_empty() {
                    return Err(FenError::Cell {
                        row,
                        cell: cell.to_string(),
                    });
                }
                if cell == "x" {
                    col += 1;
                } else if let Some(piece) = parse_piece_cell(cell) {
                    placed.push(PlacedPiece::new(
                        BoardLocation::new(row as i8, col as i8),
                        piece,
                    ));
                    col += 1;
                } else if let Ok(empty) = cell.parse::<usize>() {
                    if empty == 0 {
                        return Err(FenError::Cell {
                            row,
                            cell: cell.to_string(),
                        });
                    }
                    col += empty;
                } else {
                    return Err(FenError::Cell {
                        row,
                        cell: cell.to_string(),
                    });
                }
            }
            if col != BOARD_SIZE {
                return Err(FenError::RowWidth { row, cols: col });
            }
        }

        Ok(Board::new(turn, &placed, castling_rights))
    }
}
