//! Forsyth–Edwards Notation for [`Position`] and [`Board`].

use thiserror::Error;
use tracing::debug;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::color::Color;
use crate::piece::PieceType;
use crate::position::Position;
use crate::rights::{castle_path, BoardRights, CastleSide, CastlingRights};
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid piece letter {0:?}")]
    InvalidPiece(char),

    #[error("rank {rank} covers {files} files, expected 8")]
    InvalidRankWidth { rank: u8, files: usize },

    #[error("placement has {0} ranks, expected 8")]
    InvalidRankCount(usize),

    #[error("missing FEN field: {0}")]
    MissingField(&'static str),

    #[error("invalid active color {0:?}")]
    InvalidActiveColor(String),

    #[error("invalid castling flag {0:?}")]
    InvalidCastling(char),

    #[error("invalid en passant square {0:?}")]
    InvalidEnPassant(String),

    #[error("invalid move clock {0:?}")]
    InvalidClock(String),

    #[error("{color} has {count} kings, expected 1")]
    InvalidKingCount { color: Color, count: u32 },
}

fn parse_placement(placement: &str) -> Result<Position, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidRankCount(ranks.len()));
    }

    let mut pieces = [[Bitboard::EMPTY; 6]; 2];

    for (row, rank) in ranks.iter().enumerate() {
        let mut files = 0usize;

        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                files += skip as usize;
                continue;
            }

            let (color, piece) =
                PieceType::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
            if files < 8 {
                let square = Square::from_file_row(files as u8, row as u8);
                pieces[color.index()][piece.index()].set(square);
            }
            files += 1;
        }

        if files != 8 {
            return Err(FenError::InvalidRankWidth {
                rank: 8 - row as u8,
                files,
            });
        }
    }

    Ok(Position::from_pieces(pieces))
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }

    for c in field.chars() {
        let flag = match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => return Err(FenError::InvalidCastling(c)),
        };
        rights.insert(flag);
    }

    Ok(rights)
}

/// Each castling flag needs its king and rook on their home squares.
fn validate_castling(position: &Position, castling: CastlingRights) -> Result<(), FenError> {
    for color in Color::ALL {
        for side in CastleSide::ALL {
            if !castling.has(color, side) {
                continue;
            }

            let path = castle_path(color, side);
            let king_home = path.king ^ path.king_to.bitboard();
            let kings = position.pieces(color, PieceType::King);
            let rooks = position.pieces(color, PieceType::Rook);
            if !kings.intersects(king_home) || !rooks.get(path.rook_home) {
                return Err(FenError::InvalidCastling(castling_char(color, side)));
            }
        }
    }
    Ok(())
}

fn castling_char(color: Color, side: CastleSide) -> char {
    match side {
        CastleSide::Kingside => PieceType::King.to_fen_char(color),
        CastleSide::Queenside => PieceType::Queen.to_fen_char(color),
    }
}

fn parse_en_passant(field: &str, active: Color) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }

    let square: Square = field
        .parse()
        .map_err(|_| FenError::InvalidEnPassant(field.to_string()))?;

    // The target sits behind a pawn the opponent just pushed two rows.
    let expected_row = match active {
        Color::White => 2,
        Color::Black => 5,
    };
    if square.row() != expected_row {
        return Err(FenError::InvalidEnPassant(field.to_string()));
    }

    Ok(Some(square))
}

fn parse_clock(field: Option<&str>, default: u16) -> Result<u16, FenError> {
    match field {
        Some(text) => text
            .parse()
            .map_err(|_| FenError::InvalidClock(text.to_string())),
        None => Ok(default),
    }
}

fn parse_board(fen: &str) -> Result<Board, FenError> {
    let mut fields = fen.split_whitespace();

    let placement = fields.next().ok_or(FenError::MissingField("placement"))?;
    let position = parse_placement(placement)?;

    for color in Color::ALL {
        let count = position.pieces(color, PieceType::King).count();
        if count != 1 {
            return Err(FenError::InvalidKingCount { color, count });
        }
    }

    let active_field = fields.next().ok_or(FenError::MissingField("active color"))?;
    let mut active_chars = active_field.chars();
    let first = active_chars.next().and_then(Color::from_char);
    let active = match (first, active_chars.next()) {
        (Some(color), None) => color,
        _ => return Err(FenError::InvalidActiveColor(active_field.to_string())),
    };

    let castling = parse_castling(fields.next().ok_or(FenError::MissingField("castling"))?)?;
    validate_castling(&position, castling)?;
    let en_passant = parse_en_passant(
        fields.next().ok_or(FenError::MissingField("en passant"))?,
        active,
    )?;

    let halfmove_clock = parse_clock(fields.next(), 0)?;
    let fullmove_number = parse_clock(fields.next(), 1)?;

    Ok(Board::from_parts(
        position,
        BoardRights::new(active, en_passant, castling),
        halfmove_clock,
        fullmove_number,
    ))
}

impl Position {
    /// Parse the piece-placement field of a FEN string.
    ///
    /// King counts are not checked here; see [`Board::from_fen`].
    pub fn from_fen_placement(placement: &str) -> Result<Position, FenError> {
        parse_placement(placement)
            .inspect_err(|err| debug!(placement, %err, "rejected FEN placement"))
    }

    pub fn to_fen_placement(&self) -> String {
        let mut out = String::with_capacity(64);

        for row in 0..8u8 {
            if row > 0 {
                out.push('/');
            }

            let mut empty = 0u8;
            for file in 0..8u8 {
                match self.piece_at(Square::from_file_row(file, row)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
        }

        out
    }
}

impl Board {
    /// Parse a full FEN record. The two clock fields may be omitted and
    /// default to `0` and `1`.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        parse_board(fen).inspect_err(|err| debug!(fen, %err, "rejected FEN"))
    }

    pub fn to_fen(&self) -> String {
        let rights = self.rights();

        let mut castling = String::new();
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if rights.castling.has(color, side) {
                    castling.push(castling_char(color, side));
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = rights
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            self.position().to_fen_placement(),
            rights.active.to_char(),
            castling,
            en_passant,
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}
