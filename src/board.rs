use std::fmt;

use tracing::debug;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::Error;
use crate::masks::checkmask;
use crate::movegen::{generate_legal_moves, MoveGenError, MoveList, MAX_MOVES};
use crate::piece::PieceType;
use crate::position::Position;
use crate::r#move::{Move, NotationError, UciMove};
use crate::rights::BoardRights;

/// A full game state: placement, rights and the two move counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    position: Position,
    rights: BoardRights,
    halfmove_clock: u16,
    fullmove_number: u16,
}

impl Board {
    pub fn new(position: Position, rights: BoardRights) -> Self {
        Self::from_parts(position, rights, 0, 1)
    }

    pub fn from_parts(
        position: Position,
        rights: BoardRights,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Self {
        Board {
            position,
            rights,
            halfmove_clock,
            fullmove_number,
        }
    }

    pub fn standard() -> Self {
        Self::new(Position::standard(), BoardRights::default())
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn rights(&self) -> &BoardRights {
        &self.rights
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.rights.active
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn is_check(&self) -> bool {
        checkmask(self.turn(), &self.position) != Bitboard::FULL
    }

    pub fn legal_moves(&self) -> Result<MoveList, MoveGenError> {
        let mut moves = MoveList::with_capacity(MAX_MOVES);
        generate_legal_moves(&self.rights, &self.position, &mut moves)?;
        Ok(moves)
    }

    /// The board after the side to move plays `mv`, which must be one of
    /// [`Board::legal_moves`].
    pub fn play(&self, mv: &Move) -> Board {
        let us = self.turn();

        let halfmove_clock = if mv.piece() == PieceType::Pawn || mv.is_capture() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        let fullmove_number = match us {
            Color::White => self.fullmove_number,
            Color::Black => self.fullmove_number.saturating_add(1),
        };

        Board {
            position: self.position.make_move(us, mv),
            rights: self.rights.after_move(mv),
            halfmove_clock,
            fullmove_number,
        }
    }

    /// Resolve coordinate notation against the legal moves of this board.
    pub fn parse_move(&self, text: &str) -> Result<Move, Error> {
        let uci: UciMove = text.parse()?;
        let moves = self.legal_moves()?;

        moves.find(&uci).ok_or_else(|| {
            debug!(text, fen = %self.to_fen(), "rejected illegal move");
            Error::Notation(NotationError::IllegalMove(text.to_string()))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Board(turn: {}, fen: {})\n{}",
            self.turn(),
            self.to_fen(),
            self.position
        )
    }
}
