use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::bitboard::Bitboard;
use crate::piece::PieceType;
use crate::square::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move text: {0:?}")]
    InvalidMove(String),

    #[error("invalid promotion piece: {0:?}")]
    InvalidPromotion(char),

    #[error("move {0} is not legal in this position")]
    IllegalMove(String),
}

/// What a move does, beyond going from one square to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Move of the given piece to an empty square.
    Quiet(PieceType),
    /// The given piece captures on the destination square.
    Capture(PieceType),
    DoublePawnPush,
    /// Pawn push onto the back rank, becoming the given piece.
    Promotion(PieceType),
    /// Pawn capture onto the back rank, becoming the given piece.
    PromotionCapture(PieceType),
    EnPassant,
    /// Castling; `king` and `rook` are XOR masks of each piece's from and to squares.
    Castle { king: Bitboard, rook: Bitboard },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: Bitboard,
    to: Bitboard,
    kind: MoveKind,
}

impl Move {
    #[inline]
    pub fn new(from: Bitboard, to: Bitboard, kind: MoveKind) -> Self {
        debug_assert!(from.count() == 1 && to.count() == 1);
        Move { from, to, kind }
    }

    #[inline]
    pub fn from(&self) -> Bitboard {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Bitboard {
        self.to
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub fn from_square(&self) -> Square {
        self.from.lowest_square_unchecked()
    }

    #[inline]
    pub fn to_square(&self) -> Square {
        self.to.lowest_square_unchecked()
    }

    /// The piece type that moves. Promotions and castling report the pawn
    /// and the king.
    pub fn piece(&self) -> PieceType {
        match self.kind {
            MoveKind::Quiet(piece) | MoveKind::Capture(piece) => piece,
            MoveKind::DoublePawnPush
            | MoveKind::Promotion(_)
            | MoveKind::PromotionCapture(_)
            | MoveKind::EnPassant => PieceType::Pawn,
            MoveKind::Castle { .. } => PieceType::King,
        }
    }

    pub fn is_capture(&self) -> bool {
        match self.kind {
            MoveKind::Capture(_) | MoveKind::PromotionCapture(_) | MoveKind::EnPassant => true,
            MoveKind::Quiet(_)
            | MoveKind::DoublePawnPush
            | MoveKind::Promotion(_)
            | MoveKind::Castle { .. } => false,
        }
    }

    pub fn promotion(&self) -> Option<PieceType> {
        match self.kind {
            MoveKind::Promotion(piece) | MoveKind::PromotionCapture(piece) => Some(piece),
            MoveKind::Quiet(_)
            | MoveKind::Capture(_)
            | MoveKind::DoublePawnPush
            | MoveKind::EnPassant
            | MoveKind::Castle { .. } => None,
        }
    }

    pub fn uci(&self) -> UciMove {
        UciMove {
            from: self.from_square(),
            to: self.to_square(),
            promotion: self.promotion(),
        }
    }

    /// `<from><to>[promotion]`, e.g. `e2e4`, `e7e8q`, `e1g1`.
    pub fn to_uci(&self) -> String {
        self.uci().to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uci().fmt(f)
    }
}

/// A move as written in coordinate notation, before it is matched against
/// a position's legal moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl UciMove {
    pub fn matches(&self, mv: &Move) -> bool {
        mv.from_square() == self.from
            && mv.to_square() == self.to
            && mv.promotion() == self.promotion
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(c) = self.promotion.and_then(PieceType::promotion_char) {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for UciMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(NotationError::InvalidMove(s.to_string()));
        }

        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            Some(c) => {
                let piece =
                    PieceType::from_promotion_char(c).ok_or(NotationError::InvalidPromotion(c))?;
                Some(piece)
            }
            None => None,
        };

        Ok(UciMove {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: Square, to: Square, kind: MoveKind) -> Move {
        Move::new(from.bitboard(), to.bitboard(), kind)
    }

    #[test]
    fn test_to_uci() {
        let push = mv(Square::E2, Square::E4, MoveKind::DoublePawnPush);
        assert_eq!(push.to_uci(), "e2e4");

        let promotion = mv(Square::E7, Square::E8, MoveKind::Promotion(PieceType::Queen));
        assert_eq!(promotion.to_uci(), "e7e8q");

        let kind = MoveKind::PromotionCapture(PieceType::Knight);
        assert_eq!(mv(Square::B2, Square::A1, kind).to_string(), "b2a1n");

        let castle = MoveKind::Castle {
            king: Square::E1.bitboard() | Square::G1.bitboard(),
            rook: Square::H1.bitboard() | Square::F1.bitboard(),
        };
        assert_eq!(mv(Square::E1, Square::G1, castle).to_uci(), "e1g1");
    }

    #[test]
    fn test_piece_and_flags() {
        let capture = mv(Square::D4, Square::E5, MoveKind::Capture(PieceType::Bishop));
        assert_eq!(capture.piece(), PieceType::Bishop);
        assert!(capture.is_capture());
        assert_eq!(capture.promotion(), None);

        let ep = mv(Square::E5, Square::D6, MoveKind::EnPassant);
        assert_eq!(ep.piece(), PieceType::Pawn);
        assert!(ep.is_capture());

        let promo = mv(Square::A7, Square::A8, MoveKind::Promotion(PieceType::Rook));
        assert_eq!(promo.piece(), PieceType::Pawn);
        assert!(!promo.is_capture());
        assert_eq!(promo.promotion(), Some(PieceType::Rook));
    }

    #[test]
    fn test_parse_uci() {
        let parsed: UciMove = "e7e8q".parse().unwrap();
        assert_eq!(parsed.from, Square::E7);
        assert_eq!(parsed.to, Square::E8);
        assert_eq!(parsed.promotion, Some(PieceType::Queen));
        assert_eq!(parsed.to_string(), "e7e8q");

        let quiet: UciMove = "g1f3".parse().unwrap();
        assert_eq!(quiet.promotion, None);
        let knight = MoveKind::Quiet(PieceType::Knight);
        assert!(quiet.matches(&mv(Square::G1, Square::F3, knight)));
        assert!(!quiet.matches(&mv(Square::G1, Square::H3, knight)));
    }

    #[test]
    fn test_parse_uci_rejects_annotations() {
        assert_eq!(
            "e2e4+".parse::<UciMove>(),
            Err(NotationError::InvalidPromotion('+'))
        );
        assert_eq!(
            "e7e8k".parse::<UciMove>(),
            Err(NotationError::InvalidPromotion('k'))
        );
        assert!(matches!(
            "e2-e4".parse::<UciMove>(),
            Err(NotationError::InvalidSquare(_))
        ));
        assert!(matches!(
            "e2".parse::<UciMove>(),
            Err(NotationError::InvalidMove(_))
        ));
        assert!(matches!(
            "e9e4".parse::<UciMove>(),
            Err(NotationError::InvalidSquare(_))
        ));
        assert!(matches!(
            "Nf3".parse::<UciMove>(),
            Err(NotationError::InvalidMove(_))
        ));
    }
}
