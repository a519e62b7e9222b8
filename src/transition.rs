use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::PieceType;
use crate::position::Position;
use crate::r#move::{Move, MoveKind};

impl Position {
    #[inline]
    fn toggle(&mut self, color: Color, piece: PieceType, squares: Bitboard) {
        self.pieces_mut(color)[piece.index()] ^= squares;
    }

    /// Remove whatever `color` has on `square`.
    #[inline]
    fn capture(&mut self, color: Color, square: Bitboard) {
        for bb in self.pieces_mut(color).iter_mut() {
            *bb &= !square;
        }
    }

    /// The position after `color` plays `mv`. The move must be legal here;
    /// `self` is left untouched.
    #[hotpath::measure]
    pub fn make_move(&self, color: Color, mv: &Move) -> Position {
        let mut next = *self;
        let them = color.opposite();
        let from = mv.from();
        let to = mv.to();

        match mv.kind() {
            MoveKind::Quiet(piece) => next.toggle(color, piece, from | to),
            MoveKind::Capture(piece) => {
                next.capture(them, to);
                next.toggle(color, piece, from | to);
            }
            MoveKind::DoublePawnPush => next.toggle(color, PieceType::Pawn, from | to),
            MoveKind::Promotion(piece) => {
                next.toggle(color, PieceType::Pawn, from);
                next.toggle(color, piece, to);
            }
            MoveKind::PromotionCapture(piece) => {
                next.capture(them, to);
                next.toggle(color, PieceType::Pawn, from);
                next.toggle(color, piece, to);
            }
            MoveKind::EnPassant => {
                next.toggle(color, PieceType::Pawn, from | to);
                next.toggle(them, PieceType::Pawn, color.push_back(to));
            }
            MoveKind::Castle { king, rook } => {
                next.toggle(color, PieceType::King, king);
                next.toggle(color, PieceType::Rook, rook);
            }
        }

        next.refresh_occupancy();
        next
    }
}
