use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks_bb, rook_attacks};
use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::PieceType;
use crate::square::Square;

/// Piece placement: one bitboard per color and piece type plus the
/// occupancy aggregates derived from them.
///
/// A `Position` is a value. Nothing mutates one in place once built;
/// [`Position::make_move`](crate::position::Position::make_move) returns a
/// fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pieces: [[Bitboard; 6]; 2],
    colors: [Bitboard; 2],
    occupied: Bitboard,
}

const STANDARD_PIECES: [[Bitboard; 6]; 2] = [
    [
        Bitboard(0x1000_0000_0000_0000),
        Bitboard(0x0800_0000_0000_0000),
        Bitboard(0x8100_0000_0000_0000),
        Bitboard(0x2400_0000_0000_0000),
        Bitboard(0x4200_0000_0000_0000),
        Bitboard(0x00FF_0000_0000_0000),
    ],
    [
        Bitboard(0x0000_0000_0000_0010),
        Bitboard(0x0000_0000_0000_0008),
        Bitboard(0x0000_0000_0000_0081),
        Bitboard(0x0000_0000_0000_0024),
        Bitboard(0x0000_0000_0000_0042),
        Bitboard(0x0000_0000_0000_FF00),
    ],
];

impl Position {
    /// A board with no pieces. Not a legal position on its own; add kings
    /// with [`Position::with_piece`] before generating moves.
    pub const fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
        }
    }

    /// The standard chess starting position.
    pub fn standard() -> Self {
        Self::from_pieces(STANDARD_PIECES)
    }

    /// Build from the twelve piece bitboards, indexed `[color][piece]`.
    pub fn from_pieces(pieces: [[Bitboard; 6]; 2]) -> Self {
        let mut position = Position {
            pieces,
            colors: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
        };
        position.refresh_occupancy();
        position
    }

    #[inline]
    pub(crate) fn refresh_occupancy(&mut self) {
        for color in Color::ALL {
            self.colors[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        }
        self.occupied = self.colors[0] | self.colors[1];
    }

    #[inline]
    pub(crate) fn pieces_mut(&mut self, color: Color) -> &mut [Bitboard; 6] {
        &mut self.pieces[color.index()]
    }

    #[inline]
    pub fn pieces(&self, color: Color, piece: PieceType) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied
    }

    /// Bishops and queens of `color`.
    #[inline]
    pub fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceType::Bishop) | self.pieces(color, PieceType::Queen)
    }

    /// Rooks and queens of `color`.
    #[inline]
    pub fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceType::Rook) | self.pieces(color, PieceType::Queen)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let king = self.pieces(color, PieceType::King);
        debug_assert!(king.count() == 1, "{} must have exactly one king", color);
        king.lowest_square_unchecked()
    }

    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceType)> {
        let color = Color::ALL
            .into_iter()
            .find(|&c| self.occupied_by(c).get(square))?;
        self.piece_type_at(color, square.bitboard())
            .map(|piece| (color, piece))
    }

    /// The piece type of `color` on the single square in `target`.
    #[inline]
    pub fn piece_type_at(&self, color: Color, target: Bitboard) -> Option<PieceType> {
        PieceType::ALL
            .into_iter()
            .find(|&piece| self.pieces(color, piece).intersects(target))
    }

    /// A copy of this position with `square` holding `color`'s `piece`.
    /// Whatever stood on the square before is removed.
    pub fn with_piece(&self, color: Color, piece: PieceType, square: Square) -> Self {
        let mut next = self.without_piece(square);
        next.pieces[color.index()][piece.index()] |= square.bitboard();
        next.refresh_occupancy();
        next
    }

    /// A copy of this position with `square` emptied.
    pub fn without_piece(&self, square: Square) -> Self {
        let mut next = *self;
        let keep = !square.bitboard();
        for color in Color::ALL {
            for bb in next.pieces_mut(color).iter_mut() {
                *bb &= keep;
            }
        }
        next.refresh_occupancy();
        next
    }

    /// Every square attacked by `color`, with sliders blocked by `occupancy`.
    ///
    /// Passing the occupancy without the defending king makes the squares
    /// behind the king on a checking ray count as attacked.
    pub fn attacked_by(&self, color: Color, occupancy: Bitboard) -> Bitboard {
        let mut attacked = pawn_attacks_bb(color, self.pieces(color, PieceType::Pawn));

        for sq in self.pieces(color, PieceType::Knight) {
            attacked |= knight_attacks(sq);
        }
        for sq in self.diagonal_sliders(color) {
            attacked |= bishop_attacks(sq, occupancy);
        }
        for sq in self.orthogonal_sliders(color) {
            attacked |= rook_attacks(sq, occupancy);
        }
        for sq in self.pieces(color, PieceType::King) {
            attacked |= king_attacks(sq);
        }

        attacked
    }

    /// True if the twelve bitboards are disjoint, the aggregates match them
    /// and each side has exactly one king.
    pub fn is_valid(&self) -> bool {
        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut side = Bitboard::EMPTY;
            for piece in PieceType::ALL {
                let bb = self.pieces(color, piece);
                if seen.intersects(bb) {
                    return false;
                }
                seen |= bb;
                side |= bb;
            }
            if side != self.occupied_by(color) || self.pieces(color, PieceType::King).count() != 1 {
                return false;
            }
        }
        seen == self.occupied
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{}|", 8 - row)?;

            for file in 0..8u8 {
                let c = match self.piece_at(Square::from_file_row(file, row)) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };

                write!(f, "{}|", c)?;
            }

            writeln!(f)?;
        }

        writeln!(f, "  a b c d e f g h")
    }
}
