use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::PieceType;
use crate::r#move::{Move, MoveKind};
use crate::square::Square;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// The four castling-availability flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KINGSIDE: Self = Self(1 << 0);
    pub const WHITE_QUEENSIDE: Self = Self(1 << 1);
    pub const BLACK_KINGSIDE: Self = Self(1 << 2);
    pub const BLACK_QUEENSIDE: Self = Self(1 << 3);

    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    #[inline]
    pub const fn flag(color: Color, side: CastleSide) -> Self {
        Self(1 << (color.index() * 2 + side.index()))
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side).0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// Fixed squares of one castling move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlePath {
    pub king_to: Square,
    pub rook_home: Square,
    /// XOR mask of the king's from and to squares.
    pub king: Bitboard,
    /// XOR mask of the rook's from and to squares.
    pub rook: Bitboard,
    /// Squares between king and rook; all must be empty.
    pub empty: Bitboard,
    /// Squares the king crosses or lands on; none may be attacked.
    pub safe: Bitboard,
}

const fn squares(list: &[Square]) -> Bitboard {
    let mut bits = 0u64;
    let mut i = 0;
    while i < list.len() {
        bits |= list[i].bitboard().0;
        i += 1;
    }
    Bitboard(bits)
}

/// Indexed `[color][side]`.
pub const CASTLE_PATHS: [[CastlePath; 2]; 2] = [
    [
        CastlePath {
            king_to: Square::G1,
            rook_home: Square::H1,
            king: squares(&[Square::E1, Square::G1]),
            rook: squares(&[Square::H1, Square::F1]),
            empty: squares(&[Square::F1, Square::G1]),
            safe: squares(&[Square::F1, Square::G1]),
        },
        CastlePath {
            king_to: Square::C1,
            rook_home: Square::A1,
            king: squares(&[Square::E1, Square::C1]),
            rook: squares(&[Square::A1, Square::D1]),
            empty: squares(&[Square::B1, Square::C1, Square::D1]),
            safe: squares(&[Square::C1, Square::D1]),
        },
    ],
    [
        CastlePath {
            king_to: Square::G8,
            rook_home: Square::H8,
            king: squares(&[Square::E8, Square::G8]),
            rook: squares(&[Square::H8, Square::F8]),
            empty: squares(&[Square::F8, Square::G8]),
            safe: squares(&[Square::F8, Square::G8]),
        },
        CastlePath {
            king_to: Square::C8,
            rook_home: Square::A8,
            king: squares(&[Square::E8, Square::C8]),
            rook: squares(&[Square::A8, Square::D8]),
            empty: squares(&[Square::B8, Square::C8, Square::D8]),
            safe: squares(&[Square::C8, Square::D8]),
        },
    ],
];

#[inline]
pub fn castle_path(color: Color, side: CastleSide) -> &'static CastlePath {
    &CASTLE_PATHS[color.index()][side.index()]
}

/// Side to move, en-passant target and castling availability for one ply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardRights {
    pub active: Color,
    pub en_passant: Option<Square>,
    pub castling: CastlingRights,
}

impl BoardRights {
    pub fn new(active: Color, en_passant: Option<Square>, castling: CastlingRights) -> Self {
        BoardRights {
            active,
            en_passant,
            castling,
        }
    }

    /// Rights for the ply after the active side plays `mv`.
    pub fn after_move(&self, mv: &Move) -> BoardRights {
        let us = self.active;
        let mut castling = self.castling;

        if mv.piece() == PieceType::King {
            castling.remove(CastlingRights::flag(us, CastleSide::Kingside));
            castling.remove(CastlingRights::flag(us, CastleSide::Queenside));
        }

        // A rook leaving its home square, or anything landing on it.
        let touched = mv.from() | mv.to();
        for color in Color::ALL {
            for side in CastleSide::ALL {
                if touched.get(castle_path(color, side).rook_home) {
                    castling.remove(CastlingRights::flag(color, side));
                }
            }
        }

        let en_passant = match mv.kind() {
            MoveKind::DoublePawnPush => Some(Square::from_index(
                ((mv.from_square().index() + mv.to_square().index()) / 2) as u8,
            )),
            _ => None,
        };

        BoardRights {
            active: us.opposite(),
            en_passant,
            castling,
        }
    }
}

impl Default for BoardRights {
    fn default() -> Self {
        BoardRights::new(Color::White, None, CastlingRights::ALL)
    }
}
