use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::square::Square;

/// A set of squares, one bit per square.
///
/// Bit 0 is a8, bit 7 is h8, bit 56 is a1 and bit 63 is h1, so moving one
/// row towards rank 1 adds 8 to the index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    /// All bits zero.
    #[inline]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Single bit set at `square`.
    #[inline]
    pub const fn single(square: Square) -> Self {
        Bitboard(1u64 << square.index())
    }

    /// All squares of board row `row` (row 0 is rank 8).
    #[inline]
    pub const fn row(row: u8) -> Self {
        debug_assert!(row < 8);
        Bitboard(0xFFu64 << (row as u32 * 8))
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn get(self, square: Square) -> bool {
        (self.0 >> square.index()) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, square: Square) {
        self.0 |= 1u64 << square.index();
    }

    #[inline]
    pub fn clear(&mut self, square: Square) {
        self.0 &= !(1u64 << square.index());
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonzero(self) -> bool {
        self.0 != 0
    }

    /// True if `self` and `other` share at least one square.
    #[inline]
    pub const fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    /// Population count.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Square of the lowest set bit, or `None` if empty.
    #[inline]
    pub const fn lowest_square(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index(self.0.trailing_zeros() as u8))
        }
    }

    /// Square of the lowest set bit. The board must not be empty.
    #[inline]
    pub const fn lowest_square_unchecked(self) -> Square {
        debug_assert!(self.0 != 0);
        Square::from_index(self.0.trailing_zeros() as u8)
    }

    /// Shift towards rank 8 by `rows` rows. Bits leaving the board are lost.
    #[inline]
    pub const fn shift_up(self, rows: u32) -> Self {
        Bitboard(self.0 >> (rows * 8))
    }

    /// Shift towards rank 1 by `rows` rows. Bits leaving the board are lost.
    #[inline]
    pub const fn shift_down(self, rows: u32) -> Self {
        Bitboard(self.0 << (rows * 8))
    }

    /// Iterate over the squares of set bits, lowest index first.
    #[inline]
    pub fn iter_ones(self) -> BitIterator {
        BitIterator { bits: self.0 }
    }

    /// Iterate over the set bits as single-square bitboards.
    #[inline]
    pub fn iter_singles(self) -> SingleIterator {
        SingleIterator { bits: self.0 }
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitIterator;
    fn into_iter(self) -> BitIterator {
        self.iter_ones()
    }
}

/// Iterator over set-bit squares in a `Bitboard`.
pub struct BitIterator {
    bits: u64,
}

impl Iterator for BitIterator {
    type Item = Square;
    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as u8;
        // Clear lowest set bit
        self.bits &= self.bits - 1;
        Some(Square::from_index(index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitIterator {}

/// Iterator over set bits, each yielded as its own single-square `Bitboard`.
pub struct SingleIterator {
    bits: u64,
}

impl Iterator for SingleIterator {
    type Item = Bitboard;
    #[inline]
    fn next(&mut self) -> Option<Bitboard> {
        if self.bits == 0 {
            return None;
        }
        let lowest = self.bits & self.bits.wrapping_neg();
        self.bits ^= lowest;
        Some(Bitboard(lowest))
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for file in 0..8u8 {
                let c = if self.get(Square::from_file_row(file, row)) {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}
