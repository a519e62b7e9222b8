use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::r#move::NotationError;

/// A board square, 0 (a8) through 63 (h1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        debug_assert!(index < 64);
        Square(index)
    }

    /// `file` 0 is the a-file, `row` 0 is rank 8.
    #[inline]
    pub const fn from_file_row(file: u8, row: u8) -> Self {
        debug_assert!(file < 8 && row < 8);
        Square(row * 8 + file)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Chess rank number, 1 through 8.
    #[inline]
    pub const fn rank(self) -> u8 {
        8 - self.row()
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::single(self)
    }

    /// The square `files` across and `rows` down from this one, if it is on the board.
    #[inline]
    pub const fn offset(self, files: i8, rows: i8) -> Option<Square> {
        let file = self.file() as i8 + files;
        let row = self.row() as i8 + rows;
        if file < 0 || file > 7 || row < 0 || row > 7 {
            None
        } else {
            Some(Square::from_file_row(file as u8, row as u8))
        }
    }
}

macro_rules! define_rank {
    ($rank:literal, $row:expr) => {
        paste::paste! {
            #[allow(dead_code)]
            impl Square {
                pub const [<A $rank>]: Square = Square::from_file_row(0, $row);
                pub const [<B $rank>]: Square = Square::from_file_row(1, $row);
                pub const [<C $rank>]: Square = Square::from_file_row(2, $row);
                pub const [<D $rank>]: Square = Square::from_file_row(3, $row);
                pub const [<E $rank>]: Square = Square::from_file_row(4, $row);
                pub const [<F $rank>]: Square = Square::from_file_row(5, $row);
                pub const [<G $rank>]: Square = Square::from_file_row(6, $row);
                pub const [<H $rank>]: Square = Square::from_file_row(7, $row);
            }
        }
    };
}

define_rank!(8, 0);
define_rank!(7, 1);
define_rank!(6, 2);
define_rank!(5, 3);
define_rank!(4, 4);
define_rank!(3, 5);
define_rank!(2, 6);
define_rank!(1, 7);

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        write!(f, "{}{}", file, self.rank())
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(NotationError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file > 7 || rank > 7 {
            return Err(NotationError::InvalidSquare(s.to_string()));
        }
        Ok(Square::from_file_row(file, 7 - rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        assert_eq!(Square::A8.index(), 0);
        assert_eq!(Square::H8.index(), 7);
        assert_eq!(Square::A1.index(), 56);
        assert_eq!(Square::H1.index(), 63);
        assert_eq!(Square::E4.file(), 4);
        assert_eq!(Square::E4.row(), 4);
        assert_eq!(Square::E4.rank(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Square::A8.to_string(), "a8");
        assert_eq!(Square::H1.to_string(), "h1");
        assert_eq!(Square::from_index(36).to_string(), "e4");
    }

    #[test]
    fn test_parse() {
        assert_eq!("e4".parse::<Square>().ok(), Some(Square::E4));
        assert_eq!("a8".parse::<Square>().ok(), Some(Square::A8));
        assert_eq!("h1".parse::<Square>().ok(), Some(Square::H1));
    }

    #[test]
    fn test_parse_invalid() {
        for text in ["", "e", "e9", "i1", "E4", "e44", "4e"] {
            assert!(
                matches!(text.parse::<Square>(), Err(NotationError::InvalidSquare(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_roundtrip_all() {
        for index in 0..64u8 {
            let sq = Square::from_index(index);
            assert_eq!(sq.to_string().parse::<Square>().ok(), Some(sq));
        }
    }

    #[test]
    fn test_offset() {
        assert_eq!(Square::E4.offset(1, -1), Some(Square::F5));
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::H8.offset(0, -1), None);
        assert_eq!(Square::B1.offset(1, -2), Some(Square::C3));
    }
}
