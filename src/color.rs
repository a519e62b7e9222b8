use crate::bitboard::Bitboard;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' | 'W' => Some(Color::White),
            'b' | 'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// Row step of a pawn push: White moves towards row 0 (rank 8).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Move every bit of `bb` one row forward for this side.
    #[inline]
    pub const fn push(self, bb: Bitboard) -> Bitboard {
        match self {
            Color::White => bb.shift_up(1),
            Color::Black => bb.shift_down(1),
        }
    }

    /// Move every bit of `bb` one row backward for this side.
    #[inline]
    pub const fn push_back(self, bb: Bitboard) -> Bitboard {
        self.opposite().push(bb)
    }

    /// Row that pawns of this side start on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row on which pawns of this side promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color_str = match self {
            Color::White => "White",
            Color::Black => "Black",
        };
        write!(f, "{}", color_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    #[test]
    fn test_opposite() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(Color::from_char('w'), Some(Color::White));
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('x'), None);
        assert_eq!(Color::White.to_char(), 'w');
    }

    #[test]
    fn test_push_direction() {
        let e4 = Bitboard::single(Square::E4);
        assert_eq!(Color::White.push(e4), Bitboard::single(Square::E5));
        assert_eq!(Color::Black.push(e4), Bitboard::single(Square::E3));
        assert_eq!(Color::White.push_back(e4), Bitboard::single(Square::E3));
    }

    #[test]
    fn test_rows() {
        assert_eq!(Square::E2.row(), Color::White.pawn_row());
        assert_eq!(Square::E7.row(), Color::Black.pawn_row());
        assert_eq!(Square::E8.row(), Color::White.promotion_row());
        assert_eq!(Square::E1.row(), Color::Black.promotion_row());
    }
}
