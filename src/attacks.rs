//! Attack lookups for every piece type.
//!
//! Leaper tables are built at compile time from (file, row) deltas. Slider
//! attacks use hyperbola quintessence over per-square line masks, which only
//! needs each line's bits to be ordered along the line; that holds for ranks,
//! files and both diagonals in the a8 = 0 layout.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::square::Square;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

// Rows decrease towards rank 8, so White captures with a row delta of -1.
const WHITE_PAWN_DELTAS: [(i8, i8); 2] = [(-1, -1), (1, -1)];
const BLACK_PAWN_DELTAS: [(i8, i8); 2] = [(-1, 1), (1, 1)];

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0;
    while index < 64 {
        let square = Square::from_index(index as u8);
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (files, rows) = deltas[i];
            if let Some(target) = square.offset(files, rows) {
                bits |= 1u64 << target.index();
            }
            i += 1;
        }
        table[index] = Bitboard(bits);
        index += 1;
    }
    table
}

/// For each square, every square on the line through it in direction
/// `(files, rows)`, excluding the square itself.
const fn line_table(files: i8, rows: i8) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0;
    while index < 64 {
        let square = Square::from_index(index as u8);
        let mut bits = 0u64;

        let mut current = square;
        while let Some(next) = current.offset(files, rows) {
            bits |= 1u64 << next.index();
            current = next;
        }
        current = square;
        while let Some(next) = current.offset(-files, -rows) {
            bits |= 1u64 << next.index();
            current = next;
        }

        table[index] = Bitboard(bits);
        index += 1;
    }
    table
}

const fn between_table() -> [[Bitboard; 64]; 64] {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut index = 0;
    while index < 64 {
        let from = Square::from_index(index as u8);
        let mut d = 0;
        while d < KING_DELTAS.len() {
            let (files, rows) = KING_DELTAS[d];
            let mut ray = 0u64;
            let mut current = from;
            while let Some(next) = current.offset(files, rows) {
                table[index][next.index()] = Bitboard(ray);
                ray |= 1u64 << next.index();
                current = next;
            }
            d += 1;
        }
        index += 1;
    }
    table
}

pub const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
pub const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
pub const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&WHITE_PAWN_DELTAS),
    leaper_table(&BLACK_PAWN_DELTAS),
];

static RANK_LINES: [Bitboard; 64] = line_table(1, 0);
static FILE_LINES: [Bitboard; 64] = line_table(0, 1);
static DIAGONAL_LINES: [Bitboard; 64] = line_table(1, 1);
static ANTI_DIAGONAL_LINES: [Bitboard; 64] = line_table(1, -1);

static BETWEEN: [[Bitboard; 64]; 64] = between_table();

/// Attacks of a slider on `square` along one line, stopping at (and
/// including) the first occupied square in each direction.
#[inline]
fn line_attacks(square: Square, occupancy: Bitboard, line: Bitboard) -> Bitboard {
    let slider = 1u64 << square.index();
    let occupied = occupancy.0 & line.0;
    let forward = occupied.wrapping_sub(slider);
    let reverse = occupied
        .reverse_bits()
        .wrapping_sub(slider.reverse_bits())
        .reverse_bits();
    Bitboard((forward ^ reverse) & line.0)
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    line_attacks(square, occupancy, DIAGONAL_LINES[square.index()])
        | line_attacks(square, occupancy, ANTI_DIAGONAL_LINES[square.index()])
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    line_attacks(square, occupancy, RANK_LINES[square.index()])
        | line_attacks(square, occupancy, FILE_LINES[square.index()])
}

#[inline]
pub fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square.index()]
}

#[inline]
pub fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square.index()]
}

/// Squares a `color` pawn on `square` attacks.
///
/// Read in reverse, `pawn_attacks(us, sq)` is also the set of squares from
/// which an enemy pawn attacks `sq`.
#[inline]
pub fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][square.index()]
}

/// Union of the attacks of every `color` pawn in `pawns`.
#[inline]
pub fn pawn_attacks_bb(color: Color, pawns: Bitboard) -> Bitboard {
    let bits = pawns.0;
    let (west, east) = match color {
        Color::White => (bits >> 9, bits >> 7),
        Color::Black => (bits << 7, bits << 9),
    };
    Bitboard((west & !Bitboard::FILE_H.0) | (east & !Bitboard::FILE_A.0))
}

/// Squares strictly between `a` and `b` on a shared line; empty if the
/// squares are not aligned or adjacent.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index()][b.index()]
}

/// True if `a` and `b` are distinct squares on a shared rank, file or diagonal.
#[inline]
pub fn aligned(a: Square, b: Square) -> bool {
    let files = (a.file() as i8 - b.file() as i8).abs();
    let rows = (a.row() as i8 - b.row() as i8).abs();
    a != b && (files == 0 || rows == 0 || files == rows)
}

/// Squares on the line from `a` to `b`, both ends included. Empty for
/// squares that are not aligned.
#[inline]
pub fn path_between(a: Square, b: Square) -> Bitboard {
    if aligned(a, b) {
        between(a, b) | a.bitboard() | b.bitboard()
    } else {
        Bitboard::EMPTY
    }
}
