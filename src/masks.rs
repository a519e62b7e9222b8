//! Checkmask and pinmask generation for the side to move.

use crate::attacks::{between, bishop_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::PieceType;
use crate::position::Position;
use crate::square::Square;

/// Squares a pinned piece may still move to, split by the axis of the pin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pinmask {
    pub diagonal: Bitboard,
    pub straight: Bitboard,
    pub both: Bitboard,
}

/// Squares that resolve the current check for `color`.
///
/// - no check: every square
/// - single check: the checker's square plus, for a slider, the squares
///   between it and the king
/// - double check: no square; only the king may move
pub fn checkmask(color: Color, position: &Position) -> Bitboard {
    let them = color.opposite();
    let king = position.king_square(color);
    let occupancy = position.occupied();

    let mut mask = Bitboard::EMPTY;
    let mut checkers = 0u32;

    let pawns = pawn_attacks(color, king) & position.pieces(them, PieceType::Pawn);
    if pawns.is_nonzero() {
        mask |= pawns;
        checkers += 1;
    }

    let knights = knight_attacks(king) & position.pieces(them, PieceType::Knight);
    if knights.is_nonzero() {
        mask |= knights;
        checkers += 1;
    }

    let sliders = (bishop_attacks(king, occupancy) & position.diagonal_sliders(them))
        | (rook_attacks(king, occupancy) & position.orthogonal_sliders(them));
    for checker in sliders {
        checkers += 1;
        if checkers > 1 {
            return Bitboard::EMPTY;
        }
        mask |= between(king, checker) | checker.bitboard();
    }

    match checkers {
        0 => Bitboard::FULL,
        1 => mask,
        _ => Bitboard::EMPTY,
    }
}

/// Pin rays for one axis: each ray runs from the king (exclusive) to the
/// pinning piece (inclusive).
fn pins_on_axis(
    king: Square,
    occupancy: Bitboard,
    own: Bitboard,
    enemy_sliders: Bitboard,
    slider_attacks: fn(Square, Bitboard) -> Bitboard,
) -> Bitboard {
    let raw = slider_attacks(king, occupancy);
    let blockers = raw & own;
    let xray = slider_attacks(king, occupancy ^ blockers);
    let pinners = (xray & !raw) & enemy_sliders;

    pinners
        .iter_ones()
        .fold(Bitboard::EMPTY, |mask, pinner| {
            mask | between(king, pinner) | pinner.bitboard()
        })
}

pub fn pinmask(color: Color, position: &Position) -> Pinmask {
    let them = color.opposite();
    let king = position.king_square(color);
    let occupancy = position.occupied();
    let own = position.occupied_by(color);

    let diagonal = pins_on_axis(
        king,
        occupancy,
        own,
        position.diagonal_sliders(them),
        bishop_attacks,
    );
    let straight = pins_on_axis(
        king,
        occupancy,
        own,
        position.orthogonal_sliders(them),
        rook_attacks,
    );

    Pinmask {
        diagonal,
        straight,
        both: diagonal | straight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(placement: &str) -> Position {
        Position::from_fen_placement(placement).unwrap()
    }

    #[test]
    fn test_pinmask_golden() {
        let pinned = position("1b6/4P1P1/4r3/rP2K3/8/2P5/8/b7");
        let pins = pinmask(Color::White, &pinned);
        assert_eq!(pins.both.bits(), 0x10204080f000000);
        assert_eq!(pins.straight.bits(), 0xf000000);
        assert_eq!(pins.diagonal.bits(), 0x102040800000000);
    }

    #[test]
    fn test_checkmask_single_slider() {
        let mask = checkmask(Color::White, &position("8/1q5b/8/5P2/4K3/8/8/8"));
        assert_eq!(mask.bits(), 0x8040200);
    }

    #[test]
    fn test_checkmask_double_check() {
        let mask = checkmask(Color::White, &position("8/8/5q2/8/1p6/2K5/8/8"));
        assert_eq!(mask.bits(), 0);
    }

    #[test]
    fn test_checkmask_no_check() {
        let mask = checkmask(Color::White, &position("8/8/8/3K4/8/8/8/8"));
        assert_eq!(mask, Bitboard::FULL);
        assert_eq!(checkmask(Color::White, &Position::standard()), Bitboard::FULL);
        assert_eq!(checkmask(Color::Black, &Position::standard()), Bitboard::FULL);
    }

    #[test]
    fn test_checkmask_knight() {
        let mask = checkmask(Color::Black, &position("4k3/8/3N4/8/8/8/8/4K3"));
        assert_eq!(mask, Square::D6.bitboard());
    }

    #[test]
    fn test_checkmask_pawn() {
        let white = checkmask(Color::White, &position("8/8/8/8/8/3p4/4K3/k7"));
        assert_eq!(white, Square::D3.bitboard());
        let black = checkmask(Color::Black, &position("K7/8/8/8/4k3/5P2/8/8"));
        assert_eq!(black, Square::F3.bitboard());
    }

    #[test]
    fn test_checkmask_pawn_behind_does_not_check() {
        // A white pawn on f5 does not attack a black king on e4.
        let mask = checkmask(Color::Black, &position("K7/8/8/5P2/4k3/8/8/8"));
        assert_eq!(mask, Bitboard::FULL);
    }

    #[test]
    fn test_checkmask_knight_and_rook() {
        let mask = checkmask(Color::White, &position("k3r3/8/8/8/8/3n4/8/4K3"));
        assert!(mask.is_empty());
    }

    #[test]
    fn test_no_pin_through_two_own_pieces() {
        // Knight and bishop both stand between the king and the rook.
        let pins = pinmask(Color::White, &position("k7/8/8/8/8/8/8/KNB4r"));
        assert!(pins.both.is_empty());
    }

    #[test]
    fn test_no_pin_through_enemy_piece() {
        let pins = pinmask(Color::White, &position("k7/8/8/8/8/8/8/KNn4r"));
        assert!(pins.both.is_empty());
    }

    #[test]
    fn test_multiple_pins() {
        let pins = pinmask(Color::White, &position("k7/8/4r3/8/4N3/8/1b1PK1Pq/8"));
        assert!(pins.straight.get(Square::E4));
        assert!(pins.straight.get(Square::E6));
        assert!(pins.straight.get(Square::F2));
        assert!(pins.straight.get(Square::G2));
        assert!(pins.straight.get(Square::H2));
        assert!(!pins.straight.get(Square::D2));
        assert!(pins.diagonal.is_empty());
        assert_eq!(pins.both, pins.straight);
    }
}
