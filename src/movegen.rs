//! Legal move generation.
//!
//! Moves are filtered while they are generated rather than played out and
//! tested: the king avoids every attacked square, other pieces are limited
//! to the [`checkmask`] and to their pin ray from [`pinmask`], and the few
//! cases neither mask covers (en passant, castling) get a direct check.

use std::collections::TryReserveError;

use thiserror::Error;
use tracing::warn;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::masks::{checkmask, pinmask, Pinmask};
use crate::piece::PieceType;
use crate::position::Position;
use crate::r#move::{Move, MoveKind, UciMove};
use crate::rights::{castle_path, BoardRights, CastleSide};
use crate::square::Square;

/// No legal chess position has more moves than this.
pub const MAX_MOVES: usize = 218;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenError {
    #[error("could not grow move list: {0}")]
    Allocation(#[from] TryReserveError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
    /// Length past which growth fails, to exercise the error path.
    #[cfg(test)]
    limit: usize,
}

impl MoveList {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MoveList {
            moves: Vec::with_capacity(capacity),
            #[cfg(test)]
            limit: usize::MAX,
        }
    }

    #[cfg(test)]
    fn with_limit(limit: usize) -> Self {
        MoveList {
            moves: Vec::new(),
            limit,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.moves.contains(mv)
    }

    /// The move matching coordinate notation, if it is in the list.
    pub fn find(&self, uci: &UciMove) -> Option<Move> {
        self.moves.iter().copied().find(|mv| uci.matches(mv))
    }

    #[inline]
    fn try_push(&mut self, mv: Move) -> Result<(), TryReserveError> {
        #[cfg(test)]
        {
            if self.moves.len() >= self.limit {
                return Vec::<Move>::new().try_reserve(usize::MAX);
            }
        }

        self.moves.try_reserve(1)?;
        self.moves.push(mv);
        Ok(())
    }

    fn truncate(&mut self, len: usize) {
        self.moves.truncate(len);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

/// Append every legal move for `rights.active` to `moves`.
///
/// On error `moves` is left as it was on entry.
#[hotpath::measure]
pub fn generate_legal_moves(
    rights: &BoardRights,
    position: &Position,
    moves: &mut MoveList,
) -> Result<(), MoveGenError> {
    let start = moves.len();
    let result = Generator::new(rights, position).generate(moves);

    if let Err(err) = &result {
        warn!(%err, discarded = moves.len() - start, "move generation aborted");
        moves.truncate(start);
    }

    result.map_err(MoveGenError::from)
}

struct Generator<'a> {
    rights: &'a BoardRights,
    position: &'a Position,
    us: Color,
    them: Color,
    king: Square,
    own: Bitboard,
    enemy: Bitboard,
    occupancy: Bitboard,
}

impl<'a> Generator<'a> {
    fn new(rights: &'a BoardRights, position: &'a Position) -> Self {
        let us = rights.active;
        Generator {
            rights,
            position,
            us,
            them: us.opposite(),
            king: position.king_square(us),
            own: position.occupied_by(us),
            enemy: position.occupied_by(us.opposite()),
            occupancy: position.occupied(),
        }
    }

    fn generate(&self, moves: &mut MoveList) -> Result<(), TryReserveError> {
        // With the king lifted off the board, squares behind it on a
        // checking ray count as attacked.
        let king_bb = self.king.bitboard();
        let unsafe_squares = self
            .position
            .attacked_by(self.them, self.occupancy & !king_bb);

        self.king_moves(moves, unsafe_squares)?;

        let checkmask = checkmask(self.us, self.position);
        if checkmask.is_empty() {
            return Ok(());
        }

        let pins = pinmask(self.us, self.position);

        self.knight_moves(moves, checkmask, &pins)?;
        self.slider_moves(
            moves,
            PieceType::Bishop,
            self.position.diagonal_sliders(self.us),
            pins.diagonal,
            pins.straight,
            checkmask,
            bishop_attacks,
        )?;
        self.slider_moves(
            moves,
            PieceType::Rook,
            self.position.orthogonal_sliders(self.us),
            pins.straight,
            pins.diagonal,
            checkmask,
            rook_attacks,
        )?;
        self.pawn_moves(moves, checkmask, &pins)?;
        self.en_passant(moves, checkmask, &pins)?;
        self.castling(moves, unsafe_squares)?;

        Ok(())
    }

    /// Quiet move or capture of `piece` from `from` to each square of `targets`.
    #[inline]
    fn push_targets(
        &self,
        moves: &mut MoveList,
        piece: PieceType,
        from: Bitboard,
        targets: Bitboard,
    ) -> Result<(), TryReserveError> {
        for to in targets.iter_singles() {
            let kind = if self.enemy.intersects(to) {
                MoveKind::Capture(piece)
            } else {
                MoveKind::Quiet(piece)
            };
            moves.try_push(Move::new(from, to, kind))?;
        }
        Ok(())
    }

    fn king_moves(
        &self,
        moves: &mut MoveList,
        unsafe_squares: Bitboard,
    ) -> Result<(), TryReserveError> {
        let targets = king_attacks(self.king) & !self.own & !unsafe_squares;
        self.push_targets(moves, PieceType::King, self.king.bitboard(), targets)
    }

    fn knight_moves(
        &self,
        moves: &mut MoveList,
        checkmask: Bitboard,
        pins: &Pinmask,
    ) -> Result<(), TryReserveError> {
        // A pinned knight can never stay on its pin ray.
        let knights = self.position.pieces(self.us, PieceType::Knight) & !pins.both;
        for from in knights.iter_singles() {
            let targets =
                knight_attacks(from.lowest_square_unchecked()) & !self.own & checkmask;
            self.push_targets(moves, PieceType::Knight, from, targets)?;
        }
        Ok(())
    }

    /// Moves of every slider in `sliders` along one axis. `plain` is the
    /// piece type that moves only on this axis; the rest are queens.
    ///
    /// A slider pinned on the other axis has no move along this one.
    #[allow(clippy::too_many_arguments)]
    fn slider_moves(
        &self,
        moves: &mut MoveList,
        plain: PieceType,
        sliders: Bitboard,
        pinned_along: Bitboard,
        pinned_across: Bitboard,
        checkmask: Bitboard,
        attacks: fn(Square, Bitboard) -> Bitboard,
    ) -> Result<(), TryReserveError> {
        let plain_pieces = self.position.pieces(self.us, plain);

        for from in (sliders & !pinned_across).iter_singles() {
            let mut targets =
                attacks(from.lowest_square_unchecked(), self.occupancy) & !self.own & checkmask;
            if pinned_along.intersects(from) {
                targets &= pinned_along;
            }

            let piece = if plain_pieces.intersects(from) {
                plain
            } else {
                PieceType::Queen
            };
            self.push_targets(moves, piece, from, targets)?;
        }
        Ok(())
    }

    fn push_promotions(
        &self,
        moves: &mut MoveList,
        from: Bitboard,
        to: Bitboard,
        capture: bool,
    ) -> Result<(), TryReserveError> {
        for piece in PieceType::PROMOTIONS {
            let kind = if capture {
                MoveKind::PromotionCapture(piece)
            } else {
                MoveKind::Promotion(piece)
            };
            moves.try_push(Move::new(from, to, kind))?;
        }
        Ok(())
    }

    fn pawn_moves(
        &self,
        moves: &mut MoveList,
        checkmask: Bitboard,
        pins: &Pinmask,
    ) -> Result<(), TryReserveError> {
        let empty = self.position.empty_squares();
        let start_row = Bitboard::row(self.us.pawn_row());
        let promotion_row = Bitboard::row(self.us.promotion_row());

        for from in self.position.pieces(self.us, PieceType::Pawn).iter_singles() {
            let pinned_diagonal = pins.diagonal.intersects(from);
            let pinned_straight = pins.straight.intersects(from);

            // Pushes run along a file, so a diagonal pin forbids them.
            if !pinned_diagonal {
                let allowed = if pinned_straight {
                    pins.straight
                } else {
                    Bitboard::FULL
                };
                let single = self.us.push(from) & empty;

                if (single & checkmask & allowed).is_nonzero() {
                    if single.intersects(promotion_row) {
                        self.push_promotions(moves, from, single, false)?;
                    } else {
                        let kind = MoveKind::Quiet(PieceType::Pawn);
                        moves.try_push(Move::new(from, single, kind))?;
                    }
                }

                if from.intersects(start_row) {
                    let double = self.us.push(single) & empty & checkmask & allowed;
                    if double.is_nonzero() {
                        moves.try_push(Move::new(from, double, MoveKind::DoublePawnPush))?;
                    }
                }
            }

            // Captures run along a diagonal, so a straight pin forbids them.
            if !pinned_straight {
                let allowed = if pinned_diagonal {
                    pins.diagonal
                } else {
                    Bitboard::FULL
                };
                let attacks = pawn_attacks(self.us, from.lowest_square_unchecked());
                let targets = attacks & self.enemy & checkmask & allowed;

                for to in targets.iter_singles() {
                    if to.intersects(promotion_row) {
                        self.push_promotions(moves, from, to, true)?;
                    } else {
                        let kind = MoveKind::Capture(PieceType::Pawn);
                        moves.try_push(Move::new(from, to, kind))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn en_passant(
        &self,
        moves: &mut MoveList,
        checkmask: Bitboard,
        pins: &Pinmask,
    ) -> Result<(), TryReserveError> {
        let Some(target) = self.rights.en_passant else {
            return Ok(());
        };
        let target_bb = target.bitboard();
        let captured = self.us.push_back(target_bb);

        if self.occupancy.intersects(target_bb)
            || !captured.intersects(self.position.pieces(self.them, PieceType::Pawn))
        {
            return Ok(());
        }

        // Either landing on the target blocks the check or removing the
        // pawn captures the checker.
        if !checkmask.intersects(target_bb | captured) {
            return Ok(());
        }

        let candidates =
            pawn_attacks(self.them, target) & self.position.pieces(self.us, PieceType::Pawn);
        let enemy_orthogonal = self.position.orthogonal_sliders(self.them);
        let enemy_diagonal = self.position.diagonal_sliders(self.them);

        for from in candidates.iter_singles() {
            if pins.straight.intersects(from) {
                continue;
            }
            if pins.diagonal.intersects(from) && !pins.diagonal.intersects(target_bb) {
                continue;
            }

            // Two pawns leave one rank at once, which the pinmask cannot see.
            let after = (self.occupancy ^ from ^ captured) | target_bb;
            let exposed = (rook_attacks(self.king, after) & enemy_orthogonal)
                | (bishop_attacks(self.king, after) & enemy_diagonal);
            if exposed.is_nonzero() {
                continue;
            }

            moves.try_push(Move::new(from, target_bb, MoveKind::EnPassant))?;
        }
        Ok(())
    }

    fn castling(
        &self,
        moves: &mut MoveList,
        unsafe_squares: Bitboard,
    ) -> Result<(), TryReserveError> {
        let king_bb = self.king.bitboard();
        if unsafe_squares.intersects(king_bb) {
            return Ok(());
        }

        for side in CastleSide::ALL {
            if !self.rights.castling.has(self.us, side) {
                continue;
            }

            let path = castle_path(self.us, side);
            if self.occupancy.intersects(path.empty) || unsafe_squares.intersects(path.safe) {
                continue;
            }

            moves.try_push(Move::new(
                king_bb,
                path.king_to.bitboard(),
                MoveKind::Castle {
                    king: path.king,
                    rook: path.rook,
                },
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::rights::CastlingRights;

    fn legal(fen: &str) -> MoveList {
        let board = Board::from_fen(fen).unwrap();
        let mut moves = MoveList::new();
        generate_legal_moves(board.rights(), board.position(), &mut moves).unwrap();
        moves
    }

    fn ucis(moves: &MoveList) -> Vec<String> {
        let mut list: Vec<String> = moves.iter().map(Move::to_uci).collect();
        list.sort();
        list
    }

    fn has(moves: &MoveList, uci: &str) -> bool {
        moves.find(&uci.parse().unwrap()).is_some()
    }

    #[test]
    fn test_starting_position() {
        let moves = legal("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(moves.len(), 20);
        let doubles = moves
            .iter()
            .filter(|mv| mv.kind() == MoveKind::DoublePawnPush)
            .count();
        assert_eq!(doubles, 8);
        assert!(has(&moves, "g1f3"));
        assert!(has(&moves, "e2e4"));
        assert!(!has(&moves, "e1e2"));

        let black = legal("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
        assert_eq!(black.len(), 20);
    }

    #[test]
    fn test_appends_to_existing_list() {
        let board = Board::standard();
        let mut moves = MoveList::with_capacity(MAX_MOVES);
        generate_legal_moves(board.rights(), board.position(), &mut moves).unwrap();
        generate_legal_moves(board.rights(), board.position(), &mut moves).unwrap();
        assert_eq!(moves.len(), 40);
    }

    #[test]
    fn test_failed_growth_restores_list() {
        let board = Board::standard();
        let mut moves = MoveList::with_limit(25);
        generate_legal_moves(board.rights(), board.position(), &mut moves).unwrap();
        assert_eq!(moves.len(), 20);
        let before = moves.clone();

        let result = generate_legal_moves(board.rights(), board.position(), &mut moves);
        assert!(matches!(result, Err(MoveGenError::Allocation(_))));
        assert_eq!(moves, before);
    }

    #[test]
    fn test_castling_trusts_rights_flag() {
        // The flag alone decides; no rook stands on h1.
        let board = Board::from_parts(
            Position::from_fen_placement("4k3/8/8/8/8/8/8/4K3").unwrap(),
            BoardRights::new(Color::White, None, CastlingRights::WHITE_KINGSIDE),
            0,
            1,
        );
        let mut moves = MoveList::new();
        generate_legal_moves(board.rights(), board.position(), &mut moves).unwrap();
        assert!(has(&moves, "e1g1"));
    }

    #[test]
    fn test_double_check_only_king_moves() {
        // Rook on e8 and knight on d3 both check the king on e1.
        let moves = legal("k3r3/8/8/8/8/3n4/6B1/4K3 w - - 0 1");
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.piece() == PieceType::King));
        assert_eq!(ucis(&moves), vec!["e1d1", "e1d2", "e1f1"]);
    }

    #[test]
    fn test_single_check_block_or_capture() {
        // Rook on e8 checks; the bishop blocks on e2, the rook on e4.
        let moves = legal("k3r3/8/8/8/R7/8/8/3BK3 w - - 0 1");
        for mv in &moves {
            if mv.piece() != PieceType::King {
                let to = mv.to_square();
                assert!(to.file() == 4, "{} does not resolve the check", mv);
            }
        }
        assert!(has(&moves, "a4e4"));
        assert!(has(&moves, "d1e2"));
        assert!(!has(&moves, "a4a5"));
        assert!(!has(&moves, "e1e2"));
    }

    #[test]
    fn test_pinned_knight_has_no_moves() {
        let moves = legal("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(moves.iter().all(|mv| mv.piece() != PieceType::Knight));
    }

    #[test]
    fn test_pinned_slider_moves_along_pin() {
        // Rook pinned on the e-file slides along it and captures the pinner.
        let moves = legal("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
        let rook: Vec<String> = ucis(&moves)
            .into_iter()
            .filter(|uci| uci.starts_with("e2"))
            .collect();
        assert_eq!(rook, vec!["e2e3", "e2e4", "e2e5", "e2e6", "e2e7"]);
    }

    #[test]
    fn test_cross_axis_pin_has_no_moves() {
        // Bishop pinned on the e-file.
        let moves = legal("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(moves.iter().all(|mv| mv.piece() != PieceType::Bishop));

        // Rook pinned on a diagonal.
        let moves = legal("4k3/8/8/b7/8/8/3R4/4K3 w - - 0 1");
        assert!(moves.iter().all(|mv| mv.piece() != PieceType::Rook));
    }

    #[test]
    fn test_pinned_queen_keeps_pin_axis_only() {
        // Queen pinned diagonally by the bishop on a5.
        let moves = legal("4k3/8/8/b7/8/8/3Q4/4K3 w - - 0 1");
        let queen: Vec<String> = ucis(&moves)
            .into_iter()
            .filter(|uci| uci.starts_with("d2"))
            .collect();
        assert_eq!(queen, vec!["d2a5", "d2b4", "d2c3"]);
    }

    #[test]
    fn test_pinned_pawns() {
        // Diagonal pin: the pawn may capture the pinner but not push.
        let moves = legal("4k3/8/8/8/8/2b5/3P4/4K3 w - - 0 1");
        let pawn: Vec<String> = ucis(&moves)
            .into_iter()
            .filter(|uci| uci.starts_with("d2"))
            .collect();
        assert_eq!(pawn, vec!["d2c3"]);

        // File pin: the pawn may push but not capture.
        let moves = legal("4k3/4r3/8/8/8/3b4/4P3/4K3 w - - 0 1");
        let pawn: Vec<String> = ucis(&moves)
            .into_iter()
            .filter(|uci| uci.starts_with("e2"))
            .collect();
        assert_eq!(pawn, vec!["e2e3", "e2e4"]);

        // Rank pin: nothing at all.
        let moves = legal("8/8/8/8/k7/8/r3P2K/8 w - - 0 1");
        assert!(moves.iter().all(|mv| mv.piece() != PieceType::Pawn));
    }

    #[test]
    fn test_promotions() {
        let moves = legal("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let pushes = moves
            .iter()
            .filter(|mv| matches!(mv.kind(), MoveKind::Promotion(_)))
            .count();
        let captures = moves
            .iter()
            .filter(|mv| matches!(mv.kind(), MoveKind::PromotionCapture(_)))
            .count();
        assert_eq!(pushes, 4);
        assert_eq!(captures, 4);
        assert!(has(&moves, "a7a8q"));
        assert!(has(&moves, "a7b8n"));
        assert!(!has(&moves, "a7a8"));
    }

    #[test]
    fn test_castling() {
        let moves = legal("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(has(&moves, "e1g1"));
        assert!(has(&moves, "e1c1"));

        let moves = legal("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert!(has(&moves, "e8g8"));
        assert!(has(&moves, "e8c8"));

        let moves = legal("r3k2r/8/8/8/8/8/8/R3K2R w Qk - 0 1");
        assert!(!has(&moves, "e1g1"));
        assert!(has(&moves, "e1c1"));
    }

    #[test]
    fn test_castling_blocked_or_attacked() {
        // Knight on b1 blocks the queenside.
        let moves = legal("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
        assert!(!has(&moves, "e1c1"));
        assert!(has(&moves, "e1g1"));

        // Rook on f8 covers f1.
        let moves = legal("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!has(&moves, "e1g1"));
        assert!(has(&moves, "e1c1"));

        // Rook on b8 attacks b1, which the king never crosses.
        let moves = legal("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(has(&moves, "e1c1"));

        // No castling out of check.
        let moves = legal("4k3/4r3/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!has(&moves, "e1g1"));
        assert!(!has(&moves, "e1c1"));
    }

    #[test]
    fn test_en_passant() {
        let moves = legal("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let ep: Vec<&Move> = moves
            .iter()
            .filter(|mv| mv.kind() == MoveKind::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_uci(), "e5d6");

        let moves = legal("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1");
        assert!(has(&moves, "e4d3"));
    }

    #[test]
    fn test_en_passant_rank_pin() {
        // Taking would clear both pawns off the fifth rank.
        let moves = legal("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2");
        assert!(!has(&moves, "e5d6"));
    }

    #[test]
    fn test_en_passant_diagonal_exposure() {
        // The captured pawn on d5 shields the king on a2 from the bishop on f7.
        let moves = legal("4k3/5b2/8/3pP3/8/8/K7/8 w - d6 0 2");
        assert!(!has(&moves, "e5d6"));
        // The capturing pawn is pinned, but d6 stays on the pin ray.
        let moves = legal("4k3/2b5/8/3pP3/8/6K1/8/8 w - d6 0 2");
        assert!(has(&moves, "e5d6"));
        let moves = legal("7k/8/8/3pP3/8/8/K7/8 w - d6 0 2");
        assert!(has(&moves, "e5d6"));
    }

    #[test]
    fn test_en_passant_captures_checking_pawn() {
        // The pawn that just moved to d5 gives check to the king on e4.
        let moves = legal("4k3/8/8/3pP3/4K3/8/8/8 w - d6 0 2");
        assert!(has(&moves, "e5d6"));
    }

    #[test]
    fn test_en_passant_does_not_block_unrelated_check() {
        // Rook on a1 checks along the first rank.
        let moves = legal("k7/8/8/3pP3/8/8/8/r3K3 w - d6 0 2");
        assert!(!has(&moves, "e5d6"));
    }
}
