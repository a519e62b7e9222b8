//! Leaf-node counting over the legal move tree.

use tracing::debug;

use crate::board::Board;
use crate::movegen::{generate_legal_moves, MoveGenError, MoveList, MAX_MOVES};
use crate::r#move::Move;

fn perft_inner(board: &Board, depth: u32, lists: &mut [MoveList]) -> Result<u64, MoveGenError> {
    let Some((moves, rest)) = lists.split_first_mut() else {
        return Ok(1);
    };

    moves.clear();
    generate_legal_moves(board.rights(), board.position(), moves)?;

    // Bulk count at the last ply.
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0;
    for mv in moves.iter() {
        nodes += perft_inner(&board.play(mv), depth - 1, rest)?;
    }
    Ok(nodes)
}

fn move_lists(depth: u32) -> Vec<MoveList> {
    (0..depth).map(|_| MoveList::with_capacity(MAX_MOVES)).collect()
}

/// Number of leaf nodes `depth` plies below `board`.
pub fn perft(board: &Board, depth: u32) -> Result<u64, MoveGenError> {
    let mut lists = move_lists(depth);
    perft_inner(board, depth, &mut lists)
}

/// Leaf counts below each root move, in generation order.
#[hotpath::measure]
pub fn perft_divide(board: &Board, depth: u32) -> Result<Vec<(Move, u64)>, MoveGenError> {
    let root = board.legal_moves()?;
    let mut lists = move_lists(depth.saturating_sub(1));

    let mut counts = Vec::with_capacity(root.len());
    for mv in root.iter() {
        let nodes = if depth <= 1 {
            1
        } else {
            perft_inner(&board.play(mv), depth - 1, &mut lists)?
        };
        debug!(%mv, nodes, "perft divide");
        counts.push((*mv, nodes));
    }

    Ok(counts)
}
