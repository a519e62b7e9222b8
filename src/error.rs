use thiserror::Error;

use crate::fen::FenError;
use crate::movegen::MoveGenError;
use crate::r#move::NotationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    MoveGen(#[from] MoveGenError),
}
