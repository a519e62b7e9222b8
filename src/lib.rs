pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod color;
pub mod error;
pub mod fen;
pub mod masks;
pub mod r#move;
pub mod movegen;
pub mod perft;
pub mod piece;
pub mod position;
pub mod rights;
pub mod square;
mod transition;

#[cfg(feature = "python")]
extern crate pyo3;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(gil_used = false)]
fn spooky_chess(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use color::Color;
    use python_bindings::*;
    m.add_class::<PyBoard>()?;
    m.add_class::<PyMove>()?;
    m.add("WHITE", Color::White as i8)?;
    m.add("BLACK", Color::Black as i8)?;
    m.add("STARTING_FEN", fen::STARTING_FEN)?;
    Ok(())
}

#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use crate::board::Board;
    use crate::perft::perft;
    use crate::r#move::Move;

    fn value_error(err: impl std::fmt::Display) -> PyErr {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }

    #[pyclass(name = "Move")]
    #[derive(Clone)]
    pub struct PyMove {
        move_: Move,
    }

    #[pymethods]
    impl PyMove {
        pub fn uci(&self) -> String {
            self.move_.to_uci()
        }

        pub fn from_square(&self) -> usize {
            self.move_.from_square().index()
        }

        pub fn to_square(&self) -> usize {
            self.move_.to_square().index()
        }

        pub fn is_capture(&self) -> bool {
            self.move_.is_capture()
        }

        pub fn promotion(&self) -> Option<char> {
            self.move_.promotion().and_then(|p| p.promotion_char())
        }

        pub fn __str__(&self) -> String {
            self.move_.to_uci()
        }

        pub fn __repr__(&self) -> String {
            format!("Move({})", self.move_.to_uci())
        }

        pub fn __eq__(&self, other: &PyMove) -> bool {
            self.move_ == other.move_
        }

        pub fn __hash__(&self) -> u64 {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            self.move_.hash(&mut hasher);
            hasher.finish()
        }
    }

    #[pyclass(name = "Board")]
    #[derive(Clone)]
    pub struct PyBoard {
        board: Board,
    }

    #[pymethods]
    impl PyBoard {
        #[new]
        pub fn new() -> Self {
            PyBoard {
                board: Board::standard(),
            }
        }

        #[staticmethod]
        pub fn from_fen(fen: &str) -> PyResult<Self> {
            Ok(PyBoard {
                board: Board::from_fen(fen).map_err(value_error)?,
            })
        }

        pub fn fen(&self) -> String {
            self.board.to_fen()
        }

        pub fn turn(&self) -> i8 {
            self.board.turn() as i8
        }

        pub fn is_check(&self) -> bool {
            self.board.is_check()
        }

        pub fn legal_moves(&self) -> PyResult<Vec<PyMove>> {
            let moves = self.board.legal_moves().map_err(value_error)?;
            Ok(moves.into_iter().map(|move_| PyMove { move_ }).collect())
        }

        pub fn push(&mut self, move_: &PyMove) -> PyResult<()> {
            let legal = self.board.legal_moves().map_err(value_error)?;
            if !legal.contains(&move_.move_) {
                return Err(value_error(format!(
                    "move {} is not legal in this position",
                    move_.move_
                )));
            }
            self.board = self.board.play(&move_.move_);
            Ok(())
        }

        pub fn push_uci(&mut self, uci: &str) -> PyResult<PyMove> {
            let move_ = self.board.parse_move(uci).map_err(value_error)?;
            self.board = self.board.play(&move_);
            Ok(PyMove { move_ })
        }

        pub fn perft(&self, depth: u32) -> PyResult<u64> {
            perft(&self.board, depth).map_err(value_error)
        }

        pub fn __str__(&self) -> String {
            self.board.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!("Board(fen=\"{}\")", self.board.to_fen())
        }
    }

    impl Default for PyBoard {
        fn default() -> Self {
            Self::new()
        }
    }
}
