//! Board model for the Sudoku heuristic search.
//!
//! This crate holds the state that every heuristic program reads and writes:
//!
//! - [`Board`] - An `N×N` grid of values (`0` = empty) made of `n×n` boxes, `n = √N`
//! - [`CandidateGrades`] - Per-cell map from each currently legal value to its heuristic score
//!
//! The board validates its own shape on construction; everything downstream (terminal
//! features, greedy play) can rely on a square grid whose side is a perfect square.
//!
//! # Example
//!
//! ```
//! use sudogene_engine::{Board, CandidateGrades};
//!
//! let board = Board::from_rows(&[
//!     [1, 2, 3, 4],
//!     [3, 4, 1, 2],
//!     [2, 1, 4, 3],
//!     [4, 3, 2, 0],
//! ])?;
//!
//! let mut grades = CandidateGrades::new(board.size());
//! grades.refresh(&board);
//! assert_eq!(grades.candidates(3, 3).keys().copied().collect::<Vec<_>>(), vec![1]);
//! # Ok::<(), sudogene_engine::BoardError>(())
//! ```

pub use self::core::*;

pub mod core;

/// Errors raised when a grid cannot be used as a Sudoku board.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("board has no rows")]
    Empty,
    #[display("board side {size} is not a perfect square")]
    NotPerfectSquare { size: usize },
    #[display("board side {size} exceeds the largest supported side of 255")]
    TooLarge { size: usize },
    #[display("row {row} has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("cell ({row}, {col}) holds {value}, expected 0..={max}")]
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: u8,
        max: usize,
    },
}
