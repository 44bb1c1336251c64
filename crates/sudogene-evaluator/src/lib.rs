//! Heuristic programs for filling Sudoku boards, and the greedy player that runs them.
//!
//! A heuristic is an expression tree ([`expr::ExprNode`]) that scores a candidate value
//! for an empty cell. Lower scores are better. The tree is built from two kinds of nodes:
//!
//! - **Terminals** ([`terminal::TerminalOp`]) - Leaves that measure something about the
//!   board or the candidate set (empty cells in a row, options left in a cell, ...)
//! - **Primitives** ([`primitive::PrimitiveOp`]) - Binary operators that combine the
//!   scores of their two subtrees
//!
//! # Architecture
//!
//! ```text
//! Greedy Player (fill the board one move at a time)
//!     ↓ scores every candidate with
//! Expression Tree (primitives over terminals)
//!     ↓ reads
//! Board + Candidate Grades (sudogene-engine)
//! ```
//!
//! The set of terminals and primitives a tree may be built from is an explicit
//! [`function_set::FunctionSet`] value, passed to every tree generator.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use sudogene_engine::Board;
//! use sudogene_evaluator::{
//!     expr::ExprNode, function_set::FunctionSet, greedy_player::GreedyPlayer,
//! };
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let program = ExprNode::generate_full(3, &FunctionSet::all(), &mut rng);
//!
//! let board = Board::from_rows(&[[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 0]])?;
//! let outcome = GreedyPlayer::new(&program).play(&board);
//! assert_eq!(outcome.fitness, 0);
//! # Ok::<(), sudogene_engine::BoardError>(())
//! ```

pub mod expr;
pub mod function_set;
pub mod greedy_player;
pub mod primitive;
pub mod terminal;

/// Errors raised while configuring or building heuristic programs.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ExprError {
    #[display("unknown terminal operation: {_0}")]
    UnknownTerminal(#[error(not(source))] String),
    #[display("unknown primitive operation: {_0}")]
    UnknownPrimitive(#[error(not(source))] String),
    #[display("terminal set is empty")]
    EmptyTerminalSet,
    #[display("primitive set is empty")]
    EmptyPrimitiveSet,
    #[display("program height must be at least 1, got {_0}")]
    InvalidHeight(#[error(not(source))] usize),
}
