//! Evolutionary search for heuristic programs that fill Sudoku boards.
//!
//! This crate evolves expression trees (`sudogene-evaluator`) with genetic
//! programming. Each individual carries one program; its fitness is the number of cells
//! the greedy player leaves empty on the puzzle, so lower is better and `0` is ideal.
//!
//! # How Evolution Works
//!
//! 1. **Population** - Create individuals with random full trees of the configured height
//! 2. **Evaluation** - Each individual plays the puzzle once, on first fitness read
//! 3. **Sort** - Individuals are ordered by ascending fitness (best first)
//! 4. **Reproduction** - Every slot is refilled by crossover and/or mutation, with
//!    partners drawn from the best part of the population
//! 5. **Repeat** - Until an individual solves the puzzle or the generation limit is hit
//!
//! # Architecture
//!
//! ```text
//! Evolution (generational loop, reporting)
//!     ↓ drives
//! Population (sorted individuals)
//!     ↓ refilled by
//! Selection (crossover + mutation over a top-percentile window)
//!     ↓ operates on
//! BoardSolver (Program + puzzle + cached play outcome)
//!     ↓ plays with
//! GreedyPlayer (sudogene-evaluator)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64Mcg;
//! use sudogene_engine::Board;
//! use sudogene_evaluator::function_set::FunctionSet;
//! use sudogene_training::{
//!     board_solver::BoardSolver, evolution::Evolution, individual::Individual as _,
//!     population::Population, selection::TournamentSelection,
//! };
//!
//! let board = Board::from_rows(&[[1, 0, 0, 4], [0, 4, 1, 0], [2, 0, 4, 0], [0, 3, 0, 1]])?;
//! let mut rng = Pcg64Mcg::seed_from_u64(5);
//! let prototype = BoardSolver::random(2, Arc::new(FunctionSet::all()), Arc::new(board), &mut rng)?;
//!
//! let population = Population::random(20, &prototype, &mut rng);
//! let selection = TournamentSelection::new(0.3, 0.7, 0.4)?;
//! let outcome = Evolution::new(population, selection, 10).run(&mut rng, &mut ())?;
//!
//! assert!(outcome.generation <= 10);
//! assert_eq!(outcome.solved, outcome.best.fitness() == 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use sudogene_engine::BoardError;
use sudogene_evaluator::ExprError;

pub mod board_solver;
pub mod config;
pub mod evolution;
pub mod individual;
pub mod population;
pub mod selection;

/// An invalid experiment parameter.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("tree height must be at least 1, got {_0}")]
    TreeHeight(#[error(not(source))] usize),
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("{name} must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[display("good population percent must be within (0, 1], got {_0}")]
    GoodPopulationPercent(#[error(not(source))] f64),
}

/// Errors raised while setting up a solver.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SolverError {
    #[display("invalid board: {_0}")]
    Board(BoardError),
    #[display("invalid program: {_0}")]
    Expr(ExprError),
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
}
