//! Greedy play: filling a board one move at a time under a heuristic program.
//!
//! # How It Works
//!
//! Starting from a copy of the original board, the player repeats:
//!
//! 1. **Recompute Candidates** - Every empty cell gets the values that are still legal
//!    in its row, column, and box
//! 2. **Score Candidates** - The program scores every `(row, col, value)` candidate
//! 3. **Commit Best** - The lowest-scoring candidate is written to the board
//!
//! Play stops when no empty cell has a legal candidate left. The fitness is the number
//! of cells still empty at that point, so `0` means the board was solved.
//!
//! # Tie-Break
//!
//! Cells are scanned in row-major order and, within a cell, candidates in descending
//! value order. A candidate replaces the current best only if its score is strictly
//! smaller, so the first minimum encountered wins. `NaN` scores never win.
//!
//! If every remaining candidate scores `NaN` no move can be chosen and play stops early
//! with the current empty count as fitness.

use log::debug;
use sudogene_engine::{Board, CandidateGrades};

use crate::{expr::ExprNode, terminal::ScoringContext};

/// A candidate chosen by the best-move scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub value: u8,
    pub score: f64,
}

/// The result of playing one board to the end.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOutcome {
    /// Cells left empty when play stopped. Lower is better; `0` means solved.
    pub fitness: usize,
    /// The board as the player left it.
    pub board: Board,
    /// Number of values the player wrote.
    pub moves: usize,
}

impl PlayOutcome {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.fitness == 0
    }
}

/// Plays boards greedily under a heuristic program.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPlayer<'a> {
    program: &'a ExprNode,
}

impl<'a> GreedyPlayer<'a> {
    #[must_use]
    pub fn new(program: &'a ExprNode) -> Self {
        Self { program }
    }

    /// Fills `original` until no forward move remains.
    ///
    /// `original` is left untouched; the filled board is returned in the outcome.
    #[must_use]
    pub fn play(&self, original: &Board) -> PlayOutcome {
        let mut board = original.clone();
        let mut grades = CandidateGrades::new(board.size());
        grades.refresh(&board);

        let mut fitness = board.count_empty_cells();
        let mut moves = 0;
        while grades.has_candidates() {
            self.score_candidates(&board, &mut grades);
            let Some(best) = select_best_move(&grades) else {
                debug!("no candidate has a comparable score, stopping with {fitness} empty cells");
                break;
            };
            board.set(best.row, best.col, best.value);
            grades.clear_cell(best.row, best.col);
            fitness -= 1;
            moves += 1;
            grades.refresh(&board);
        }

        debug!("play finished after {moves} moves, {fitness} cells left empty");
        PlayOutcome {
            fitness,
            board,
            moves,
        }
    }

    /// Scores every candidate of every empty cell against the current board.
    pub fn score_candidates(&self, board: &Board, grades: &mut CandidateGrades) {
        for scored in self.evaluate_candidates(board, grades) {
            grades.set_grade(scored.row, scored.col, scored.value, scored.score);
        }
    }

    fn evaluate_candidates(&self, board: &Board, grades: &CandidateGrades) -> Vec<Move> {
        grades
            .iter()
            .flat_map(|(row, col, candidates)| {
                candidates.keys().map(move |&value| (row, col, value))
            })
            .map(|(row, col, value)| {
                let ctx = ScoringContext {
                    row,
                    col,
                    value,
                    board,
                    grades,
                };
                Move {
                    row,
                    col,
                    value,
                    score: self.program.evaluate(&ctx),
                }
            })
            .collect()
    }
}

/// Finds the lowest-scoring candidate, first encountered on ties.
///
/// Within a cell the largest value is visited first.
///
/// Returns `None` if there are no candidates or all of them score `NaN`.
#[must_use]
pub fn select_best_move(grades: &CandidateGrades) -> Option<Move> {
    let mut best: Option<Move> = None;
    for (row, col, candidates) in grades.iter() {
        for (&value, &score) in candidates.iter().rev() {
            if score.is_nan() {
                continue;
            }
            if best.is_none_or(|best| score < best.score) {
                best = Some(Move {
                    row,
                    col,
                    value,
                    score,
                });
            }
        }
    }
    best
}
