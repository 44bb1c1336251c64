//! The individual specialized to one Sudoku puzzle.

use std::{cell::OnceCell, fmt::Write as _, sync::Arc};

use log::debug;
use rand::Rng;
use sudogene_engine::Board;
use sudogene_evaluator::{
    function_set::FunctionSet,
    greedy_player::{GreedyPlayer, PlayOutcome},
};

use crate::{
    SolverError,
    individual::{Individual, Program, Variable},
};

/// A heuristic program bound to the puzzle it is scored on.
///
/// The puzzle is shared read-only between every solver of a population. The play
/// outcome (and with it the fitness) is computed on first access and cached for the
/// lifetime of the solver; clones share the cached value.
#[derive(Debug, Clone)]
pub struct BoardSolver {
    program: Program,
    original: Arc<Board>,
    outcome: OnceCell<PlayOutcome>,
}

impl BoardSolver {
    #[must_use]
    pub fn new(program: Program, original: Arc<Board>) -> Self {
        Self {
            program,
            original,
            outcome: OnceCell::new(),
        }
    }

    /// Creates a solver with a random full program of `height`.
    pub fn random<R>(
        height: usize,
        function_set: Arc<FunctionSet>,
        original: Arc<Board>,
        rng: &mut R,
    ) -> Result<Self, SolverError>
    where
        R: Rng + ?Sized,
    {
        let program = Program::random(height, function_set, rng)?;
        Ok(Self::new(program, original))
    }

    /// Validates `rows` as a board and creates a random solver for it.
    pub fn from_rows<T, R>(
        rows: &[T],
        height: usize,
        function_set: Arc<FunctionSet>,
        rng: &mut R,
    ) -> Result<Self, SolverError>
    where
        T: AsRef<[u8]>,
        R: Rng + ?Sized,
    {
        let board = Board::from_rows(rows)?;
        Self::random(height, function_set, Arc::new(board), rng)
    }

    #[must_use]
    pub fn original_board(&self) -> &Board {
        &self.original
    }

    /// Plays the puzzle from scratch, bypassing the cache.
    #[must_use]
    pub fn play(&self) -> PlayOutcome {
        GreedyPlayer::new(self.program.tree()).play(&self.original)
    }

    /// The cached play outcome, playing the puzzle if this is the first access.
    pub fn outcome(&self) -> &PlayOutcome {
        self.outcome.get_or_init(|| {
            let outcome = self.play();
            debug!(
                "evaluated {}: fitness {} after {} moves",
                self.program.to_prefix(),
                outcome.fitness,
                outcome.moves
            );
            outcome
        })
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// The board as the program left it.
    pub fn working_board(&self) -> &Board {
        &self.outcome().board
    }

    #[must_use]
    pub fn original_empty_cells(&self) -> usize {
        self.original.count_empty_cells()
    }

    /// Number of cells the program filled.
    pub fn solved_cells(&self) -> usize {
        self.original_empty_cells() - self.fitness()
    }

    /// Human-readable report of the play: progress, the filled board, and the program.
    pub fn summary(&self) -> String {
        let original_empty = self.original_empty_cells();
        let left = self.fitness();
        let mut buf = String::new();
        if original_empty == 0 {
            buf.push_str("Nothing to solve\n\n");
        } else {
            let _ = write!(
                buf,
                "Solve = {} / {original_empty}\nLeft = {left}\n\n",
                original_empty - left
            );
        }
        let _ = write!(
            buf,
            "{}\n\nPrefix: {}\nInfix: {}\n",
            self.working_board(),
            self.program.to_prefix(),
            self.program.to_infix()
        );
        buf
    }
}

impl Variable for BoardSolver {
    fn mutate<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(self.program.mutate(rng), Arc::clone(&self.original))
    }

    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(
            self.program.crossover(&other.program, rng),
            Arc::clone(&self.original),
        )
    }
}

impl Individual for BoardSolver {
    fn regenerate<R>(&self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(self.program.regenerate(rng), Arc::clone(&self.original))
    }

    fn program(&self) -> &Program {
        &self.program
    }

    fn fitness(&self) -> usize {
        self.outcome().fitness
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;
    use sudogene_engine::BoardError;

    use super::*;

    const SOLVED_9X9: [[u8; 9]; 9] = [
        [5, 3, 4, 6, 7, 8, 9, 1, 2],
        [6, 7, 2, 1, 9, 5, 3, 4, 8],
        [1, 9, 8, 3, 4, 2, 5, 6, 7],
        [8, 5, 9, 7, 6, 1, 4, 2, 3],
        [4, 2, 6, 8, 5, 3, 7, 9, 1],
        [7, 1, 3, 9, 2, 4, 8, 5, 6],
        [9, 6, 1, 5, 3, 7, 2, 8, 4],
        [2, 8, 7, 4, 1, 9, 6, 3, 5],
        [3, 4, 5, 2, 8, 6, 1, 7, 9],
    ];

    fn all_ops() -> Arc<FunctionSet> {
        Arc::new(FunctionSet::all())
    }

    #[test]
    fn test_invalid_boards_are_rejected() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let rows: [[u8; 3]; 3] = [[0, 0, 0], [0, 0, 0], [0, 0, 0]];
        let err = BoardSolver::from_rows(&rows, 3, all_ops(), &mut rng).unwrap_err();
        assert_eq!(err, SolverError::Board(BoardError::NotPerfectSquare { size: 3 }));

        let ragged: [&[u8]; 4] = [&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0], &[0, 0, 0, 0]];
        let err = BoardSolver::from_rows(&ragged, 3, all_ops(), &mut rng).unwrap_err();
        assert!(matches!(err, SolverError::Board(BoardError::RaggedRow { row: 2, .. })));

        let err = BoardSolver::from_rows(&SOLVED_9X9, 0, all_ops(), &mut rng).unwrap_err();
        assert!(matches!(err, SolverError::Expr(_)));
    }

    #[test]
    fn test_valid_boards_are_accepted() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        for size in [1, 4, 9, 16] {
            let rows = vec![vec![0_u8; size]; size];
            let solver = BoardSolver::from_rows(&rows, 2, all_ops(), &mut rng).unwrap();
            assert_eq!(solver.original_empty_cells(), size * size);
        }
    }

    #[test]
    fn test_single_hole_is_solved() {
        let mut rng = Pcg64Mcg::seed_from_u64(9);
        for _ in 0..20 {
            let solver = BoardSolver::from_rows(
                &[[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 0]],
                3,
                all_ops(),
                &mut rng,
            )
            .unwrap();
            assert_eq!(solver.fitness(), 0);
            assert!(solver.is_ideal());
            assert_eq!(solver.working_board().get(3, 3), 1);
        }
    }

    #[test]
    fn test_solved_board_is_untouched() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let solver = BoardSolver::from_rows(&SOLVED_9X9, 4, all_ops(), &mut rng).unwrap();
        assert_eq!(solver.fitness(), 0);
        assert_eq!(solver.working_board(), solver.original_board());
    }

    #[test]
    fn test_conflicting_holes_leave_one_cell() {
        // (0, 0) and (0, 1) share a row and both can only take 5
        let mut rows = SOLVED_9X9;
        rows[0][0] = 0;
        rows[0][1] = 0;
        rows[3][1] = 3;
        let board = Board::from_rows(&rows).unwrap();
        for col in [0, 1] {
            assert!(board.is_legal(0, col, 5));
            assert!(!board.is_legal(0, col, 3));
        }

        let mut rng = Pcg64Mcg::seed_from_u64(6);
        for _ in 0..10 {
            let solver =
                BoardSolver::random(3, all_ops(), Arc::new(board.clone()), &mut rng).unwrap();
            assert_eq!(solver.fitness(), 1);
            assert_eq!(solver.solved_cells(), 1);
            let filled = [0, 1].map(|col| solver.working_board().get(0, col));
            assert!(filled == [5, 0] || filled == [0, 5], "unexpected fill {filled:?}");
        }
    }

    #[test]
    fn test_fitness_is_cached_and_reproducible() {
        let board = Arc::new(
            Board::from_rows(&[[1, 0, 0, 0], [0, 0, 3, 0], [0, 4, 0, 0], [0, 0, 0, 2]]).unwrap(),
        );
        let mut rng = Pcg64Mcg::seed_from_u64(12);
        let solver = BoardSolver::random(3, all_ops(), board, &mut rng).unwrap();
        assert!(!solver.is_evaluated());

        let fitness = solver.fitness();
        assert!(solver.is_evaluated());
        assert_eq!(solver.play().fitness, fitness);

        let copy = solver.clone();
        assert!(copy.is_evaluated());
        assert_eq!(copy.fitness(), fitness);

        let fresh = BoardSolver::new(solver.program().clone(), Arc::clone(&solver.original));
        assert_eq!(fresh.fitness(), fitness);
    }

    #[test]
    fn test_offspring_start_unevaluated() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let board = Arc::new(Board::from_rows(&SOLVED_9X9).unwrap());
        let a = BoardSolver::random(3, all_ops(), Arc::clone(&board), &mut rng).unwrap();
        let b = BoardSolver::random(3, all_ops(), board, &mut rng).unwrap();
        let _ = a.fitness();

        assert!(!a.mutate(&mut rng).is_evaluated());
        assert!(!a.crossover(&b, &mut rng).is_evaluated());
        assert!(!a.regenerate(&mut rng).is_evaluated());
        assert!(a.is_evaluated());
    }

    #[test]
    fn test_summary() {
        let mut rng = Pcg64Mcg::seed_from_u64(9);
        let solver = BoardSolver::from_rows(
            &[[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 0]],
            1,
            all_ops(),
            &mut rng,
        )
        .unwrap();
        let summary = solver.summary();
        assert!(summary.starts_with("Solve = 1 / 1\nLeft = 0\n\n1 2  3 4\n"));
        assert!(summary.contains(&format!("Prefix: {}\n", solver.program().to_prefix())));
        assert!(summary.ends_with(&format!("Infix: {}\n", solver.program().to_infix())));
    }
}
