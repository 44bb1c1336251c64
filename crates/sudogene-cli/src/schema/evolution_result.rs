use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sudogene_engine::Board;
use sudogene_training::{
    board_solver::BoardSolver, evolution::EvolutionOutcome, individual::Individual,
};

/// Final result of an `evolve` run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvolutionResult {
    pub puzzle_index: usize,
    pub solved: bool,
    pub generation: usize,
    pub best_fitness: usize,
    pub original_empty_cells: usize,
    pub prefix: String,
    pub infix: String,
    pub final_board: Board,
    pub finished_at: DateTime<Utc>,
}

impl EvolutionResult {
    pub fn new(
        puzzle_index: usize,
        outcome: &EvolutionOutcome<BoardSolver>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let best = &outcome.best;
        Self {
            puzzle_index,
            solved: outcome.solved,
            generation: outcome.generation,
            best_fitness: best.fitness(),
            original_empty_cells: best.original_empty_cells(),
            prefix: best.program().to_prefix(),
            infix: best.program().to_infix(),
            final_board: best.working_board().clone(),
            finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;
    use sudogene_evaluator::function_set::FunctionSet;

    use super::*;

    #[test]
    fn test_from_solved_outcome() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let best = BoardSolver::from_rows(
            &[[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 0]],
            2,
            Arc::new(FunctionSet::all()),
            &mut rng,
        )
        .unwrap();
        let outcome = EvolutionOutcome {
            solved: true,
            generation: 0,
            best,
        };
        let result = EvolutionResult::new(3, &outcome, DateTime::UNIX_EPOCH);
        assert_eq!(result.puzzle_index, 3);
        assert!(result.solved);
        assert_eq!(result.best_fitness, 0);
        assert_eq!(result.original_empty_cells, 1);
        assert!(result.final_board.is_solved());
        assert_eq!(result.prefix, outcome.best.program().to_prefix());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["final_board"][3], serde_json::json!([4, 3, 2, 1]));
        assert_eq!(json["finished_at"], "1970-01-01T00:00:00Z");

        let parsed: EvolutionResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.final_board, result.final_board);
    }
}
