//! The generational loop.
//!
//! Each generation is reported to an [`EvolutionObserver`] before the loop checks for an
//! ideal individual, so the solving generation is always reported. The loop stops at the
//! first generation whose best individual is ideal, or after `max_generations`
//! generations have been reported.

use std::convert::Infallible;

use log::info;
use rand::Rng;
use sudogene_stats::descriptive::DescriptiveStats;

use crate::{individual::Individual, population::Population, selection::Selection};

/// Summary of one generation, handed to observers.
#[derive(Debug)]
pub struct GenerationReport<'a, I> {
    pub generation: usize,
    pub best: &'a I,
    pub worst: &'a I,
    pub average_fitness: f64,
    pub fitness_stats: DescriptiveStats,
    pub population_size: usize,
}

impl<'a, I> GenerationReport<'a, I>
where
    I: Individual,
{
    #[must_use]
    pub fn new(generation: usize, population: &'a Population<I>) -> Self {
        Self {
            generation,
            best: population.best(),
            worst: population.worst(),
            average_fitness: population.average_fitness(),
            fitness_stats: population.fitness_stats(),
            population_size: population.len(),
        }
    }
}

/// The result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome<I> {
    /// Whether the best individual reached the ideal fitness.
    pub solved: bool,
    /// Generation the loop stopped at: the solving generation or `max_generations`.
    pub generation: usize,
    pub best: I,
}

/// Receives progress from [`Evolution::run`].
///
/// An error returned by an observer aborts the run.
pub trait EvolutionObserver<I> {
    type Error;

    fn on_generation(&mut self, report: &GenerationReport<'_, I>) -> Result<(), Self::Error>;

    fn on_finish(&mut self, _outcome: &EvolutionOutcome<I>) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<I> EvolutionObserver<I> for () {
    type Error = Infallible;

    fn on_generation(&mut self, _report: &GenerationReport<'_, I>) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<I, O> EvolutionObserver<I> for Option<O>
where
    O: EvolutionObserver<I>,
{
    type Error = O::Error;

    fn on_generation(&mut self, report: &GenerationReport<'_, I>) -> Result<(), Self::Error> {
        match self {
            Some(observer) => observer.on_generation(report),
            None => Ok(()),
        }
    }

    fn on_finish(&mut self, outcome: &EvolutionOutcome<I>) -> Result<(), Self::Error> {
        match self {
            Some(observer) => observer.on_finish(outcome),
            None => Ok(()),
        }
    }
}

impl<I, A, B> EvolutionObserver<I> for (A, B)
where
    A: EvolutionObserver<I>,
    B: EvolutionObserver<I, Error = A::Error>,
{
    type Error = A::Error;

    fn on_generation(&mut self, report: &GenerationReport<'_, I>) -> Result<(), Self::Error> {
        self.0.on_generation(report)?;
        self.1.on_generation(report)
    }

    fn on_finish(&mut self, outcome: &EvolutionOutcome<I>) -> Result<(), Self::Error> {
        self.0.on_finish(outcome)?;
        self.1.on_finish(outcome)
    }
}

/// Drives a population through generations until it solves its task.
#[derive(Debug)]
pub struct Evolution<I, S> {
    population: Population<I>,
    selection: S,
    max_generations: usize,
}

impl<I, S> Evolution<I, S>
where
    I: Individual,
    S: Selection,
{
    #[must_use]
    pub fn new(population: Population<I>, selection: S, max_generations: usize) -> Self {
        Self {
            population,
            selection,
            max_generations,
        }
    }

    #[must_use]
    pub fn population(&self) -> &Population<I> {
        &self.population
    }

    #[must_use]
    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    /// Runs the loop to completion.
    pub fn run<R, O>(
        mut self,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<EvolutionOutcome<I>, O::Error>
    where
        R: Rng + ?Sized,
        O: EvolutionObserver<I> + ?Sized,
    {
        let mut generation = 0;
        while generation < self.max_generations {
            let report = GenerationReport::new(generation, &self.population);
            info!(
                "generation {generation}: best {}, worst {}, average {:.2}, median {:.1}, std-dev {:.3}",
                report.best.fitness(),
                report.worst.fitness(),
                report.average_fitness,
                report.fitness_stats.median,
                report.fitness_stats.std_dev
            );
            observer.on_generation(&report)?;

            if self.population.best().is_ideal() {
                break;
            }
            self.population = self.population.next_generation(&self.selection, rng);
            generation += 1;
        }

        let best = self.population.best().clone();
        let outcome = EvolutionOutcome {
            solved: best.is_ideal(),
            generation,
            best,
        };
        if outcome.solved {
            info!("solved at generation {generation}");
        } else {
            info!(
                "no solution after {generation} generations, best fitness {}",
                outcome.best.fitness()
            );
        }
        observer.on_finish(&outcome)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;
    use sudogene_engine::Board;
    use sudogene_evaluator::function_set::FunctionSet;

    use super::*;
    use crate::{board_solver::BoardSolver, selection::TournamentSelection};

    #[derive(Debug, Default)]
    struct Recorder {
        generations: Vec<(usize, usize, usize)>,
        finished: Option<(bool, usize)>,
    }

    impl EvolutionObserver<BoardSolver> for Recorder {
        type Error = Infallible;

        fn on_generation(
            &mut self,
            report: &GenerationReport<'_, BoardSolver>,
        ) -> Result<(), Self::Error> {
            self.generations.push((
                report.generation,
                report.best.fitness(),
                report.worst.fitness(),
            ));
            Ok(())
        }

        fn on_finish(
            &mut self,
            outcome: &EvolutionOutcome<BoardSolver>,
        ) -> Result<(), Self::Error> {
            self.finished = Some((outcome.solved, outcome.generation));
            Ok(())
        }
    }

    struct FailOnSecond;

    impl EvolutionObserver<BoardSolver> for FailOnSecond {
        type Error = String;

        fn on_generation(
            &mut self,
            report: &GenerationReport<'_, BoardSolver>,
        ) -> Result<(), Self::Error> {
            if report.generation == 1 {
                return Err("disk full".to_owned());
            }
            Ok(())
        }
    }

    fn population(
        rows: &[[u8; 4]; 4],
        size: usize,
        rng: &mut Pcg64Mcg,
    ) -> Population<BoardSolver> {
        let board = Arc::new(Board::from_rows(rows).unwrap());
        let prototype = BoardSolver::random(2, Arc::new(FunctionSet::all()), board, rng).unwrap();
        Population::random(size, &prototype, rng)
    }

    fn selection() -> TournamentSelection {
        TournamentSelection::new(0.3, 0.7, 0.4).unwrap()
    }

    #[test]
    fn test_solved_board_stops_at_first_generation() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let rows = [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 0]];
        let evolution = Evolution::new(population(&rows, 10, &mut rng), selection(), 50);

        let mut recorder = Recorder::default();
        let outcome = evolution.run(&mut rng, &mut recorder).unwrap();
        assert!(outcome.solved);
        assert_eq!(outcome.generation, 0);
        assert_eq!(recorder.generations, [(0, 0, 0)]);
        assert_eq!(recorder.finished, Some((true, 0)));
    }

    #[test]
    fn test_unsolvable_board_runs_all_generations() {
        // (0, 0) can never be filled: its row holds {2, 3} and its column {4, 1}
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let rows = [[0, 2, 3, 0], [4, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0]];
        let evolution = Evolution::new(population(&rows, 10, &mut rng), selection(), 4);

        let mut recorder = Recorder::default();
        let outcome = evolution.run(&mut rng, &mut recorder).unwrap();
        assert!(!outcome.solved);
        assert_eq!(outcome.generation, 4);
        assert!(outcome.best.fitness() >= 1);
        let indices = recorder.generations.iter().map(|g| g.0).collect::<Vec<_>>();
        assert_eq!(indices, [0, 1, 2, 3]);
        assert!(recorder.generations.iter().all(|&(_, best, worst)| best <= worst));
        assert_eq!(recorder.finished, Some((false, 4)));
    }

    #[test]
    fn test_zero_generations_reports_nothing() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let rows = [[1, 0, 0, 0], [0, 0, 3, 0], [0, 4, 0, 0], [0, 0, 0, 2]];
        let evolution = Evolution::new(population(&rows, 5, &mut rng), selection(), 0);
        let expected_best = evolution.population().best().fitness();

        let mut recorder = Recorder::default();
        let outcome = evolution.run(&mut rng, &mut recorder).unwrap();
        assert_eq!(outcome.generation, 0);
        assert_eq!(outcome.best.fitness(), expected_best);
        assert!(recorder.generations.is_empty());
        assert!(recorder.finished.is_some());
    }

    #[test]
    fn test_observer_error_aborts_run() {
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        let rows = [[0, 2, 3, 0], [4, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0]];
        let evolution = Evolution::new(population(&rows, 5, &mut rng), selection(), 10);
        let err = evolution.run(&mut rng, &mut FailOnSecond).unwrap_err();
        assert_eq!(err, "disk full");
    }

    #[test]
    fn test_optional_observer() {
        let rows = [[0, 2, 3, 0], [4, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0]];

        let mut rng = Pcg64Mcg::seed_from_u64(5);
        let evolution = Evolution::new(population(&rows, 5, &mut rng), selection(), 2);
        let mut observer = Some(Recorder::default());
        evolution.run(&mut rng, &mut observer).unwrap();
        let recorder = observer.unwrap();
        assert_eq!(recorder.generations.len(), 2);
        assert_eq!(recorder.finished, Some((false, 2)));

        let evolution = Evolution::new(population(&rows, 5, &mut rng), selection(), 2);
        let mut observer: Option<FailOnSecond> = None;
        assert!(evolution.run(&mut rng, &mut observer).is_ok());
    }

    #[test]
    fn test_pair_observer_feeds_both() {
        let mut rng = Pcg64Mcg::seed_from_u64(6);
        let rows = [[0, 2, 3, 0], [4, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0]];
        let evolution = Evolution::new(population(&rows, 5, &mut rng), selection(), 3);
        assert_eq!(evolution.max_generations(), 3);

        let mut pair = (Recorder::default(), Recorder::default());
        evolution.run(&mut rng, &mut pair).unwrap();
        assert_eq!(pair.0.generations.len(), 3);
        assert_eq!(pair.0.generations, pair.1.generations);
        assert_eq!(pair.0.finished, Some((false, 3)));
        assert_eq!(pair.1.finished, Some((false, 3)));
    }

    #[test]
    fn test_report_stats_match_population() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let rows = [[1, 0, 0, 0], [0, 0, 3, 0], [0, 4, 0, 0], [0, 0, 0, 2]];
        let population = population(&rows, 8, &mut rng);
        let report = GenerationReport::new(0, &population);
        let stats = report.fitness_stats;
        assert_eq!(stats.count, 8);
        assert_eq!(stats.min, report.best.fitness() as f64);
        assert_eq!(stats.max, report.worst.fitness() as f64);
        assert!((stats.mean - report.average_fitness).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let rows = [[1, 0, 0, 0], [0, 0, 3, 0], [0, 4, 0, 0], [0, 0, 0, 2]];
        let run = |seed| {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let evolution = Evolution::new(population(&rows, 10, &mut rng), selection(), 5);
            let outcome = evolution.run(&mut rng, &mut ()).unwrap();
            (
                outcome.solved,
                outcome.generation,
                outcome.best.program().to_prefix(),
            )
        };
        assert_eq!(run(42), run(42));
    }
}
