//! Populations of individuals, kept sorted by fitness.

use rand::Rng;
use sudogene_stats::descriptive::DescriptiveStats;

use crate::{individual::Individual, selection::Selection};

/// A fixed-size generation of individuals sorted by ascending fitness (best first).
///
/// Building a population evaluates every individual that has not been played yet.
/// Individuals with equal fitness keep their relative order.
#[derive(Debug, Clone)]
pub struct Population<I> {
    individuals: Vec<I>,
}

impl<I> Population<I>
where
    I: Individual,
{
    /// Sorts `individuals` into a population.
    ///
    /// # Panics
    ///
    /// Panics if `individuals` is empty.
    #[must_use]
    pub fn new(mut individuals: Vec<I>) -> Self {
        assert!(!individuals.is_empty(), "population must not be empty");
        individuals.sort_by_key(Individual::fitness);
        Self { individuals }
    }

    /// Creates `size` individuals, each regenerated from `prototype`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn random<R>(size: usize, prototype: &I, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..size).map(|_| prototype.regenerate(rng)).collect();
        Self::new(individuals)
    }

    #[must_use]
    pub fn individuals(&self) -> &[I] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[must_use]
    pub fn best(&self) -> &I {
        &self.individuals[0]
    }

    #[must_use]
    pub fn worst(&self) -> &I {
        &self.individuals[self.individuals.len() - 1]
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average_fitness(&self) -> f64 {
        let sum = self.individuals.iter().map(Individual::fitness).sum::<usize>();
        sum as f64 / self.individuals.len() as f64
    }

    /// Computes descriptive statistics for fitness across all individuals.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fitness_stats(&self) -> DescriptiveStats {
        let sorted = self
            .individuals
            .iter()
            .map(|ind| ind.fitness() as f64)
            .collect::<Vec<_>>();
        DescriptiveStats::from_sorted(&sorted).expect("population is never empty")
    }

    /// Builds the next generation.
    ///
    /// Every slot is reproduced from the individual currently holding it, in index order,
    /// then the new individuals are sorted.
    #[must_use]
    pub fn next_generation<S, R>(&self, selection: &S, rng: &mut R) -> Self
    where
        S: Selection,
        R: Rng + ?Sized,
    {
        let next = self
            .individuals
            .iter()
            .map(|parent| selection.reproduce(&self.individuals, parent, rng))
            .collect();
        Self::new(next)
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

    fn prototype(rng: &mut Pcg64Mcg) -> BoardSolver {
        let board =
            Board::from_rows(&[[1, 0, 0, 0], [0, 0, 3, 0], [0, 4, 0, 0], [0, 0, 0, 2]]).unwrap();
        BoardSolver::random(3, Arc::new(FunctionSet::all()), Arc::new(board), rng).unwrap()
    }

    #[test]
    fn test_random_population_is_sorted() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let population = Population::random(30, &prototype(&mut rng), &mut rng);
        assert_eq!(population.len(), 30);
        assert!(
            population
                .individuals()
                .is_sorted_by_key(Individual::fitness)
        );
        assert!(population.best().fitness() <= population.worst().fitness());
        assert!(population.individuals().iter().all(BoardSolver::is_evaluated));
    }

    #[test]
    fn test_average_and_stats() {
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        let population = Population::random(12, &prototype(&mut rng), &mut rng);
        let stats = population.fitness_stats();
        assert_eq!(stats.count, 12);
        assert_eq!(stats.mean, population.average_fitness());
        assert_eq!(stats.min, population.best().fitness() as f64);
        assert_eq!(stats.max, population.worst().fitness() as f64);
    }

    #[test]
    fn test_next_generation_keeps_size_and_order() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let selection = TournamentSelection::new(0.3, 0.7, 0.4).unwrap();
        let mut population = Population::random(20, &prototype(&mut rng), &mut rng);
        for _ in 0..5 {
            population = population.next_generation(&selection, &mut rng);
            assert_eq!(population.len(), 20);
            assert!(
                population
                    .individuals()
                    .is_sorted_by_key(Individual::fitness)
            );
            for ind in population.individuals() {
                assert_eq!(ind.program().height(), ind.program().tree().height());
            }
        }
    }

    #[test]
    fn test_without_variation_generation_is_a_copy() {
        let mut rng = Pcg64Mcg::seed_from_u64(4);
        let selection = TournamentSelection::new(0.0, 0.0, 0.4).unwrap();
        let population = Population::random(8, &prototype(&mut rng), &mut rng);
        let next = population.next_generation(&selection, &mut rng);
        let programs = |p: &Population<BoardSolver>| {
            p.individuals()
                .iter()
                .map(|ind| ind.program().to_prefix())
                .collect::<Vec<_>>()
        };
        assert_eq!(programs(&next), programs(&population));
    }

    #[test]
    #[should_panic(expected = "population must not be empty")]
    fn test_empty_population_panics() {
        let _ = Population::<BoardSolver>::new(vec![]);
    }
}
