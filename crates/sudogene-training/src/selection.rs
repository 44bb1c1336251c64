//! Reproduction strategies.

use rand::Rng;

use crate::{ConfigError, individual::Individual};

/// Produces the individuals of the next generation from the current one.
pub trait Selection {
    /// Reproduces the slot held by `parent`, drawing partners from `pool`.
    ///
    /// `pool` must be sorted by ascending fitness.
    fn reproduce<I, R>(&self, pool: &[I], parent: &I, rng: &mut R) -> I
    where
        I: Individual,
        R: Rng + ?Sized;

    /// Reproduces a slot with every parent drawn from `pool`.
    ///
    /// `pool` must be sorted by ascending fitness.
    fn reproduce_from_pool<I, R>(&self, pool: &[I], rng: &mut R) -> I
    where
        I: Individual,
        R: Rng + ?Sized;
}

/// Selection from the best part of the population.
///
/// Partners are drawn uniformly from the first `⌊len × good_population_percent⌋`
/// individuals of the sorted pool (at least one). A reproduced individual is crossed
/// with such a partner with probability `crossover_prob`, and the result is then mutated
/// with probability `mutation_prob`. If neither happens the parent is carried over
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TournamentSelection {
    mutation_prob: f64,
    crossover_prob: f64,
    good_population_percent: f64,
}

impl TournamentSelection {
    pub fn new(
        mutation_prob: f64,
        crossover_prob: f64,
        good_population_percent: f64,
    ) -> Result<Self, ConfigError> {
        check_probability("mutation probability", mutation_prob)?;
        check_probability("crossover probability", crossover_prob)?;
        if !(good_population_percent > 0.0 && good_population_percent <= 1.0) {
            return Err(ConfigError::GoodPopulationPercent(good_population_percent));
        }
        Ok(Self {
            mutation_prob,
            crossover_prob,
            good_population_percent,
        })
    }

    #[must_use]
    pub fn mutation_prob(&self) -> f64 {
        self.mutation_prob
    }

    #[must_use]
    pub fn crossover_prob(&self) -> f64 {
        self.crossover_prob
    }

    #[must_use]
    pub fn good_population_percent(&self) -> f64 {
        self.good_population_percent
    }

    /// Number of leading individuals of a pool of `len` eligible for selection.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn window_len(&self, len: usize) -> usize {
        let window = (len as f64 * self.good_population_percent).floor() as usize;
        window.clamp(1, len.max(1))
    }

    /// Draws an individual uniformly from the good window of `pool`.
    ///
    /// # Panics
    ///
    /// Panics if `pool` is empty.
    pub fn select<'a, I, R>(&self, pool: &'a [I], rng: &mut R) -> &'a I
    where
        R: Rng + ?Sized,
    {
        assert!(!pool.is_empty(), "selection pool must not be empty");
        &pool[rng.random_range(0..self.window_len(pool.len()))]
    }

    fn vary<I, R>(&self, pool: &[I], parent: &I, rng: &mut R) -> I
    where
        I: Individual,
        R: Rng + ?Sized,
    {
        let mut child = if rng.random_bool(self.crossover_prob) {
            let partner = self.select(pool, rng);
            parent.crossover(partner, rng)
        } else {
            parent.clone()
        };
        if rng.random_bool(self.mutation_prob) {
            child = child.mutate(rng);
        }
        child
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

impl Selection for TournamentSelection {
    fn reproduce<I, R>(&self, pool: &[I], parent: &I, rng: &mut R) -> I
    where
        I: Individual,
        R: Rng + ?Sized,
    {
        self.vary(pool, parent, rng)
    }

    fn reproduce_from_pool<I, R>(&self, pool: &[I], rng: &mut R) -> I
    where
        I: Individual,
        R: Rng + ?Sized,
    {
        let parent = self.select(pool, rng);
        self.vary(pool, parent, rng)
    }
}
