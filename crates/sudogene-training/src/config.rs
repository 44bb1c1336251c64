//! Experiment parameters.

use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use sudogene_evaluator::{
    ExprError, function_set::FunctionSet, primitive::PrimitiveOp, terminal::TerminalOp,
};

use crate::{ConfigError, selection::TournamentSelection};

/// Parameters of one evolution run.
///
/// Missing fields take their default values when deserialized, so a config file only
/// needs the fields it changes:
///
/// ```
/// use sudogene_training::config::ExperimentConfig;
///
/// let config: ExperimentConfig = serde_json::from_str(r#"{ "tree_height": 3 }"#)?;
/// assert_eq!(config.tree_height, 3);
/// assert_eq!(config.population_size, 100);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Height of every program in the initial population.
    pub tree_height: usize,
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_prob: f64,
    pub crossover_prob: f64,
    /// Fraction of the sorted population partners are drawn from.
    pub good_population_percent: f64,
    /// Seed for the random source; `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Terminal names programs may use.
    pub terminals: Vec<String>,
    /// Primitive names programs may use.
    pub primitives: Vec<String>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            tree_height: 5,
            population_size: 100,
            max_generations: 100,
            mutation_prob: 0.3,
            crossover_prob: 0.7,
            good_population_percent: 0.4,
            seed: None,
            terminals: TerminalOp::ALL.iter().map(|op| op.name().to_owned()).collect(),
            primitives: PrimitiveOp::ALL.iter().map(|op| op.name().to_owned()).collect(),
        }
    }
}

impl ExperimentConfig {
    /// Checks the numeric parameters.
    ///
    /// Operation names are checked by [`Self::function_set`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree_height < 1 {
            return Err(ConfigError::TreeHeight(self.tree_height));
        }
        if self.population_size < 1 {
            return Err(ConfigError::EmptyPopulation);
        }
        self.selection()?;
        Ok(())
    }

    /// Parses the configured operation names.
    pub fn function_set(&self) -> Result<FunctionSet, ExprError> {
        FunctionSet::from_names(&self.terminals, &self.primitives)
    }

    pub fn selection(&self) -> Result<TournamentSelection, ConfigError> {
        TournamentSelection::new(
            self.mutation_prob,
            self.crossover_prob,
            self.good_population_percent,
        )
    }

    /// Creates the random source for a run.
    #[must_use]
    pub fn rng(&self) -> Pcg64Mcg {
        match self.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_rng(&mut rand::rng()),
        }
    }
}
