//! Configuration types for the evolutionary harmonizer.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Search hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of chromosomes kept across generations.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Offspring produced per generation, as a percentage (0-100) of the population.
    #[serde(default = "default_offspring_percentage")]
    pub offspring_percentage: f64,
    /// Number of generation steps.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Per-slot probability of replacing a chord during mutation.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// How offspring displace existing members.
    #[serde(default)]
    pub replacement: ReplacementPolicy,
    /// What parent selection does when every weight is zero.
    #[serde(default)]
    pub degenerate_selection: DegenerateSelection,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            offspring_percentage: default_offspring_percentage(),
            generations: default_generations(),
            mutation_rate: default_mutation_rate(),
            replacement: ReplacementPolicy::default(),
            degenerate_selection: DegenerateSelection::default(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    200
}
fn default_offspring_percentage() -> f64 {
    10.0
}
fn default_generations() -> usize {
    5000
}
fn default_mutation_rate() -> f64 {
    0.1
}

/// Generational replacement rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ReplacementPolicy {
    /// Children (weakest first) are compared against a single position of the
    /// ascending population that starts at 0 and is never advanced, so only
    /// the weakest member is ever overwritten in a generation.
    #[default]
    Legacy,
    /// Children (strongest first) overwrite successive weakest members; the
    /// position advances after each overwrite.
    AdvanceOnReplace,
}

/// Fallback for fitness-proportionate selection over all-zero weights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DegenerateSelection {
    /// Fail with `HarmonyError::DegeneratePopulation`.
    #[default]
    Fail,
    /// Draw uniformly instead.
    Uniform,
}

impl EvolutionConfig {
    /// Children produced per generation: `floor(population * percentage / 100)`.
    pub fn offspring_count(&self) -> usize {
        (self.population_size as f64 * self.offspring_percentage / 100.0).floor() as usize
    }

    /// Validate hyperparameters.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.population_size < 2 {
            return Err(InputError::PopulationTooSmall(self.population_size));
        }
        if !(0.0..=100.0).contains(&self.offspring_percentage) {
            return Err(InputError::InvalidOffspringPercentage(
                self.offspring_percentage,
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(InputError::InvalidMutationRate(self.mutation_rate));
        }
        Ok(())
    }
}
