//! Genetic search for chord accompaniments.
//!
//! # Overview
//!
//! A candidate accompaniment is a [`Chromosome`]: one chord per quarter-note
//! slot, every chord drawn from the key's [`Catalog`](crate::compute::Catalog).
//!
//! - **Genome Operations** (`genome`): random chromosomes, uniform crossover, mutation
//! - **Fitness** (`fitness`): interval and repetition scoring against the melody
//! - **Selection** (`selection`): fitness-proportionate choice of two parents
//! - **Population** (`population`): scored members and the replacement step
//! - **Search** (`search`): the generational loop
//!
//! # Example
//!
//! ```rust,no_run
//! use accompanist::schema::{EvolutionConfig, Key, Melody, PitchEvent};
//! use accompanist::compute::evolution::EvolutionEngine;
//!
//! let melody = Melody::new(vec![
//!     PitchEvent::note(0, 5, 1.0),
//!     PitchEvent::note(4, 5, 1.0),
//! ])?;
//! let key: Key = "C major".parse()?;
//!
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), key, 5, melody)?;
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.1}",
//!         progress.generation, progress.best_fitness);
//! })?;
//!
//! for chord in &result.best {
//!     println!("{chord}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod fitness;
mod genome;
mod population;
mod search;
mod selection;

pub use fitness::{
    EXACT_MATCH_REWARD, FitnessEvaluator, REPEAT_BONUS, ScoreBreakdown, interval_class,
    interval_reward, score, score_detailed,
};
pub use genome::{Chromosome, ChromosomeRng, chromosome_distance};
pub use population::Population;
pub use search::EvolutionEngine;
pub use selection::select_parents;
