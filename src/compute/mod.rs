//! Compute module - Chord catalogs and the evolutionary search.

mod chord;

pub mod evolution;
pub mod keys;

pub use chord::*;
pub use evolution::{Chromosome, ChromosomeRng, EvolutionEngine, FitnessEvaluator};
