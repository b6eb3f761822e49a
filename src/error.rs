//! Error types for the harmonization core.

use crate::schema::Mode;

/// Failures surfaced by the catalog, population, evaluation and search stages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarmonyError {
    #[error("Unknown key: root pitch class {root} ({mode:?}) is not in the key table")]
    InvalidKey { root: u8, mode: Mode },
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("All fitness values are zero; fitness-proportionate selection is undefined")]
    DegeneratePopulation,
}

/// Rejected melodies, parameters and chromosomes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Melody contains no events")]
    EmptyMelody,
    #[error("Melody contains no pitched events")]
    NoPitchedEvents,
    #[error("Event {index} has invalid duration {duration} (must be positive and finite)")]
    InvalidDuration { index: usize, duration: f64 },
    #[error("Event {index} has pitch class {pitch_class} (must be 0-11)")]
    InvalidPitchClass { index: usize, pitch_class: u8 },
    #[error("Register {0} is out of range")]
    InvalidRegister(i32),
    #[error("Harmonic slot count must be non-zero")]
    ZeroSlots,
    #[error("Chord catalog is empty")]
    EmptyCatalog,
    #[error("Population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("Offspring percentage must be within 0-100, got {0}")]
    InvalidOffspringPercentage(f64),
    #[error("Mutation rate must be within 0-1, got {0}")]
    InvalidMutationRate(f64),
    #[error("Chromosome has {actual} slots but the melody needs {required}")]
    ChromosomeTooShort { required: usize, actual: usize },
    #[error("Parents differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("Fitness vector has {fitness} entries for {chromosomes} chromosomes")]
    FitnessMismatch { chromosomes: usize, fitness: usize },
}

pub type Result<T> = std::result::Result<T, HarmonyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_converts() {
        let err: HarmonyError = InputError::ZeroSlots.into();
        assert_eq!(err, HarmonyError::InvalidInput(InputError::ZeroSlots));
        assert!(err.to_string().contains("non-zero"));
    }
}
