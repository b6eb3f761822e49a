//! Progress reporting and result types for the evolutionary search.

use serde::{Deserialize, Serialize};

use crate::compute::{Chord, Chromosome};

use super::Key;

/// Current phase of evolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Population not built yet.
    #[default]
    Initializing,
    /// Running generation steps.
    Evolving,
    /// All generations done.
    Done,
}

/// Per-generation statistics. Index 0 is the initial population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Members overwritten by offspring per generation.
    pub replacements: Vec<usize>,
}

impl EvolutionHistory {
    pub fn record(&mut self, best: f64, avg: f64, replacements: usize) {
        self.best_fitness.push(best);
        self.avg_fitness.push(avg);
        self.replacements.push(replacements);
    }

    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Snapshot handed to progress callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Completed generation steps.
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Best fitness in the current population.
    pub best_fitness: f64,
    /// Average fitness of current population.
    pub avg_fitness: f64,
    /// Members replaced in the latest step.
    pub replacements: usize,
    pub phase: EvolutionPhase,
}

/// Summary statistics for a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generation steps run.
    pub generations: usize,
    /// Chromosomes scored, initial population included.
    pub total_evaluations: u64,
    /// Best fitness of the initial population.
    pub initial_best_fitness: f64,
    /// Best fitness achieved.
    pub best_fitness: f64,
    /// Average fitness of final population.
    pub final_avg_fitness: f64,
    /// Mean number of slots where a final member differs from the best one.
    pub final_diversity: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

/// Outcome of a run: the best accompaniment found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    pub best: Chromosome,
    pub best_fitness: f64,
    pub stats: EvolutionStats,
    pub history: EvolutionHistory,
}

/// One harmonic slot of a rendered accompaniment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccompanimentSlot {
    /// Slot index, one per quarter-note.
    pub beat: usize,
    /// Chord name such as `"F#dim"`.
    pub name: String,
    /// Tone names low to high in construction order, e.g. `["C4", "E4", "G4"]`.
    pub tones: Vec<String>,
    pub chord: Chord,
}

/// Chord progression ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accompaniment {
    pub key: Key,
    /// Octave the catalog was built for; chord tones sit one below it.
    pub register: i32,
    pub fitness: f64,
    pub slots: Vec<AccompanimentSlot>,
}

impl Accompaniment {
    pub fn new(key: Key, register: i32, best: &Chromosome, fitness: f64) -> Self {
        let slots = best
            .iter()
            .enumerate()
            .map(|(beat, chord)| AccompanimentSlot {
                beat,
                name: chord.name(),
                tones: chord.tones().iter().map(ToString::to_string).collect(),
                chord: *chord,
            })
            .collect();

        Self {
            key,
            register,
            fitness,
            slots,
        }
    }

    pub fn from_result(key: Key, register: i32, result: &EvolutionResult) -> Self {
        Self::new(key, register, &result.best, result.best_fitness)
    }

    /// The chords in slot order.
    pub fn chords(&self) -> impl Iterator<Item = Chord> + '_ {
        self.slots.iter().map(|slot| slot.chord)
    }
}
