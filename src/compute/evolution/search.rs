//! Generational search over chord progressions.

use std::time::Instant;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::compute::Catalog;
use crate::error::{InputError, Result};
use crate::schema::{
    EvolutionConfig, EvolutionHistory, EvolutionPhase, EvolutionProgress, EvolutionResult,
    EvolutionStats, Key, Melody,
};

use super::fitness::FitnessEvaluator;
use super::genome::{Chromosome, ChromosomeRng, chromosome_distance};
use super::population::Population;
use super::selection::select_parents;

/// Evolution engine that runs the search.
///
/// `run` goes through initialization, `config.generations` generation steps,
/// and returns the highest-fitness chromosome of the final population.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    catalog: Catalog,
    evaluator: FitnessEvaluator,
    rng: ChromosomeRng,
    population: Population,
    history: EvolutionHistory,
    generation: usize,
    last_replacements: usize,
    evaluations: u64,
    phase: EvolutionPhase,
}

impl EvolutionEngine {
    /// Create an engine for `melody` in `key`, with chords at `register`.
    ///
    /// Validates the configuration and the melody and builds the catalog once.
    pub fn new(config: EvolutionConfig, key: Key, register: i32, melody: Melody) -> Result<Self> {
        config.validate()?;
        let evaluator = FitnessEvaluator::new(melody)?;
        if evaluator.slot_count() == 0 {
            return Err(InputError::ZeroSlots.into());
        }
        let catalog = Catalog::generate(key, register)?;
        if catalog.is_empty() {
            return Err(InputError::EmptyCatalog.into());
        }

        let rng = match config.random_seed {
            Some(seed) => ChromosomeRng::new(seed),
            None => ChromosomeRng::random(),
        };

        Ok(Self {
            config,
            catalog,
            evaluator,
            rng,
            population: Population::default(),
            history: EvolutionHistory::default(),
            generation: 0,
            last_replacements: 0,
            evaluations: 0,
            phase: EvolutionPhase::Initializing,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Build and score a fresh random population.
    pub fn initialize(&mut self) -> Result<()> {
        let chromosomes = self.rng.random_population(
            self.config.population_size,
            self.evaluator.slot_count(),
            &self.catalog,
        )?;
        let fitness = self.evaluate_batch(&chromosomes)?;

        self.population = Population::new(chromosomes, fitness)?;
        self.generation = 0;
        self.last_replacements = 0;
        self.evaluations = self.population.len() as u64;
        self.history = EvolutionHistory::default();
        self.history.record(
            self.population.best_fitness(),
            self.population.mean_fitness(),
            0,
        );
        self.phase = EvolutionPhase::Evolving;

        log::debug!(
            "Initial population: best {:.1}, avg {:.1}",
            self.population.best_fitness(),
            self.population.mean_fitness()
        );
        Ok(())
    }

    /// Score chromosomes, preserving order.
    #[cfg(not(target_arch = "wasm32"))]
    fn evaluate_batch(&self, chromosomes: &[Chromosome]) -> Result<Vec<f64>> {
        let evaluator = &self.evaluator;

        // Parallel evaluation
        chromosomes
            .par_iter()
            .map(|chromosome| evaluator.score(chromosome))
            .collect()
    }

    #[cfg(target_arch = "wasm32")]
    fn evaluate_batch(&self, chromosomes: &[Chromosome]) -> Result<Vec<f64>> {
        // Sequential evaluation for WASM
        chromosomes
            .iter()
            .map(|chromosome| self.evaluator.score(chromosome))
            .collect()
    }

    /// Breed, score and merge one batch of offspring. Returns the number of
    /// population members replaced.
    pub fn step_generation(&mut self) -> Result<usize> {
        if self.population.is_empty() {
            self.initialize()?;
        }

        let offspring = self.config.offspring_count();
        let mut children = Vec::with_capacity(offspring);
        for _ in 0..offspring {
            let (first, second) = select_parents(
                self.population.fitness(),
                &mut self.rng,
                self.config.degenerate_selection,
            )?;
            let parents = self.population.chromosomes();
            let mut child = self.rng.crossover(&parents[first], &parents[second])?;
            self.rng
                .mutate(&mut child, &self.catalog, self.config.mutation_rate)?;
            children.push(child);
        }

        let fitness = self.evaluate_batch(&children)?;
        self.evaluations += children.len() as u64;
        let replaced = self
            .population
            .absorb(Population::new(children, fitness)?, self.config.replacement);

        self.generation += 1;
        self.last_replacements = replaced;
        self.history.record(
            self.population.best_fitness(),
            self.population.mean_fitness(),
            replaced,
        );

        log::debug!(
            "Generation {}: best {:.1}, avg {:.1}, replaced {}",
            self.generation,
            self.population.best_fitness(),
            self.population.mean_fitness(),
            replaced
        );
        Ok(replaced)
    }

    /// Get current progress.
    pub fn progress(&self) -> EvolutionProgress {
        let best_fitness = if self.population.is_empty() {
            0.0
        } else {
            self.population.best_fitness()
        };

        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.generations,
            best_fitness,
            avg_fitness: self.population.mean_fitness(),
            replacements: self.last_replacements,
            phase: self.phase,
        }
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, callback: F) -> Result<EvolutionResult>
    where
        F: Fn(&EvolutionProgress),
    {
        let start_time = Instant::now();

        log::info!(
            "Harmonizing {} slots in {} at register {} ({} catalog chords)",
            self.evaluator.slot_count(),
            self.catalog.key(),
            self.catalog.register(),
            self.catalog.len()
        );
        log::info!(
            "Population {}, {} offspring/generation, {} generations",
            self.config.population_size,
            self.config.offspring_count(),
            self.config.generations
        );

        self.initialize()?;
        let initial_best_fitness = self.population.best_fitness();
        callback(&self.progress());

        while self.generation < self.config.generations {
            self.step_generation()?;
            callback(&self.progress());
        }
        self.phase = EvolutionPhase::Done;

        let (best, best_fitness) = self
            .population
            .clone()
            .into_best()
            .ok_or(InputError::PopulationTooSmall(0))?;

        let final_diversity = self
            .population
            .chromosomes()
            .iter()
            .map(|c| chromosome_distance(c, &best) as f64)
            .sum::<f64>()
            / self.population.len() as f64;

        let elapsed = start_time.elapsed().as_secs_f64();
        let stats = EvolutionStats {
            generations: self.generation,
            total_evaluations: self.evaluations,
            initial_best_fitness,
            best_fitness,
            final_avg_fitness: self.population.mean_fitness(),
            final_diversity,
            elapsed_seconds: elapsed,
            evaluations_per_second: self.evaluations as f64 / elapsed.max(f64::EPSILON),
        };

        log::info!(
            "Evolution finished after {} generations: best fitness {:.1} (initial {:.1}), {:.2}s",
            stats.generations,
            best_fitness,
            initial_best_fitness,
            elapsed
        );
        callback(&self.progress());

        Ok(EvolutionResult {
            best,
            best_fitness,
            stats,
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult> {
        self.run_with_callback(|_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonyError;
    use crate::compute::{Chord, ChordQuality};
    use crate::schema::{PitchEvent, ReplacementPolicy};

    fn scale_melody() -> Melody {
        Melody::new(vec![
            PitchEvent::note(0, 5, 1.0),
            PitchEvent::note(4, 5, 1.0),
            PitchEvent::note(7, 5, 2.0),
        ])
        .unwrap()
    }

    fn small_config(generations: usize) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 20,
            offspring_percentage: 20.0,
            generations,
            random_seed: Some(42),
            ..Default::default()
        }
    }

    fn c_major() -> Key {
        Key::major(0).unwrap()
    }

    #[test]
    fn test_evolution_engine_creation() {
        let mut engine =
            EvolutionEngine::new(small_config(5), c_major(), 5, scale_melody()).unwrap();
        engine.initialize().unwrap();

        assert_eq!(engine.population().len(), 20);
        assert!(engine.population().chromosomes().iter().all(|c| c.len() == 4));
        assert_eq!(engine.catalog().register(), 5);
    }

    #[test]
    fn test_evolution_run() {
        let mut engine =
            EvolutionEngine::new(small_config(30), c_major(), 5, scale_melody()).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.generations, 30);
        assert_eq!(result.best.len(), 4);
        assert_eq!(result.history.len(), 31);
        assert_eq!(result.stats.total_evaluations, 20 + 30 * 4);
        assert!(result.best_fitness >= result.stats.initial_best_fitness);
        assert!(result.best.iter().all(|c| engine.catalog().contains(c)));
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let mut engine =
            EvolutionEngine::new(small_config(0), c_major(), 5, scale_melody()).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.generations, 0);
        assert_eq!(result.best_fitness, result.stats.initial_best_fitness);
        let initial_max = engine
            .population()
            .fitness()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.best_fitness, initial_max);
        assert_eq!(engine.evaluator().score(&result.best).unwrap(), initial_max);
    }

    #[test]
    fn test_best_fitness_never_decreases() {
        for replacement in [ReplacementPolicy::Legacy, ReplacementPolicy::AdvanceOnReplace] {
            let config = EvolutionConfig {
                replacement,
                ..small_config(40)
            };
            let mut engine = EvolutionEngine::new(config, c_major(), 5, scale_melody()).unwrap();
            let result = engine.run().unwrap();
            for pair in result.history.best_fitness.windows(2) {
                assert!(pair[1] >= pair[0]);
            }
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let run = || {
            EvolutionEngine::new(small_config(15), c_major(), 5, scale_melody())
                .unwrap()
                .run()
                .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.best, b.best);
        assert_eq!(a.history.best_fitness, b.history.best_fitness);
    }

    #[test]
    fn test_finds_chord_holding_both_notes() {
        let melody =
            Melody::new(vec![PitchEvent::note(0, 5, 0.5), PitchEvent::note(4, 5, 0.5)]).unwrap();
        let config = EvolutionConfig {
            population_size: 60,
            offspring_percentage: 10.0,
            generations: 100,
            random_seed: Some(7),
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(config, c_major(), 5, melody).unwrap();
        let result = engine.run().unwrap();

        let chord = result.best[0];
        assert!(
            chord.contains_pitch_class(0) && chord.contains_pitch_class(4),
            "{chord}"
        );
    }

    #[test]
    fn test_c_major_scale_fragment() {
        let config = EvolutionConfig {
            population_size: 60,
            generations: 300,
            random_seed: Some(42),
            ..Default::default()
        };
        let mut engine = EvolutionEngine::new(config, c_major(), 5, scale_melody()).unwrap();

        let tonic = Chord::new(0, ChordQuality::Major, 4);
        let dominant = Chord::new(7, ChordQuality::Major, 4);
        assert_eq!(tonic.pitch_classes(), [0, 4, 7]);
        assert_eq!(dominant.pitch_classes(), [7, 11, 2]);
        assert!(engine.catalog().contains(&tonic));
        assert!(engine.catalog().contains(&dominant));

        let result = engine.run().unwrap();
        assert_eq!(result.best.len(), 4);
        let first = result.best[0];
        assert!(
            first.contains_pitch_class(0) && first.contains_pitch_class(4),
            "{first}"
        );
    }

    #[test]
    fn test_progress_callback_sees_every_generation() {
        use std::cell::RefCell;

        let seen = RefCell::new(Vec::new());
        let mut engine =
            EvolutionEngine::new(small_config(6), c_major(), 5, scale_melody()).unwrap();
        engine
            .run_with_callback(|p| seen.borrow_mut().push((p.generation, p.phase)))
            .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.first(), Some(&(0, EvolutionPhase::Evolving)));
        assert_eq!(seen.last(), Some(&(6, EvolutionPhase::Done)));
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let bad_config = EvolutionConfig {
            population_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            EvolutionEngine::new(bad_config, c_major(), 5, scale_melody()),
            Err(HarmonyError::InvalidInput(InputError::PopulationTooSmall(1)))
        ));

        let bad_key = Key {
            root: 13,
            mode: crate::schema::Mode::Major,
        };
        assert!(matches!(
            EvolutionEngine::new(small_config(1), bad_key, 5, scale_melody()),
            Err(HarmonyError::InvalidKey { root: 13, .. })
        ));
    }

    #[test]
    fn test_all_rest_melody_is_degenerate() {
        let melody = Melody::new(vec![PitchEvent::rest(2.0)]).unwrap();
        let mut engine = EvolutionEngine::new(small_config(3), c_major(), 5, melody).unwrap();
        assert_eq!(engine.run().unwrap_err(), HarmonyError::DegeneratePopulation);
    }
}
