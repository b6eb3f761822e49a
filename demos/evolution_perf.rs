//! Quick evolution performance test

use accompanist::{
    compute::EvolutionEngine,
    schema::{EvolutionConfig, Key, Melody, PitchEvent, ReplacementPolicy},
};
use std::time::Instant;

fn melody(quarters: usize) -> Melody {
    let figure = [(4u8, 1.0), (2, 0.5), (0, 0.5), (2, 1.0), (7, 1.0)];
    let mut events = Vec::new();
    let mut total = 0.0;
    let mut i = 0;
    while total < quarters as f64 {
        let (pitch_class, duration) = figure[i % figure.len()];
        events.push(PitchEvent::note(pitch_class, 5, duration));
        total += duration;
        i += 1;
    }
    Melody::new(events).expect("demo melody is valid")
}

fn main() {
    println!("=== Evolution Performance Test ===\n");

    let key = Key::major(0).expect("C major");

    // Test different melody lengths
    for quarters in [16, 64, 256] {
        println!("Melody length: {} quarters", quarters);

        let config = EvolutionConfig {
            population_size: 200,
            generations: 500,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine =
            EvolutionEngine::new(config, key, 5, melody(quarters)).expect("valid engine");
        let result = engine.run().expect("evolution runs");
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best fitness:   {:.1}", result.stats.best_fitness);
        println!("  Initial best:   {:.1}", result.stats.initial_best_fitness);
        println!();
    }

    println!("=== Replacement Policy Comparison (64 quarters) ===\n");

    for replacement in [ReplacementPolicy::Legacy, ReplacementPolicy::AdvanceOnReplace] {
        let config = EvolutionConfig {
            generations: 1000,
            replacement,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = EvolutionEngine::new(config, key, 5, melody(64)).expect("valid engine");
        let result = engine.run().expect("evolution runs");
        let elapsed = start.elapsed();

        let replaced: usize = result.history.replacements.iter().sum();
        println!(
            "{:?}: best {:.1}, {} replacements, diversity {:.2}, {:.2}s",
            replacement,
            result.best_fitness,
            replaced,
            result.stats.final_diversity,
            elapsed.as_secs_f64()
        );
    }
}
