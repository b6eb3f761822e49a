//! Benchmarks for fitness scoring and generation steps.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use accompanist::{
    compute::{Catalog, ChromosomeRng, EvolutionEngine, FitnessEvaluator},
    schema::{EvolutionConfig, Key, Melody, PitchEvent},
};

/// Repeating eighth-note figure spanning `quarters` quarter-notes.
fn melody(quarters: usize) -> Melody {
    let figure = [0u8, 4, 7, 11, 9, 5, 2, 7];
    let events = (0..quarters * 2)
        .map(|i| PitchEvent::note(figure[i % figure.len()], 5, 0.5))
        .collect();
    Melody::new(events).unwrap()
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let catalog = Catalog::generate(Key::major(0).unwrap(), 5).unwrap();

    for quarters in [8, 32, 128, 512] {
        let evaluator = FitnessEvaluator::new(melody(quarters)).unwrap();
        let mut rng = ChromosomeRng::new(42);
        let chromosome = rng
            .random_chromosome(evaluator.slot_count(), &catalog)
            .unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{} slots", quarters)),
            &quarters,
            |b, _| {
                b.iter(|| evaluator.score(black_box(&chromosome)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");
    group.sample_size(20);

    for population_size in [50, 200, 800] {
        let config = EvolutionConfig {
            population_size,
            random_seed: Some(42),
            ..Default::default()
        };
        let mut engine =
            EvolutionEngine::new(config, Key::major(0).unwrap(), 5, melody(64)).unwrap();
        engine.initialize().unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(population_size),
            &population_size,
            |b, _| {
                b.iter(|| engine.step_generation().unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_score, bench_generation_step);
criterion_main!(benches);
