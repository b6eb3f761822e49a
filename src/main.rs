//! Accompanist CLI - Harmonize a melody from a JSON job file.

use std::path::PathBuf;
use std::time::Instant;

use accompanist::schema::{Accompaniment, HarmonizationJob, JobError, default_output_path};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <job.json> [output.json]", args[0]);
        eprintln!();
        eprintln!("Search for a chord accompaniment to a melody.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  job.json     Melody, key and search settings");
        eprintln!("  output.json  Where to write the accompaniment");
        eprintln!("               (default: <job>_with_accompaniment.json)");
        eprintln!();
        eprintln!("Example job is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_job();
        return;
    }

    let job_path = PathBuf::from(&args[1]);
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(&job_path));

    let job = HarmonizationJob::load(&job_path).unwrap_or_else(|e| {
        eprintln!("Error loading job: {}", e);
        std::process::exit(1);
    });

    let register = job.resolved_register().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = &job.evolution;
    println!("Accompanist");
    println!("===========");
    println!("Key: {}", job.key);
    println!("Register: {}", register);
    println!(
        "Melody: {} events, {} slots",
        job.melody.len(),
        job.melody.slot_count()
    );
    println!(
        "Population: {} ({} offspring/generation)",
        config.population_size,
        config.offspring_count()
    );
    println!("Generations: {}", config.generations);
    if let Some(seed) = config.random_seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut engine = job.engine().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Running evolution...");
    let start = Instant::now();
    let total = config.generations;

    let result = engine
        .run_with_callback(|progress| {
            // Print progress every 10%
            if progress.generation > 0 && progress.generation % (total / 10).max(1) == 0 {
                let elapsed = start.elapsed().as_secs_f32();
                println!(
                    "  Generation {}/{}: best={:.1}, avg={:.1}, {:.1} gen/s",
                    progress.generation,
                    total,
                    progress.best_fitness,
                    progress.avg_fitness,
                    progress.generation as f32 / elapsed
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let accompaniment = Accompaniment::from_result(job.key, register, &result);

    println!();
    println!("Accompaniment:");
    let names: Vec<&str> = accompaniment.slots.iter().map(|s| s.name.as_str()).collect();
    println!("  {}", names.join(" | "));
    println!();
    println!(
        "Fitness: {:.1} (initial best {:.1})",
        result.best_fitness, result.stats.initial_best_fitness
    );
    println!(
        "Time: {:.2}s ({:.0} evaluations/s)",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second
    );

    if let Err(e) = accompaniment.save(&output_path) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    }
    println!("Wrote {}", output_path.display());
}

fn print_example_job() {
    match HarmonizationJob::example().map_err(JobError::from).and_then(|job| job.to_json()) {
        Ok(json) => {
            println!("Example job (job.json):");
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
