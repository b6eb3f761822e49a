//! Accompanist - Evolutionary chord accompaniment for melodies.
//!
//! Given a melody and its key, this crate searches for a chord progression
//! (one triad per quarter-note) that harmonizes well with it, using a
//! genetic algorithm over the key's diatonic and suspended triads.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Keys, melodies, configuration, jobs and result types
//! - `compute`: Key tables, chord catalogs and the evolutionary search
//!
//! # Example
//!
//! ```rust,no_run
//! use accompanist::{
//!     compute::EvolutionEngine,
//!     schema::{Accompaniment, EvolutionConfig, Key, Melody, PitchEvent},
//! };
//!
//! let melody = Melody::new(vec![
//!     PitchEvent::note(9, 4, 1.0),
//!     PitchEvent::note(0, 5, 0.5),
//!     PitchEvent::note(11, 4, 0.5),
//!     PitchEvent::note(9, 4, 2.0),
//! ])?;
//! let key = Key::minor(9)?;
//! let register = melody.mean_octave()?;
//!
//! let config = EvolutionConfig {
//!     generations: 1000,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut engine = EvolutionEngine::new(config, key, register, melody)?;
//! let result = engine.run()?;
//!
//! let accompaniment = Accompaniment::from_result(key, register, &result);
//! for slot in &accompaniment.slots {
//!     println!("{}: {}", slot.beat, slot.name);
//! }
//! # Ok::<(), accompanist::HarmonyError>(())
//! ```

pub mod compute;
pub mod error;
pub mod schema;

pub use error::{HarmonyError, InputError, Result};
