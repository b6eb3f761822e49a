//! Fitness function for candidate accompaniments.
//!
//! A chromosome is scored by walking the melody beat by beat and rewarding
//! every chord tone according to its interval with the sounding melody note,
//! weighted by the note's duration. A flat bonus rewards a repeated tone that
//! is followed by a change.

use crate::compute::Tone;
use crate::error::{InputError, Result};
use crate::schema::{DURATION_EPSILON, Melody};

use super::Chromosome;

/// Per quarter-note reward when a chord tone has the melody note's pitch class.
pub const EXACT_MATCH_REWARD: f64 = 8000.0;

/// Flat reward for visiting a tone that differs from two identical predecessors.
pub const REPEAT_BONUS: f64 = 800.0;

/// Interval from a chord tone up to the melody note, in semitones 0-11.
///
/// The trailing `% 13` fold is kept as part of the scoring definition; it
/// leaves every value already in 0-11 unchanged.
#[inline]
pub fn interval_class(melody_pitch_class: u8, tone_pitch_class: u8) -> u8 {
    let d = (melody_pitch_class as i32 - tone_pitch_class as i32).rem_euclid(12);
    (d % 13) as u8
}

/// Per quarter-note reward for an interval class.
#[inline]
pub fn interval_reward(interval: u8) -> f64 {
    match interval {
        0 => 6000.0,
        12 => 4000.0,
        7 => 1400.0,
        5 => 1300.0,
        3 | 4 | 8 | 9 => 1100.0,
        2 | 10 => 600.0,
        // 1, 6, 11: neither rewarded nor penalized
        _ => 0.0,
    }
}

/// Score split into its three contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Pitch-class matches between melody and chord tones.
    pub exact_matches: f64,
    /// Interval-table rewards.
    pub intervals: f64,
    /// Repeated-tone bonuses.
    pub repetition: f64,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> f64 {
        self.exact_matches + self.intervals + self.repetition
    }
}

/// Score `chromosome` against `melody`.
pub fn score(chromosome: &Chromosome, melody: &Melody) -> Result<f64> {
    score_detailed(chromosome, melody).map(|breakdown| breakdown.total())
}

/// Score `chromosome` against `melody`, keeping the contributions apart.
///
/// Slots advance lazily: before each event, once at least one quarter-note
/// has accumulated the walk moves to the next chord and the counter restarts
/// at zero. Rests accumulate duration but are not scored. Fails if the walk
/// reaches a slot the chromosome does not have.
pub fn score_detailed(chromosome: &Chromosome, melody: &Melody) -> Result<ScoreBreakdown> {
    let mut breakdown = ScoreBreakdown::default();
    let mut elapsed = 0.0f64;
    let mut slot = 0usize;

    // Tone history runs across slot boundaries.
    let mut prev: Option<Tone> = None;
    let mut prev_prev: Option<Tone> = None;

    for event in melody.events() {
        if elapsed >= 1.0 - DURATION_EPSILON {
            elapsed = 0.0;
            slot += 1;
        }

        let duration = event.duration();
        let Some(pitch_class) = event.pitch_class() else {
            elapsed += duration;
            continue;
        };

        let chord = chromosome.chords().get(slot).ok_or_else(|| {
            InputError::ChromosomeTooShort {
                required: melody.slot_count().max(slot + 1),
                actual: chromosome.len(),
            }
        })?;

        for &tone in chord.tones() {
            if let (Some(p), Some(pp)) = (prev, prev_prev)
                && p == pp
                && tone != p
            {
                breakdown.repetition += REPEAT_BONUS;
            }
            prev_prev = prev;
            prev = Some(tone);

            if tone.pitch_class == pitch_class {
                breakdown.exact_matches += EXACT_MATCH_REWARD * duration;
            }
            breakdown.intervals +=
                interval_reward(interval_class(pitch_class, tone.pitch_class)) * duration;
        }

        elapsed += duration;
    }

    Ok(breakdown)
}

/// Scores chromosomes against one melody.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    melody: Melody,
}

impl FitnessEvaluator {
    /// Create an evaluator for a validated melody.
    pub fn new(melody: Melody) -> Result<Self> {
        melody.validate()?;
        Ok(Self { melody })
    }

    pub fn melody(&self) -> &Melody {
        &self.melody
    }

    /// Number of harmonic slots a chromosome needs for this melody.
    pub fn slot_count(&self) -> usize {
        self.melody.slot_count()
    }

    /// Evaluate a candidate.
    pub fn score(&self, chromosome: &Chromosome) -> Result<f64> {
        score(chromosome, &self.melody)
    }

    pub fn score_detailed(&self, chromosome: &Chromosome) -> Result<ScoreBreakdown> {
        score_detailed(chromosome, &self.melody)
    }
}
