//! Monophonic melody input.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Tolerance for comparing accumulated quarter-note durations.
pub const DURATION_EPSILON: f64 = 1e-9;

/// One melody unit. Durations are in quarter-notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PitchEvent {
    /// A sounding note.
    Note {
        /// Pitch class 0-11 (0 = C).
        pitch_class: u8,
        /// Scientific octave number (C4 = middle C).
        octave: i32,
        duration: f64,
    },
    /// Silence.
    Rest { duration: f64 },
}

impl PitchEvent {
    pub fn note(pitch_class: u8, octave: i32, duration: f64) -> Self {
        Self::Note {
            pitch_class,
            octave,
            duration,
        }
    }

    pub fn rest(duration: f64) -> Self {
        Self::Rest { duration }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        match *self {
            Self::Note { duration, .. } | Self::Rest { duration } => duration,
        }
    }

    #[inline]
    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest { .. })
    }

    /// Pitch class, absent for rests.
    #[inline]
    pub fn pitch_class(&self) -> Option<u8> {
        match *self {
            Self::Note { pitch_class, .. } => Some(pitch_class),
            Self::Rest { .. } => None,
        }
    }

    /// Octave, absent for rests.
    #[inline]
    pub fn octave(&self) -> Option<i32> {
        match *self {
            Self::Note { octave, .. } => Some(octave),
            Self::Rest { .. } => None,
        }
    }
}

/// An ordered, validated sequence of pitch events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Melody {
    events: Vec<PitchEvent>,
}

impl Melody {
    /// Build a melody, rejecting empty input, bad durations and bad pitch classes.
    pub fn new(events: Vec<PitchEvent>) -> Result<Self> {
        let melody = Self { events };
        melody.validate()?;
        Ok(melody)
    }

    /// Check the invariants [`Melody::new`] enforces. Deserialized melodies
    /// bypass the constructor, so the engine calls this again.
    pub fn validate(&self) -> Result<()> {
        if self.events.is_empty() {
            return Err(InputError::EmptyMelody.into());
        }
        for (index, event) in self.events.iter().enumerate() {
            let duration = event.duration();
            if !duration.is_finite() || duration <= 0.0 {
                return Err(InputError::InvalidDuration { index, duration }.into());
            }
            if let Some(pitch_class) = event.pitch_class()
                && pitch_class >= 12
            {
                return Err(InputError::InvalidPitchClass { index, pitch_class }.into());
            }
        }
        Ok(())
    }

    pub fn events(&self) -> &[PitchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total length in quarter-notes, rests included.
    pub fn total_duration(&self) -> f64 {
        self.events.iter().map(PitchEvent::duration).sum()
    }

    /// Number of one-quarter-note harmonic slots covering the melody.
    pub fn slot_count(&self) -> usize {
        let total = self.total_duration();
        if total <= DURATION_EPSILON {
            return 0;
        }
        (total - DURATION_EPSILON).ceil() as usize
    }

    /// Mean octave of the pitched events, truncated toward zero.
    ///
    /// Used as the default catalog register when a job does not name one.
    pub fn mean_octave(&self) -> Result<i32> {
        let octaves: Vec<i32> = self.events.iter().filter_map(PitchEvent::octave).collect();
        if octaves.is_empty() {
            return Err(InputError::NoPitchedEvents.into());
        }
        let sum: i64 = octaves.iter().map(|&o| o as i64).sum();
        Ok((sum as f64 / octaves.len() as f64).trunc() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonyError;

    #[test]
    fn test_slot_count_rounds_up_partial_beats() {
        let melody = Melody::new(vec![
            PitchEvent::note(0, 5, 1.0),
            PitchEvent::note(4, 5, 1.0),
            PitchEvent::note(7, 5, 2.0),
        ])
        .unwrap();
        assert_eq!(melody.slot_count(), 4);

        let melody = Melody::new(vec![PitchEvent::note(0, 5, 0.5)]).unwrap();
        assert_eq!(melody.slot_count(), 1);

        let third = 1.0 / 3.0;
        let melody = Melody::new(vec![
            PitchEvent::note(0, 5, third),
            PitchEvent::note(2, 5, third),
            PitchEvent::note(4, 5, third),
        ])
        .unwrap();
        assert_eq!(melody.slot_count(), 1);
    }

    #[test]
    fn test_rejects_invalid_events() {
        assert_eq!(
            Melody::new(vec![]),
            Err(HarmonyError::InvalidInput(InputError::EmptyMelody))
        );
        assert!(matches!(
            Melody::new(vec![PitchEvent::rest(0.0)]),
            Err(HarmonyError::InvalidInput(InputError::InvalidDuration { index: 0, .. }))
        ));
        assert!(matches!(
            Melody::new(vec![PitchEvent::note(0, 4, 1.0), PitchEvent::note(12, 4, 1.0)]),
            Err(HarmonyError::InvalidInput(InputError::InvalidPitchClass {
                index: 1,
                pitch_class: 12
            }))
        ));
        assert!(Melody::new(vec![PitchEvent::note(0, 4, f64::NAN)]).is_err());
    }

    #[test]
    fn test_mean_octave_truncates() {
        let melody = Melody::new(vec![
            PitchEvent::note(0, 4, 1.0),
            PitchEvent::rest(1.0),
            PitchEvent::note(0, 5, 1.0),
        ])
        .unwrap();
        assert_eq!(melody.mean_octave().unwrap(), 4);

        let rests = Melody::new(vec![PitchEvent::rest(1.0)]).unwrap();
        assert_eq!(
            rests.mean_octave(),
            Err(HarmonyError::InvalidInput(InputError::NoPitchedEvents))
        );
    }

    #[test]
    fn test_serde_form() {
        let json = r#"[
            {"type": "Note", "pitch_class": 7, "octave": 4, "duration": 1.5},
            {"type": "Rest", "duration": 0.5}
        ]"#;
        let melody: Melody = serde_json::from_str(json).unwrap();
        assert_eq!(melody.len(), 2);
        assert!(melody.events()[1].is_rest());
        assert_eq!(melody.events()[0].pitch_class(), Some(7));
        assert!((melody.total_duration() - 2.0).abs() < 1e-12);
    }
}
