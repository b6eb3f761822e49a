//! Chord values and the per-key chord catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::schema::{Key, note_name};

use super::keys::scale_degrees;

/// A pitched tone: pitch class plus octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tone {
    pub pitch_class: u8,
    pub octave: i32,
}

impl Tone {
    pub fn new(pitch_class: u8, octave: i32) -> Self {
        Self {
            pitch_class: pitch_class % 12,
            octave,
        }
    }

    /// MIDI note number (C4 = 60).
    pub fn midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.pitch_class as i32
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", note_name(self.pitch_class), self.octave)
    }
}

/// Triad shapes used for accompaniment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Sus2,
    Sus4,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 5] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
    ];

    /// Semitones from the root to the second and third tones.
    pub fn intervals(self) -> (u8, u8) {
        match self {
            ChordQuality::Major => (4, 7),
            ChordQuality::Minor => (3, 7),
            ChordQuality::Diminished => (3, 6),
            ChordQuality::Sus2 => (2, 7),
            ChordQuality::Sus4 => (5, 7),
        }
    }

    pub fn from_intervals(intervals: (u8, u8)) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.intervals() == intervals)
    }

    fn suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
        }
    }
}

/// Three tones in root, second, third order. All tones share one octave
/// number, so upper tones may wrap below the root in pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    tones: [Tone; 3],
}

impl Chord {
    /// Build `quality` on `root` with every tone at `octave`.
    pub fn new(root: u8, quality: ChordQuality, octave: i32) -> Self {
        let (second, third) = quality.intervals();
        let root = root % 12;
        Self {
            tones: [
                Tone::new(root, octave),
                Tone::new(root + second, octave),
                Tone::new(root + third, octave),
            ],
        }
    }

    pub fn from_tones(tones: [Tone; 3]) -> Self {
        Self { tones }
    }

    #[inline]
    pub fn tones(&self) -> &[Tone; 3] {
        &self.tones
    }

    #[inline]
    pub fn root(&self) -> Tone {
        self.tones[0]
    }

    pub fn pitch_classes(&self) -> [u8; 3] {
        self.tones.map(|t| t.pitch_class)
    }

    pub fn contains_pitch_class(&self, pitch_class: u8) -> bool {
        self.tones.iter().any(|t| t.pitch_class == pitch_class)
    }

    /// Quality implied by the interval structure, if it is one of the five shapes.
    pub fn quality(&self) -> Option<ChordQuality> {
        let root = self.tones[0].pitch_class;
        let above = |t: &Tone| (t.pitch_class as i32 - root as i32).rem_euclid(12) as u8;
        ChordQuality::from_intervals((above(&self.tones[1]), above(&self.tones[2])))
    }

    /// Display name such as `Am` or `Gsus4`.
    pub fn name(&self) -> String {
        let root = note_name(self.root().pitch_class);
        match self.quality() {
            Some(quality) => format!("{root}{}", quality.suffix()),
            None => format!("{root}?"),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.tones;
        write!(f, "{} [{a} {b} {c}]", self.name())
    }
}

/// Every accompaniment chord usable in one key at one register.
///
/// Built once and then shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    key: Key,
    register: i32,
    chords: Vec<Chord>,
}

impl Catalog {
    /// Enumerate the key's diatonic chords.
    ///
    /// Each degree gets its native triad, followed by its sus2 and sus4
    /// variants where the key table allows them. Tones sit at octave
    /// `register - 1`.
    pub fn generate(key: Key, register: i32) -> Result<Self> {
        let octave = register
            .checked_sub(1)
            .ok_or(InputError::InvalidRegister(register))?;
        let mut chords = Vec::with_capacity(21);

        for degree in scale_degrees(key)? {
            chords.push(Chord::new(degree.root, degree.quality, octave));
            if degree.allows_sus2 {
                chords.push(Chord::new(degree.root, ChordQuality::Sus2, octave));
            }
            if degree.allows_sus4 {
                chords.push(Chord::new(degree.root, ChordQuality::Sus4, octave));
            }
        }

        log::debug!(
            "Catalog for {key} at register {register}: {} chords",
            chords.len()
        );

        Ok(Self {
            key,
            register,
            chords,
        })
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn register(&self) -> i32 {
        self.register
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn contains(&self, chord: &Chord) -> bool {
        self.chords.contains(chord)
    }
}

/// Enumerate the chords usable as accompaniment in `key` at `register`.
pub fn generate_chords(key: Key, register: i32) -> Result<Vec<Chord>> {
    Catalog::generate(key, register).map(|catalog| catalog.chords)
}
