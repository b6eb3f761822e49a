//! Musical key types: a tonic pitch class plus a major/minor mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HarmonyError, Result};

/// Sharp-spelled names of the 12 pitch classes.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of a pitch class (taken modulo 12).
pub fn note_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES[(pitch_class % 12) as usize]
}

/// Tonality of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// A key: tonic pitch class (0 = C) and mode.
///
/// Only roots 0-11 resolve against the key table; [`Key::new`] enforces this,
/// while the plain struct form can still carry an out-of-range root (e.g. from
/// JSON), which the catalog rejects with [`HarmonyError::InvalidKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Key {
    pub root: u8,
    pub mode: Mode,
}

impl Key {
    /// Create a key, rejecting roots outside 0-11.
    pub fn new(root: u8, mode: Mode) -> Result<Self> {
        if root >= 12 {
            return Err(HarmonyError::InvalidKey { root, mode });
        }
        Ok(Self { root, mode })
    }

    pub fn major(root: u8) -> Result<Self> {
        Self::new(root, Mode::Major)
    }

    pub fn minor(root: u8) -> Result<Self> {
        Self::new(root, Mode::Minor)
    }

    /// All 24 keys of the table, majors first.
    pub fn all() -> impl Iterator<Item = Key> {
        [Mode::Major, Mode::Minor]
            .into_iter()
            .flat_map(|mode| (0..12).map(move |root| Key { root, mode }))
    }

    /// Conventional short name: uppercase tonic for major, lowercase for minor.
    pub fn short_name(&self) -> String {
        let name = note_name(self.root);
        match self.mode {
            Mode::Major => name.to_string(),
            Mode::Minor => name.to_lowercase(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", note_name(self.root), self.mode)
    }
}

/// Error parsing a key name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot parse key name: {0:?}")]
pub struct ParseKeyError(pub String);

impl FromStr for Key {
    type Err = ParseKeyError;

    /// Accepts `C`, `F#`, `Bb`, `c#` (lowercase tonic means minor) and an
    /// optional trailing `major`/`minor` word that overrides the case rule.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        let mut words = s.split_whitespace();
        let tonic = words.next().ok_or_else(err)?;
        let explicit_mode = match words.next().map(str::to_lowercase).as_deref() {
            None => None,
            Some("major" | "maj") => Some(Mode::Major),
            Some("minor" | "min") => Some(Mode::Minor),
            Some(_) => return Err(err()),
        };
        if words.next().is_some() {
            return Err(err());
        }

        let mut chars = tonic.chars();
        let letter = chars.next().ok_or_else(err)?;
        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(err()),
        };
        let mut offset = 0i32;
        for accidental in chars {
            match accidental {
                '#' | '♯' => offset += 1,
                'b' | '♭' => offset -= 1,
                _ => return Err(err()),
            }
        }

        let mode = explicit_mode.unwrap_or(if letter.is_ascii_lowercase() {
            Mode::Minor
        } else {
            Mode::Major
        });
        let root = (base + offset).rem_euclid(12) as u8;
        Ok(Key { root, mode })
    }
}

#[derive(Deserialize)]
struct KeyFields {
    root: u8,
    mode: Mode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Name(String),
    Fields(KeyFields),
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match KeyRepr::deserialize(deserializer)? {
            KeyRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
            KeyRepr::Fields(KeyFields { root, mode }) => Ok(Key { root, mode }),
        }
    }
}
