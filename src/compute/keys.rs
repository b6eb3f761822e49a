//! Static diatonic tables for the 12 major and 12 minor keys.
//!
//! Each key lists the pitch classes of its seven scale degrees. Degree
//! qualities and suspended-chord exclusions depend only on the mode.

use crate::error::{HarmonyError, Result};
use crate::schema::{Key, Mode};

use super::ChordQuality;
use super::ChordQuality::{Diminished as Dim, Major as Maj, Minor as Min};

/// Scale-degree roots of each major key, indexed by tonic pitch class.
pub const MAJOR_KEYS: [[u8; 7]; 12] = [
    [0, 2, 4, 5, 7, 9, 11],
    [1, 3, 5, 6, 8, 10, 0],
    [2, 4, 6, 7, 9, 11, 1],
    [3, 5, 7, 8, 10, 0, 2],
    [4, 6, 8, 9, 11, 1, 3],
    [5, 7, 9, 10, 0, 2, 4],
    [6, 8, 10, 11, 1, 3, 5],
    [7, 9, 11, 0, 2, 4, 6],
    [8, 10, 0, 1, 3, 5, 7],
    [9, 11, 1, 2, 4, 6, 8],
    [10, 0, 2, 3, 5, 7, 9],
    [11, 1, 3, 4, 6, 8, 10],
];

/// Scale-degree roots of each natural minor key, indexed by tonic pitch class.
pub const MINOR_KEYS: [[u8; 7]; 12] = [
    [0, 2, 3, 5, 7, 8, 10],
    [1, 3, 4, 6, 8, 9, 11],
    [2, 4, 5, 7, 9, 10, 0],
    [3, 5, 6, 8, 10, 11, 1],
    [4, 6, 7, 9, 11, 0, 2],
    [5, 7, 8, 10, 0, 1, 3],
    [6, 8, 9, 11, 1, 2, 4],
    [7, 9, 10, 0, 2, 3, 5],
    [8, 10, 11, 1, 3, 4, 6],
    [9, 11, 0, 2, 4, 5, 7],
    [10, 0, 1, 3, 5, 6, 8],
    [11, 1, 2, 4, 6, 7, 9],
];

/// I ii iii IV V vi vii°
pub const MAJOR_QUALITIES: [ChordQuality; 7] = [Maj, Min, Min, Maj, Maj, Min, Dim];

/// i ii° III iv v VI VII
pub const MINOR_QUALITIES: [ChordQuality; 7] = [Min, Dim, Maj, Min, Min, Maj, Maj];

// Degrees that also get a sus2 / sus4 chord. The diminished degree never does.
const MAJOR_SUS2: [bool; 7] = [true, true, true, false, true, true, false];
const MAJOR_SUS4: [bool; 7] = [true, true, true, true, false, true, false];
const MINOR_SUS2: [bool; 7] = [true, false, true, true, true, false, true];
const MINOR_SUS4: [bool; 7] = [true, false, true, true, true, true, false];

/// One diatonic degree of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleDegree {
    /// 0-based position in the scale (0 = tonic).
    pub index: usize,
    /// Pitch class of the degree's root.
    pub root: u8,
    /// Inherent triad quality (major, minor or diminished).
    pub quality: ChordQuality,
    /// Whether the catalog also gets a sus2 chord on this degree.
    pub allows_sus2: bool,
    /// Whether the catalog also gets a sus4 chord on this degree.
    pub allows_sus4: bool,
}

/// Look up the seven degrees of `key`.
pub fn scale_degrees(key: Key) -> Result<[ScaleDegree; 7]> {
    let (table, qualities, sus2, sus4) = match key.mode {
        Mode::Major => (&MAJOR_KEYS, &MAJOR_QUALITIES, &MAJOR_SUS2, &MAJOR_SUS4),
        Mode::Minor => (&MINOR_KEYS, &MINOR_QUALITIES, &MINOR_SUS2, &MINOR_SUS4),
    };
    let roots = table
        .get(key.root as usize)
        .ok_or(HarmonyError::InvalidKey {
            root: key.root,
            mode: key.mode,
        })?;

    Ok(std::array::from_fn(|index| ScaleDegree {
        index,
        root: roots[index],
        quality: qualities[index],
        allows_sus2: sus2[index],
        allows_sus4: sus4[index],
    }))
}

/// Pitch classes of the key's seven degrees.
pub fn diatonic_pitch_classes(key: Key) -> Result<[u8; 7]> {
    Ok(scale_degrees(key)?.map(|degree| degree.root))
}
