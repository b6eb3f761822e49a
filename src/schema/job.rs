//! Harmonization jobs as JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compute::evolution::EvolutionEngine;
use crate::error::HarmonyError;

use super::{Accompaniment, EvolutionConfig, EvolutionProgress, Key, Melody, PitchEvent};

/// Errors from the file layer.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Harmony(#[from] HarmonyError),
}

/// A melody to harmonize plus everything the search needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonizationJob {
    /// Key name (`"A minor"`, `"f#"`) or `{ "root": 9, "mode": "Minor" }`.
    pub key: Key,
    /// Catalog register. Defaults to the melody's mean octave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<i32>,
    pub melody: Melody,
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

impl HarmonizationJob {
    pub fn new(key: Key, melody: Melody) -> Self {
        Self {
            key,
            register: None,
            melody,
            evolution: EvolutionConfig::default(),
        }
    }

    /// Small job used by `--example`.
    pub fn example() -> Result<Self, HarmonyError> {
        let melody = Melody::new(vec![
            PitchEvent::note(4, 5, 1.0),
            PitchEvent::note(2, 5, 1.0),
            PitchEvent::note(0, 5, 1.0),
            PitchEvent::note(2, 5, 1.0),
            PitchEvent::note(4, 5, 0.5),
            PitchEvent::note(4, 5, 0.5),
            PitchEvent::note(4, 5, 1.0),
            PitchEvent::rest(1.0),
        ])?;
        let mut job = Self::new(Key::major(0)?, melody);
        job.evolution.generations = 500;
        Ok(job)
    }

    pub fn from_json(json: &str) -> Result<Self, JobError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, JobError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, JobError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), JobError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Explicit register, or the truncated mean octave of the melody.
    pub fn resolved_register(&self) -> Result<i32, HarmonyError> {
        match self.register {
            Some(register) => Ok(register),
            None => self.melody.mean_octave(),
        }
    }

    /// Build an engine for this job.
    pub fn engine(&self) -> Result<EvolutionEngine, HarmonyError> {
        EvolutionEngine::new(
            self.evolution.clone(),
            self.key,
            self.resolved_register()?,
            self.melody.clone(),
        )
    }

    /// Run the search and package the best progression.
    pub fn harmonize_with_callback<F>(&self, callback: F) -> Result<Accompaniment, HarmonyError>
    where
        F: Fn(&EvolutionProgress),
    {
        let register = self.resolved_register()?;
        let result = self.engine()?.run_with_callback(callback)?;
        Ok(Accompaniment::from_result(self.key, register, &result))
    }

    pub fn harmonize(&self) -> Result<Accompaniment, HarmonyError> {
        self.harmonize_with_callback(|_| {})
    }
}

impl Accompaniment {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), JobError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, JobError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

/// `song.json` becomes `song_with_accompaniment.json` in the same directory.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "melody".to_string());
    input.with_file_name(format!("{stem}_with_accompaniment.json"))
}
