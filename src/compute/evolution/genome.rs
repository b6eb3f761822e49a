//! Chromosome representation and the random operators that act on it.
//!
//! Provides random initialization, crossover, and mutation.

use std::ops::Index;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compute::{Catalog, Chord};
use crate::error::{InputError, Result};
use crate::schema::Key;

/// One candidate accompaniment: a chord per harmonic slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chromosome {
    chords: Vec<Chord>,
}

impl Chromosome {
    pub fn new(chords: Vec<Chord>) -> Self {
        Self { chords }
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn into_chords(self) -> Vec<Chord> {
        self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chord> {
        self.chords.iter()
    }
}

impl Index<usize> for Chromosome {
    type Output = Chord;

    fn index(&self, slot: usize) -> &Chord {
        &self.chords[slot]
    }
}

impl<'a> IntoIterator for &'a Chromosome {
    type Item = &'a Chord;
    type IntoIter = std::slice::Iter<'a, Chord>;

    fn into_iter(self) -> Self::IntoIter {
        self.chords.iter()
    }
}

/// Seedable random source behind every stochastic step of the search.
pub struct ChromosomeRng {
    rng: StdRng,
}

impl ChromosomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw `slot_count` chords uniformly, with replacement, from the catalog.
    pub fn random_chromosome(
        &mut self,
        slot_count: usize,
        catalog: &Catalog,
    ) -> Result<Chromosome> {
        if slot_count == 0 {
            return Err(InputError::ZeroSlots.into());
        }
        let chords = catalog.chords();
        if chords.is_empty() {
            return Err(InputError::EmptyCatalog.into());
        }

        Ok(Chromosome::new(
            (0..slot_count)
                .map(|_| chords[self.rng.gen_range(0..chords.len())])
                .collect(),
        ))
    }

    /// Draw `size` independent chromosomes.
    pub fn random_population(
        &mut self,
        size: usize,
        slot_count: usize,
        catalog: &Catalog,
    ) -> Result<Vec<Chromosome>> {
        (0..size)
            .map(|_| self.random_chromosome(slot_count, catalog))
            .collect()
    }

    /// Uniform crossover: each slot comes from either parent with probability 1/2.
    pub fn crossover(&mut self, parent1: &Chromosome, parent2: &Chromosome) -> Result<Chromosome> {
        if parent1.len() != parent2.len() {
            return Err(InputError::LengthMismatch {
                left: parent1.len(),
                right: parent2.len(),
            }
            .into());
        }

        Ok(Chromosome::new(
            parent1
                .iter()
                .zip(parent2.iter())
                .map(|(a, b)| if self.rng.gen_bool(0.5) { *a } else { *b })
                .collect(),
        ))
    }

    /// Replace each slot, with probability `rate`, by a fresh catalog draw.
    pub fn mutate(
        &mut self,
        chromosome: &mut Chromosome,
        catalog: &Catalog,
        rate: f64,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(InputError::InvalidMutationRate(rate).into());
        }
        let chords = catalog.chords();
        if chords.is_empty() {
            return Err(InputError::EmptyCatalog.into());
        }

        for slot in &mut chromosome.chords {
            if self.rng.gen_bool(rate) {
                *slot = chords[self.rng.gen_range(0..chords.len())];
            }
        }
        Ok(())
    }

    /// Mutate against the catalog of `key` at `register`, built on the spot.
    pub fn mutate_in_key(
        &mut self,
        chromosome: &mut Chromosome,
        key: Key,
        register: i32,
        rate: f64,
    ) -> Result<()> {
        let catalog = Catalog::generate(key, register)?;
        self.mutate(chromosome, &catalog, rate)
    }

    /// Uniform sample from [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Number of slots at which two chromosomes hold different chords.
pub fn chromosome_distance(a: &Chromosome, b: &Chromosome) -> usize {
    let shared = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
    shared + a.len().abs_diff(b.len())
}
