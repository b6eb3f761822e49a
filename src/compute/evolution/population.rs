//! Population storage with a parallel fitness vector.

use crate::error::{InputError, Result};
use crate::schema::ReplacementPolicy;

use super::Chromosome;

/// Chromosomes and their fitness, kept index-aligned by every reordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
    fitness: Vec<f64>,
}

impl Population {
    pub fn new(chromosomes: Vec<Chromosome>, fitness: Vec<f64>) -> Result<Self> {
        if chromosomes.len() != fitness.len() {
            return Err(InputError::FitnessMismatch {
                chromosomes: chromosomes.len(),
                fitness: fitness.len(),
            }
            .into());
        }
        Ok(Self {
            chromosomes,
            fitness,
        })
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    pub fn get(&self, index: usize) -> Option<(&Chromosome, f64)> {
        Some((self.chromosomes.get(index)?, self.fitness[index]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Chromosome, f64)> {
        self.chromosomes.iter().zip(self.fitness.iter().copied())
    }

    /// Highest-fitness member; among ties, the one latest in current order.
    pub fn best(&self) -> Option<(&Chromosome, f64)> {
        self.iter().max_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub fn best_fitness(&self) -> f64 {
        self.best().map_or(f64::NEG_INFINITY, |(_, f)| f)
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.fitness.is_empty() {
            return 0.0;
        }
        self.fitness.iter().sum::<f64>() / self.fitness.len() as f64
    }

    /// Stable sort by ascending fitness, moving chromosomes with their scores.
    pub fn sort_ascending(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.fitness[a].total_cmp(&self.fitness[b]));

        let mut chromosomes: Vec<Option<Chromosome>> =
            std::mem::take(&mut self.chromosomes).into_iter().map(Some).collect();
        self.chromosomes = order
            .iter()
            .filter_map(|&i| chromosomes[i].take())
            .collect();
        self.fitness = order.iter().map(|&i| self.fitness[i]).collect();
    }

    /// Merge `children` into the population, returning how many members were
    /// overwritten. Both sides are sorted ascending first; the population
    /// size never changes.
    pub fn absorb(&mut self, mut children: Population, policy: ReplacementPolicy) -> usize {
        if self.is_empty() {
            return 0;
        }
        children.sort_ascending();
        self.sort_ascending();

        let mut replaced = 0;
        match policy {
            ReplacementPolicy::Legacy => {
                // One shared position that is never advanced.
                let counter = 0;
                let weakest_first = children.chromosomes.into_iter().zip(children.fitness);
                for (chromosome, fitness) in weakest_first {
                    if fitness > self.fitness[counter] {
                        self.chromosomes[counter] = chromosome;
                        self.fitness[counter] = fitness;
                        replaced += 1;
                    }
                }
            }
            ReplacementPolicy::AdvanceOnReplace => {
                let mut counter = 0;
                let strongest_first = children
                    .chromosomes
                    .into_iter()
                    .zip(children.fitness)
                    .rev();
                for (chromosome, fitness) in strongest_first {
                    if counter >= self.len() {
                        break;
                    }
                    if fitness > self.fitness[counter] {
                        self.chromosomes[counter] = chromosome;
                        self.fitness[counter] = fitness;
                        counter += 1;
                        replaced += 1;
                    }
                }
            }
        }
        replaced
    }

    /// Sort ascending and hand back the last (highest-fitness) member.
    pub fn into_best(mut self) -> Option<(Chromosome, f64)> {
        self.sort_ascending();
        let fitness = self.fitness.pop()?;
        let chromosome = self.chromosomes.pop()?;
        Some((chromosome, fitness))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Chord, ChordQuality};

    /// Chromosome tagged by the root of its single chord.
    fn tagged(root: u8) -> Chromosome {
        Chromosome::new(vec![Chord::new(root, ChordQuality::Major, 4)])
    }

    fn tag(chromosome: &Chromosome) -> u8 {
        chromosome[0].root().pitch_class
    }

    fn population(fitness: &[f64]) -> Population {
        let chromosomes = (0..fitness.len()).map(|i| tagged(i as u8)).collect();
        Population::new(chromosomes, fitness.to_vec()).unwrap()
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(Population::new(vec![tagged(0)], vec![]).is_err());
    }

    #[test]
    fn test_sort_keeps_pairs_and_is_stable() {
        let mut pop = population(&[3.0, 1.0, 2.0, 1.0]);
        pop.sort_ascending();
        assert_eq!(pop.fitness(), &[1.0, 1.0, 2.0, 3.0]);
        let tags: Vec<u8> = pop.chromosomes().iter().map(tag).collect();
        assert_eq!(tags, vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_legacy_replacement_only_touches_weakest() {
        let mut pop = population(&[5.0, 1.0, 3.0]);
        let children = Population::new(vec![tagged(10), tagged(11)], vec![4.0, 2.0]).unwrap();

        let replaced = pop.absorb(children, ReplacementPolicy::Legacy);
        // Ascending children: 2.0 beats 1.0, then 4.0 beats the new 2.0.
        assert_eq!(replaced, 2);
        assert_eq!(pop.fitness(), &[4.0, 3.0, 5.0]);
        assert_eq!(tag(&pop.chromosomes()[0]), 10);
    }

    #[test]
    fn test_legacy_replacement_requires_strict_improvement() {
        let mut pop = population(&[2.0, 7.0]);
        let children = Population::new(vec![tagged(9)], vec![2.0]).unwrap();
        assert_eq!(pop.absorb(children, ReplacementPolicy::Legacy), 0);
        assert_eq!(pop.fitness(), &[2.0, 7.0]);
    }

    #[test]
    fn test_advancing_replacement_fills_weakest_slots() {
        let mut pop = population(&[5.0, 1.0, 3.0]);
        let children = Population::new(vec![tagged(10), tagged(11)], vec![4.0, 3.5]).unwrap();

        let replaced = pop.absorb(children, ReplacementPolicy::AdvanceOnReplace);
        // Strongest child takes the weakest slot, the next one the slot after.
        assert_eq!(replaced, 2);
        assert_eq!(pop.fitness(), &[4.0, 3.5, 5.0]);
        assert_eq!(pop.len(), 3);
    }

    #[test]
    fn test_into_best_returns_last_max() {
        let pop = population(&[1.0, 9.0, 9.0, 2.0]);
        let (best, fitness) = pop.into_best().unwrap();
        assert_eq!(fitness, 9.0);
        assert_eq!(tag(&best), 2);
    }

    #[test]
    fn test_best_and_mean() {
        let pop = population(&[1.0, 4.0, 4.0]);
        assert_eq!(pop.best().map(|(c, _)| tag(c)), Some(2));
        assert_eq!(pop.best_fitness(), 4.0);
        assert_eq!(pop.mean_fitness(), 3.0);
        assert_eq!(Population::default().best_fitness(), f64::NEG_INFINITY);
    }
}
