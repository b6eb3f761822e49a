//! Fitness-proportionate parent selection without replacement.

use crate::error::{HarmonyError, InputError, Result};
use crate::schema::DegenerateSelection;

use super::ChromosomeRng;

/// Draw two distinct parent indices from `fitness`.
///
/// Each draw picks index `i` with probability `fitness[i] / sum(remaining)`.
/// The first parent is removed from a working copy before the second draw, so
/// the caller's fitness slice is never touched and every call starts from the
/// full population. Negative or NaN fitness counts as zero weight.
///
/// If every weight is zero at the first draw, `policy` decides between
/// failing with [`HarmonyError::DegeneratePopulation`] and uniform sampling.
/// If only the first parent carried weight, the second is drawn uniformly.
pub fn select_parents(
    fitness: &[f64],
    rng: &mut ChromosomeRng,
    policy: DegenerateSelection,
) -> Result<(usize, usize)> {
    if fitness.len() < 2 {
        return Err(InputError::PopulationTooSmall(fitness.len()).into());
    }

    let mut pool: Vec<(usize, f64)> = fitness
        .iter()
        .map(|&f| f.max(0.0))
        .enumerate()
        .collect();

    let first = match draw_proportionate(&mut pool, rng) {
        Some(index) => index,
        None => match policy {
            DegenerateSelection::Fail => return Err(HarmonyError::DegeneratePopulation),
            DegenerateSelection::Uniform => {
                log::warn!("All fitness values are zero, selecting parents uniformly");
                draw_uniform(&mut pool, rng)
            }
        },
    };

    let second = match draw_proportionate(&mut pool, rng) {
        Some(index) => index,
        None => {
            log::warn!("Remaining weights are zero after parent {first}, drawing uniformly");
            draw_uniform(&mut pool, rng)
        }
    };

    log::trace!("Selected parents {first} and {second}");
    Ok((first, second))
}

/// Remove and return one entry with probability proportional to its weight,
/// or `None` (pool untouched) when the weights sum to zero.
fn draw_proportionate(pool: &mut Vec<(usize, f64)>, rng: &mut ChromosomeRng) -> Option<usize> {
    let total: f64 = pool.iter().map(|&(_, w)| w).sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }

    let target = rng.unit() * total;
    let mut cumulative = 0.0;
    let mut chosen = None;
    for (position, &(_, weight)) in pool.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        chosen = Some(position);
        if target < cumulative {
            break;
        }
    }

    // Rounding can leave `target` just past the final cumulative sum; the last
    // positive entry absorbs it.
    chosen.map(|position| pool.remove(position).0)
}

fn draw_uniform(pool: &mut Vec<(usize, f64)>, rng: &mut ChromosomeRng) -> usize {
    let position = rng.index(pool.len());
    pool.remove(position).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_are_distinct_and_weighted() {
        let mut rng = ChromosomeRng::new(42);
        for _ in 0..200 {
            let (a, b) = select_parents(&[0.0, 0.0, 5.0, 5.0], &mut rng, DegenerateSelection::Fail)
                .unwrap();
            assert_ne!(a, b);
            assert!(a >= 2 && b >= 2);
        }
    }

    #[test]
    fn test_second_parent_uniform_when_rest_is_zero() {
        let mut rng = ChromosomeRng::new(1);
        let (a, b) = select_parents(&[3.0, 0.0], &mut rng, DegenerateSelection::Fail).unwrap();
        assert_eq!((a, b), (0, 1));
    }

    #[test]
    fn test_all_zero_fails_or_falls_back() {
        let mut rng = ChromosomeRng::new(9);
        assert_eq!(
            select_parents(&[0.0; 5], &mut rng, DegenerateSelection::Fail),
            Err(HarmonyError::DegeneratePopulation)
        );

        let (a, b) = select_parents(&[0.0; 5], &mut rng, DegenerateSelection::Uniform).unwrap();
        assert_ne!(a, b);
        assert!(a < 5 && b < 5);
    }

    #[test]
    fn test_population_too_small() {
        let mut rng = ChromosomeRng::new(9);
        assert_eq!(
            select_parents(&[1.0], &mut rng, DegenerateSelection::Uniform),
            Err(HarmonyError::InvalidInput(InputError::PopulationTooSmall(1)))
        );
    }

    #[test]
    fn test_first_parent_frequency_tracks_fitness() {
        let mut rng = ChromosomeRng::new(1234);
        let trials = 4000;
        let mut heavy = 0;
        for _ in 0..trials {
            let (first, _) =
                select_parents(&[1.0, 3.0], &mut rng, DegenerateSelection::Fail).unwrap();
            if first == 1 {
                heavy += 1;
            }
        }
        let ratio = heavy as f64 / trials as f64;
        assert!((ratio - 0.75).abs() < 0.05, "ratio {ratio}");
    }
}
