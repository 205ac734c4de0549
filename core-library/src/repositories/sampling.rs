//! Random sampling of distinct ordinals, used to pick recommendations.

use crate::error::{LibraryError, Result};
use rand::Rng;
use std::collections::HashSet;

/// Draw `count` distinct integers from `[1, upper_bound]`.
///
/// Uses rejection sampling; the output carries no ordering guarantee.
///
/// # Errors
///
/// [`LibraryError::InvalidArgument`] when `count <= 0`, `upper_bound <= 0`
/// or `count > upper_bound`.
pub fn sample_distinct<R>(rng: &mut R, count: i64, upper_bound: i64) -> Result<Vec<i64>>
where
    R: Rng + ?Sized,
{
    if count <= 0 {
        return Err(LibraryError::InvalidArgument(format!(
            "Sample size must be positive, got {}",
            count
        )));
    }

    if upper_bound <= 0 {
        return Err(LibraryError::InvalidArgument(format!(
            "Sample upper bound must be positive, got {}",
            upper_bound
        )));
    }

    if count > upper_bound {
        return Err(LibraryError::InvalidArgument(format!(
            "Cannot draw {} distinct values from a population of {}",
            count, upper_bound
        )));
    }

    let mut picked = HashSet::with_capacity(count as usize);
    let mut ordered = Vec::with_capacity(count as usize);

    while (ordered.len() as i64) < count {
        let candidate = rng.gen_range(1..=upper_bound);
        if picked.insert(candidate) {
            ordered.push(candidate);
        }
    }

    Ok(ordered)
}

/// Source of recommendation ordinals.
///
/// Implementations return `count` distinct 1-based ordinals out of
/// `population` rows. Callers only rely on that contract, so a ranking
/// engine can replace the random sampler without touching them.
pub trait Recommender: Send + Sync {
    fn pick(&self, count: i64, population: i64) -> Result<Vec<i64>>;
}

/// Uniform random picks backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRecommender;

impl Recommender for RandomRecommender {
    fn pick(&self, count: i64, population: i64) -> Result<Vec<i64>> {
        sample_distinct(&mut rand::thread_rng(), count, population)
    }
}
