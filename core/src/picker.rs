//! Weighted random selection over ordered (option, weight) tables.
//!
//! Weights are relative: they are normalised by their total before
//! the single draw, so `[("a", 3.0), ("b", 1.0)]` and
//! `[("a", 0.75), ("b", 0.25)]` pick identically for the same roll.

use crate::{
    error::{GenError, GenResult},
    rng::SimRng,
};

/// Pick one option from `options`, proportionally to its weight.
///
/// Fails with a configuration error if the table is empty, holds a
/// negative weight, or its weights do not sum to something positive.
pub fn pick_weighted<'a, T>(options: &'a [(T, f64)], rng: &mut SimRng) -> GenResult<&'a T> {
    let index = pick_index(options.iter().map(|(_, w)| *w), rng)?;
    Ok(&options[index].0)
}

/// Index form of [`pick_weighted`], for tables not stored as pairs.
pub fn pick_index(weights: impl Iterator<Item = f64> + Clone, rng: &mut SimRng) -> GenResult<usize> {
    let mut total = 0.0;
    let mut count = 0usize;
    for w in weights.clone() {
        if w < 0.0 || w.is_nan() {
            return Err(GenError::config(format!("negative or NaN probability weight {w}")));
        }
        total += w;
        count += 1;
    }
    if count == 0 {
        return Err(GenError::config("cannot pick from an empty probability table"));
    }
    if total <= 0.0 {
        return Err(GenError::config(format!(
            "probability weights must sum to a positive total, got {total}"
        )));
    }

    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, w) in weights.enumerate() {
        if w > 0.0 {
            last_positive = i;
        }
        cumulative += w / total;
        if roll < cumulative {
            return Ok(i);
        }
    }
    // Rounding can leave the cumulative sum a hair under 1.0.
    Ok(last_positive)
}
