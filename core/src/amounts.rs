//! Donation amount sampling and per-batch decile ranking.

use crate::rng::SimRng;

pub const DECILES: usize = 10;

/// Smallest donation ever emitted.
pub const MIN_DONATION: f64 = 1.0;

/// Draw `n` donations from N(avg, std), floored at [`MIN_DONATION`].
pub fn sample_amounts(n: usize, avg_donation: f64, std_deviation: f64, rng: &mut SimRng) -> Vec<f64> {
    (0..n)
        .map(|_| rng.gaussian(avg_donation, std_deviation).max(MIN_DONATION))
        .collect()
}

/// Rank amounts into equal-frequency bins, 1 = lowest, 10 = highest.
///
/// Bin edges are the 0.0, 0.1, … 1.0 quantiles (linear interpolation).
/// Duplicate edges are dropped, so heavily tied batches end up with
/// fewer than ten bins instead of failing. A batch of identical
/// values ranks entirely as decile 1.
pub fn amount_deciles(amounts: &[f64]) -> Vec<u8> {
    if amounts.is_empty() {
        return Vec::new();
    }
    let mut sorted = amounts.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut edges: Vec<f64> = (0..=DECILES)
        .map(|i| quantile(&sorted, i as f64 / DECILES as f64))
        .collect();
    edges.dedup();

    if edges.len() < 2 {
        return vec![1; amounts.len()];
    }
    let interior = &edges[1..edges.len() - 1];
    amounts
        .iter()
        .map(|x| (interior.iter().filter(|edge| *x > **edge).count() + 1) as u8)
        .collect()
}

/// Linear-interpolated quantile of an already sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
