//! Shannon entropy over class distributions.

use crate::dataset::ClassDistribution;
use crate::error::TreeError;

/// Entropy of a class distribution: `Σ p · ln(1/p)` with `p = count/total`.
///
/// `total` must be the sum of the counts and must be positive. A pure
/// distribution (single label) yields exactly `0.0`. Zero-count labels must
/// not appear in the map; the counting in [`crate::dataset::DatasetView`]
/// never produces them, but a zero slipping in would mean evaluating
/// `0 · ln(∞)`, so it is rejected rather than defined away.
pub fn entropy(distribution: &ClassDistribution, total: usize) -> Result<f64, TreeError> {
    if total == 0 {
        return Err(TreeError::EmptyDistribution);
    }
    let mut entropy = 0.0;
    for &count in distribution.values() {
        if count == 0 {
            return Err(TreeError::EmptyDistribution);
        }
        let p = count as f64 / total as f64;
        entropy += p * (1.0 / p).ln();
    }
    Ok(entropy)
}

/// Sample-weighted entropy of a two-way split:
/// `(n_left/n_total)·H_left + (n_right/n_total)·H_right`.
///
/// `n_total` is the parent's row count and equals `n_left + n_right`.
pub fn weighted_entropy(
    entropy_left: f64,
    entropy_right: f64,
    n_left: usize,
    n_right: usize,
    n_total: usize,
) -> f64 {
    debug_assert_eq!(n_left + n_right, n_total);
    (n_left as f64 / n_total as f64) * entropy_left
        + (n_right as f64 / n_total as f64) * entropy_right
}
