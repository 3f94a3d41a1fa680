//! Empirical rank pseudo-observations.
//!
//! The family-selection path always runs on plain scaled ranks: average-tie
//! ranks divided by (n + 1), so every pseudo-observation lies strictly
//! inside (0, 1). The smoothed transforms in this module's siblings exist
//! for callers that need an invertible marginal, not for selection.

/// Average-tie ranks scaled by 1/(n + 1).
///
/// Ties receive the average of the ranks they span, matching the
/// conventional definition used for Kendall/copula pseudo-observations.
/// Returns an empty vector for empty input.
pub fn pseudo_observations(xs: &[f64]) -> Vec<f64> {
    let n = xs.len();
    if n == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..n).collect();
    // Total order: inputs are validated finite upstream.
    order.sort_by(|&a, &b| xs[a].partial_cmp(&xs[b]).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let scale = 1.0 / (n as f64 + 1.0);
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && xs[order[j]] == xs[order[i]] {
            j += 1;
        }
        // 1-based ranks i+1..=j averaged over the tie block.
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank * scale;
        }
        i = j;
    }
    ranks
}
