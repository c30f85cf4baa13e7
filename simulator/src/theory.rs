//! Closed-form meeting probabilities.
//!
//! You reach meeting point `i` iff exactly `i` of your N-1 flips are tails
//! (up), so `P = C(N-1, i) / 2^(N-1)`. Your friend reaches the same point with
//! the same probability, independently, which gives
//! `C(N-1, i)^2 / 4^(N-1)` per point and, by Vandermonde's identity,
//! `C(2N-2, N-1) / 4^(N-1)` in total.
//!
//! Binomials are evaluated in log space: `2^-(N-1)` underflows `f64` past
//! N ≈ 1075, while the ratio stays representable.

use std::f64::consts::LN_2;

use crate::types::GridSize;

/// The textbook baseline: 1/N for every meeting point.
pub fn theoretical_point_probability(grid: GridSize) -> f64 {
    1.0 / grid.get() as f64
}

/// `ln C(n, k)` via the multiplicative formula.
fn ln_binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (1..=k)
        .map(|j| ((n - k + j) as f64).ln() - (j as f64).ln())
        .sum()
}

/// Probability that one walker's path ends on meeting point `index`.
pub fn path_probability(grid: GridSize, index: usize) -> f64 {
    let steps = grid.steps();
    if index > steps {
        return 0.0;
    }
    (ln_binomial(steps, index) - steps as f64 * LN_2).exp()
}

/// Probability that both walkers end on meeting point `index`.
pub fn exact_point_probability(grid: GridSize, index: usize) -> f64 {
    let p = path_probability(grid, index);
    p * p
}

/// Exact per-point probabilities, A first.
pub fn exact_point_distribution(grid: GridSize) -> Vec<f64> {
    (0..grid.get())
        .map(|i| exact_point_probability(grid, i))
        .collect()
}

/// Probability that the walkers meet at all: `C(2N-2, N-1) / 4^(N-1)`.
pub fn exact_meeting_probability(grid: GridSize) -> f64 {
    let steps = grid.steps();
    (ln_binomial(2 * steps, steps) - 2.0 * steps as f64 * LN_2).exp()
}
