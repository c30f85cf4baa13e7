//! # Gridwalk: two walkers meeting on a square grid
//!
//! You start at the SW corner `(0, 0)` of an N×N grid, your friend at the NE
//! corner `(N-1, N-1)`. Every tick both of you flip a fair coin and take one
//! step toward the other: you go up or right, your friend goes down or left.
//! Each of you takes exactly N-1 steps. This crate estimates by Monte Carlo
//! how often, and where, the two of you end up on the same cell.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | Steps | [`simulation::path`] | One coin flip per step, from an injected [`simulation::CoinSource`] |
//! | Trial | [`simulation::engine`] | Drive both walkers tick by tick, stop at the first coincidence |
//! | Batch | [`simulation::batch`] | Count outcomes per meeting point (sequential, cancellable or rayon-parallel) |
//! | Summary | [`simulation::statistics`] | Empirical vs 1/N vs exact probabilities |
//!
//! ## Meeting points
//!
//! After `t` ticks your `row + col` is `t` and your friend's is `2(N-1) - t`,
//! so positions can only coincide at tick N-1, on the anti-diagonal
//! `(i, N-1-i)`. These N cells are labelled `A`, `B`, ... by increasing row.
//!
//! ## Theory
//!
//! The textbook baseline is 1/N per point. The exact distribution is
//! `C(N-1, i)^2 / 4^(N-1)` per point (see [`theory`]), which sums to
//! `C(2N-2, N-1) / 4^(N-1)`. Both are reported side by side so the empirical
//! data can be checked against each claim separately.

pub mod constants;
pub mod env_config;
pub mod error;
pub mod simulation;
pub mod theory;
pub mod types;

pub use error::{ConfigIssue, Result, SimulationError};
pub use types::{GridSize, MeetingPoint, Move, Position, SimulationConfig, Walker};
