//! Batch runner: repeats trials and counts outcomes per meeting point.
//!
//! Three ways to run a batch:
//! - [`simulate_batch`]: one continued coin stream, sequential.
//! - [`simulate_batch_cancellable`]: same, with a cooperative cancel flag
//!   checked between trials; a cancelled run returns its partial counts.
//! - [`simulate_batch_parallel`]: fixed-size chunks on rayon, each chunk on
//!   its own `SmallRng` seeded from a SplitMix64 master stream. Partial
//!   aggregates are merged by elementwise addition, so the result depends on
//!   the seed only, never on the thread count.
//!
//! The two streams differ, so one seed gives different aggregates in
//! sequential and parallel mode. [`BatchReport::mode`] records which was used.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::constants::PARALLEL_CHUNK_TRIALS;
use crate::error::{ConfigIssue, Result};
use crate::types::{GridSize, MeetingPoint, SimulationConfig};

use super::engine::{simulate_trial, TrialOutcome};
use super::fast_prng::SplitMix64;
use super::path::CoinSource;
use super::statistics::{summarize, Summary};

/// Outcome counts of a batch: one bucket per meeting point plus NoMeeting.
///
/// Invariant: `trials() == meetings() + no_meeting()`, and only the N
/// anti-diagonal points have buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AggregateResult {
    #[serde(rename = "grid_size")]
    grid: GridSize,
    /// Indexed by meeting point row (A = 0).
    counts: Vec<u64>,
    no_meeting: u64,
}

impl AggregateResult {
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            counts: vec![0; grid.get()],
            no_meeting: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn record(&mut self, outcome: &TrialOutcome) {
        match outcome {
            TrialOutcome::Met { point, .. } => self.counts[point.index] += 1,
            TrialOutcome::NoMeeting => self.no_meeting += 1,
        }
    }

    /// Add another partial aggregate of the same grid into this one.
    pub(crate) fn merge(&mut self, other: &AggregateResult) {
        debug_assert_eq!(self.grid, other.grid);
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        self.no_meeting += other.no_meeting;
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Counts per meeting point, A first.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn count_at(&self, point: &MeetingPoint) -> u64 {
        self.counts.get(point.index).copied().unwrap_or(0)
    }

    pub fn no_meeting(&self) -> u64 {
        self.no_meeting
    }

    pub fn meetings(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn trials(&self) -> u64 {
        self.meetings() + self.no_meeting
    }

    /// `(point, count)` for every meeting point, A first.
    pub fn iter(&self) -> impl Iterator<Item = (MeetingPoint, u64)> + '_ {
        self.grid.meeting_points().zip(self.counts.iter().copied())
    }
}

/// A batch that may have stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRun {
    pub aggregate: AggregateResult,
    /// `false` when the cancel flag stopped the batch before `trial_count`.
    pub completed: bool,
}

/// How a seed was turned into coin streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// SplitMix64-derived `SmallRng` per chunk of `PARALLEL_CHUNK_TRIALS`.
    Parallel,
    /// One `SmallRng` seeded directly, one thread.
    Sequential,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchMode::Parallel => write!(f, "parallel chunks"),
            BatchMode::Sequential => write!(f, "sequential stream"),
        }
    }
}

/// Result of [`run_simulation`] or [`run_simulation_sequential`].
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Seed actually used (drawn when the config left it open).
    pub seed: u64,
    /// Reproducing the aggregate needs both the seed and the mode.
    pub mode: BatchMode,
    pub aggregate: AggregateResult,
    pub summary: Summary,
    #[serde(skip)]
    pub elapsed: Duration,
}

fn check_trial_count(trial_count: u64) -> Result<()> {
    if trial_count == 0 {
        return Err(ConfigIssue::NoTrials.into());
    }
    Ok(())
}

/// Run `trial_count` trials on one continued coin stream.
pub fn simulate_batch<C: CoinSource + ?Sized>(
    grid: GridSize,
    trial_count: u64,
    coins: &mut C,
) -> Result<AggregateResult> {
    check_trial_count(trial_count)?;
    let mut aggregate = AggregateResult::new(grid);
    for _ in 0..trial_count {
        aggregate.record(&simulate_trial(grid, coins));
    }
    Ok(aggregate)
}

/// Like [`simulate_batch`], checking `cancel` before every trial.
pub fn simulate_batch_cancellable<C: CoinSource + ?Sized>(
    grid: GridSize,
    trial_count: u64,
    coins: &mut C,
    cancel: &AtomicBool,
) -> Result<BatchRun> {
    check_trial_count(trial_count)?;
    let mut aggregate = AggregateResult::new(grid);
    for _ in 0..trial_count {
        if cancel.load(Ordering::Relaxed) {
            debug!(
                completed_trials = aggregate.trials(),
                trial_count, "batch cancelled"
            );
            return Ok(BatchRun {
                aggregate,
                completed: false,
            });
        }
        aggregate.record(&simulate_trial(grid, coins));
    }
    Ok(BatchRun {
        aggregate,
        completed: true,
    })
}

/// Run `trial_count` trials across the rayon pool.
pub fn simulate_batch_parallel(
    grid: GridSize,
    trial_count: u64,
    seed: u64,
) -> Result<AggregateResult> {
    check_trial_count(trial_count)?;
    Ok(run_chunks(grid, trial_count, seed, || false))
}

/// Like [`simulate_batch_parallel`], checking `cancel` between trials in
/// every chunk.
pub fn simulate_batch_parallel_cancellable(
    grid: GridSize,
    trial_count: u64,
    seed: u64,
    cancel: &AtomicBool,
) -> Result<BatchRun> {
    check_trial_count(trial_count)?;
    Ok(run_chunks_until(grid, trial_count, seed, || {
        cancel.load(Ordering::Relaxed)
    }))
}

fn run_chunks_until<S>(grid: GridSize, trial_count: u64, seed: u64, stop: S) -> BatchRun
where
    S: Fn() -> bool + Sync,
{
    let aggregate = run_chunks(grid, trial_count, seed, stop);
    let completed = aggregate.trials() == trial_count;
    if !completed {
        debug!(
            completed_trials = aggregate.trials(),
            trial_count, "parallel batch cancelled"
        );
    }
    BatchRun {
        aggregate,
        completed,
    }
}

/// `stop` is polled before every trial in every chunk.
fn run_chunks<S>(grid: GridSize, trial_count: u64, seed: u64, stop: S) -> AggregateResult
where
    S: Fn() -> bool + Sync,
{
    let num_chunks = trial_count.div_ceil(PARALLEL_CHUNK_TRIALS) as usize;
    let chunk_seeds = SplitMix64::new(seed).derive_seeds(num_chunks);
    debug!(grid = grid.get(), trial_count, num_chunks, "parallel batch");

    chunk_seeds
        .into_par_iter()
        .enumerate()
        .map(|(chunk, chunk_seed)| {
            let start = chunk as u64 * PARALLEL_CHUNK_TRIALS;
            let len = PARALLEL_CHUNK_TRIALS.min(trial_count - start);
            let mut rng = SmallRng::seed_from_u64(chunk_seed);
            let mut partial = AggregateResult::new(grid);
            for _ in 0..len {
                if stop() {
                    break;
                }
                partial.record(&simulate_trial(grid, &mut rng));
            }
            partial
        })
        .reduce(
            || AggregateResult::new(grid),
            |mut acc, partial| {
                acc.merge(&partial);
                acc
            },
        )
}

/// Validate `config`, run it in parallel and summarize.
pub fn run_simulation(config: &SimulationConfig) -> Result<BatchReport> {
    let grid = config.validate()?;
    let seed = config.random_seed.unwrap_or_else(rand::random);

    let start = Instant::now();
    let aggregate = simulate_batch_parallel(grid, config.trial_count, seed)?;
    finish_report(seed, BatchMode::Parallel, aggregate, start.elapsed())
}

/// Validate `config` and run it on one `SmallRng` seeded directly from the
/// seed, on the calling thread.
pub fn run_simulation_sequential(config: &SimulationConfig) -> Result<BatchReport> {
    let grid = config.validate()?;
    let seed = config.random_seed.unwrap_or_else(rand::random);

    let start = Instant::now();
    let mut rng = SmallRng::seed_from_u64(seed);
    let aggregate = simulate_batch(grid, config.trial_count, &mut rng)?;
    finish_report(seed, BatchMode::Sequential, aggregate, start.elapsed())
}

fn finish_report(
    seed: u64,
    mode: BatchMode,
    aggregate: AggregateResult,
    elapsed: Duration,
) -> Result<BatchReport> {
    let summary = summarize(&aggregate)?;

    info!(
        grid = aggregate.grid().get(),
        trials = aggregate.trials(),
        seed,
        %mode,
        meeting_rate = summary.meeting_rate,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "simulation finished"
    );

    Ok(BatchReport {
        seed,
        mode,
        aggregate,
        summary,
        elapsed,
    })
}
