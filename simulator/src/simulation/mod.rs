//! Walk simulation and statistics.
//!
//! - [`path`]: Coin sources and per-walker step generation
//! - [`engine`]: One paired trial (plain or recorded frame by frame)
//! - [`batch`]: Repeated trials aggregated into per-point counts
//! - [`statistics`]: Empirical vs theoretical probabilities
//! - [`fast_prng`]: SplitMix64 for seed derivation and reproducible streams

pub mod batch;
pub mod engine;
pub mod fast_prng;
pub mod path;
pub mod statistics;

// Re-export commonly used items
pub use batch::{
    run_simulation, run_simulation_sequential, simulate_batch, simulate_batch_cancellable,
    simulate_batch_parallel, simulate_batch_parallel_cancellable, AggregateResult, BatchMode,
    BatchReport, BatchRun,
};
pub use engine::{
    simulate_trial, simulate_trial_with_recording, trace_trial, Frame, TrialOutcome, TrialRecord,
};
pub use fast_prng::SplitMix64;
pub use path::{generate_path, generate_step, walk_path, CoinSource, ScriptedCoins};
pub use statistics::{summarize, PointStatistics, Summary};
