//! Simulation constants and defaults shared by the library and the binary.

/// Smallest grid on which the two corners are distinct cells.
pub const MIN_GRID_SIZE: usize = 2;

/// Default grid size (5×5, five meeting points A..E).
pub const DEFAULT_GRID_SIZE: usize = 5;

/// Default number of trials per batch.
pub const DEFAULT_TRIAL_COUNT: u64 = 10_000;

/// Default RNG seed for the command-line wrapper.
pub const DEFAULT_SEED: u64 = 42;

/// Trials per parallel work unit.
///
/// The batch is split into chunks of this size regardless of the thread
/// count, and each chunk gets its own stream, so a parallel run is
/// reproducible on any machine.
pub const PARALLEL_CHUNK_TRIALS: u64 = 4096;

/// Label of the first meeting point (row 0).
pub const FIRST_LABEL: u8 = b'A';

/// Letters available before labels roll over to two characters (`Z` → `AA`).
pub const LABEL_ALPHABET: usize = 26;
