//! Shared environment configuration for the gridwalk binaries.
//!
//! Consolidates the `RAYON_NUM_THREADS` and `RUST_LOG` reads.

use tracing_subscriber::EnvFilter;

/// Default worker count when neither variable is set.
const DEFAULT_THREADS: usize = 8;

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8).
fn requested_threads() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_THREADS)
}

/// Build the rayon global thread pool. Tolerates an already-initialized
/// pool. Returns the thread count actually in use.
pub fn init_rayon_threads() -> usize {
    let num_threads = requested_threads();
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        tracing::debug!(%err, "rayon pool already initialized");
    }
    rayon::current_num_threads()
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
