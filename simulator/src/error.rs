//! Error types for configuration and aggregation.

use thiserror::Error;

use crate::constants::MIN_GRID_SIZE;

/// Why a configuration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("grid size {0} is below the minimum of {min}", min = MIN_GRID_SIZE)]
    GridTooSmall(usize),

    #[error("trial count must be at least 1")]
    NoTrials,
}

/// Errors surfaced by the simulation entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Rejected before any simulation work began.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),

    /// Statistics requested for an aggregate that holds no trials.
    #[error("Insufficient data: aggregate contains no trials")]
    InsufficientData,
}

pub type Result<T> = std::result::Result<T, SimulationError>;
