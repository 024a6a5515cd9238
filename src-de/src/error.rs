//! Error types for the Differential Evolution optimizer.
//!
//! Precondition violations (bad configuration, bad constraints) are caught at
//! construction time. Running out of retries while looking for a trial that
//! satisfies every constraint is the only error a generation step can raise.

use thiserror::Error;

/// Errors that can occur while configuring or running Differential Evolution.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DEError {
    /// Population size is too small (must be >= 4).
    #[error("population size ({pop_size}) must be >= 4")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
    },

    /// The cost function declares zero parameters.
    #[error("cost function must declare at least one parameter")]
    NoParameters,

    /// The cost function returned a constraint list of the wrong length.
    #[error("constraint count mismatch: expected {expected}, got {got}")]
    ConstraintCountMismatch {
        /// Declared parameter count
        expected: usize,
        /// Number of constraints returned
        got: usize,
    },

    /// An enabled constraint has lower > upper (or a NaN bound).
    #[error("invalid constraint at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidConstraint {
        /// Dimension of the invalid constraint
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// Mutation factor is out of valid range [0, 2].
    #[error("invalid mutation factor: {factor} (must be in [0, 2])")]
    InvalidMutationFactor {
        /// The invalid mutation factor
        factor: f64,
    },

    /// Crossover rate is out of valid range [0, 1].
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid crossover rate
        rate: f64,
    },

    /// The per-slot retry budget must allow at least one attempt.
    #[error("max_constraint_retries must be >= 1")]
    InvalidRetryLimit,

    /// The sampling range for unconstrained dimensions is not a finite interval.
    #[error("invalid unbounded init range: [{lower}, {upper}]")]
    InvalidUnboundedRange {
        /// Lower end of the proxy range
        lower: f64,
        /// Upper end of the proxy range
        upper: f64,
    },

    /// A generation was requested before the population was initialized.
    #[error("population is not initialized")]
    NotInitialized,

    /// No trial satisfying every constraint was found for a population slot.
    #[error("no feasible trial found for slot {slot} after {attempts} attempts")]
    InfeasibleTrial {
        /// Population slot being processed
        slot: usize,
        /// Number of trials generated and rejected
        attempts: usize,
    },
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DEError>;

impl DEError {
    /// Returns `true` if this is a configuration-related error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DEError::PopulationTooSmall { .. }
                | DEError::InvalidMutationFactor { .. }
                | DEError::InvalidCrossoverRate { .. }
                | DEError::InvalidRetryLimit
                | DEError::InvalidUnboundedRange { .. }
        )
    }

    /// Returns `true` if the cost function broke its contract
    /// (parameter count or constraint list).
    pub fn is_constraint_error(&self) -> bool {
        matches!(
            self,
            DEError::NoParameters
                | DEError::ConstraintCountMismatch { .. }
                | DEError::InvalidConstraint { .. }
        )
    }

    /// Returns `true` if the error was raised while running, not while building.
    pub fn is_runtime_error(&self) -> bool {
        matches!(self, DEError::NotInitialized | DEError::InfeasibleTrial { .. })
    }
}
