//! Error taxonomy for seed set generation and search runs.
//!
//! Every variant is fatal to the strategy run that raised it. Recovery, if
//! any, happens at the experiment level by retrying the whole run with fresh
//! randomness (see [`crate::experiment::retry`]).

/// Errors raised by the influence-maximization core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InfluenceError {
    /// The requested budget exceeds the summed cost of every node.
    #[error("requested cost {requested} exceeds the total node cost {available}")]
    InfeasibleBudget {
        /// Budget asked for.
        requested: u64,
        /// Sum of all node costs.
        available: u64,
    },

    /// A bounded-retry loop could not produce enough distinct seed sets.
    #[error("generated {produced} of {requested} distinct seed sets in {attempts} attempts")]
    GenerationExhausted {
        /// Number of distinct seed sets required.
        requested: usize,
        /// Number actually produced before giving up.
        produced: usize,
        /// Attempts spent.
        attempts: usize,
    },

    /// Two orderings handed to recombination do not cover the same nodes.
    #[error("orderings are not permutations of the same node set: {reason}")]
    UncomparableOrderings {
        /// What did not match.
        reason: String,
    },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A retried strategy failed on every attempt.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts made.
        attempts: usize,
        /// Error from the final attempt.
        last: Box<InfluenceError>,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InfluenceError>;
