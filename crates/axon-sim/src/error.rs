//! Error types for simulator construction
//!
//! Every error here is fatal at configuration time and surfaces before the
//! first tick executes. Nothing in the tick path returns a `Result`: every
//! state machine has a statically-computable tick bound, numeric overflow
//! resolves through the saturate policy, and the one defensive recovery
//! (an inconsistent FSM) self-heals to idle.

use axon_chip::ChipError;
use thiserror::Error;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while building a simulator instance
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Batch size does not evenly divide a neuron's input count
    #[error("batch size {batch} does not evenly divide input count {inputs}")]
    BatchNotDivisor {
        /// Configured input count
        inputs: usize,
        /// Configured batch size
        batch: usize,
    },

    /// Batch size of zero
    #[error("batch size must be at least 1")]
    ZeroBatch,

    /// Neuron constructed with no weights
    #[error("neuron has an empty weight vector")]
    NoWeights,

    /// Bit-rate too fast for the tick base to oversample
    #[error("clock {clock_hz} Hz cannot oversample bit rate {bit_rate} (need ≥ {min} ticks per bit)")]
    OversamplingTooLow {
        /// Configured clock frequency
        clock_hz: u32,
        /// Configured link bit rate
        bit_rate: u32,
        /// Minimum ticks per bit
        min: u32,
    },

    /// Synchronizer configured with no stages
    #[error("synchronizer needs at least one stage")]
    NoSyncStages,

    /// Core data-model error (format, topology, width chain)
    #[error(transparent)]
    Chip(#[from] ChipError),
}
