//! Error types for the core model
//!
//! Everything here is a configuration-time error: once a format, a layer, or
//! a network validates, no operation in this crate can fail at runtime.
//! Numeric overflow in particular is never an error — it resolves through
//! the configured overflow policy.

use thiserror::Error;

/// Result type alias for core-model operations
pub type Result<T> = std::result::Result<T, ChipError>;

/// Configuration-time errors from the core model
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChipError {
    /// Word format wider than the backing storage allows
    #[error("word format {integral}.{fractional} too wide: {total} total bits exceeds {max}")]
    FormatTooWide {
        /// Integral bits requested
        integral: u32,
        /// Fractional bits requested
        fractional: u32,
        /// Total bits requested
        total: u32,
        /// Maximum supported total bits
        max: u32,
    },

    /// Word format too narrow to represent the activation constants exactly
    #[error("word format {integral}.{fractional} needs at least {min} fractional bits")]
    FractionTooNarrow {
        /// Integral bits requested
        integral: u32,
        /// Fractional bits requested
        fractional: u32,
        /// Minimum fractional bits
        min: u32,
    },

    /// Signed format with no room for a sign bit
    #[error("word format needs at least one integral bit for the sign")]
    NoSignBit,

    /// Weight matrix row count disagrees with the declared dimensions
    #[error("layer {layer}: weight matrix has {got} rows, dims declare {expected}")]
    WeightRowCount {
        /// Offending layer index
        layer: usize,
        /// Declared row count
        expected: usize,
        /// Actual row count
        got: usize,
    },

    /// A weight row's column count disagrees with the declared dimensions
    #[error("layer {layer}, row {row}: weight row has {got} columns, dims declare {expected}")]
    WeightColCount {
        /// Offending layer index
        layer: usize,
        /// Offending row index
        row: usize,
        /// Declared column count
        expected: usize,
        /// Actual column count
        got: usize,
    },

    /// Bias vector length disagrees with the declared dimensions
    #[error("layer {layer}: bias vector has {got} entries, dims declare {expected}")]
    BiasCount {
        /// Offending layer index
        layer: usize,
        /// Declared entry count
        expected: usize,
        /// Actual entry count
        got: usize,
    },

    /// Adjacent layers disagree on the bus width between them
    #[error("layer {layer}: expects {expected} inputs but the previous layer produces {got}")]
    WidthMismatch {
        /// Offending (downstream) layer index
        layer: usize,
        /// Input width the layer declares
        expected: usize,
        /// Output width the previous layer produces
        got: usize,
    },

    /// Network with no layers
    #[error("network has no layers")]
    EmptyNetwork,
}
