//! Three-region piecewise-linear sigmoid approximation.
//!
//! Maps a wide accumulator value to a narrow activation value in [0,1):
//!
//! ```text
//! x ≤ −2.0625          →  0.0625
//! x ≥ +2.0625          →  0.9375
//! otherwise            →  resize(0.1875·x + 0.5)
//! ```
//!
//! The extremes are intentionally leaky (0.0625 and 0.9375, not 0 and 1) so
//! a downstream arg-max over saturated outputs stays well-defined.
//!
//! All six constants are fixed rationals with 1/16 granularity, quantized
//! into the configured word format once at configuration time. They are
//! exact whenever the format carries at least 4 fractional bits, which
//! [`WordFormat::new`](crate::word::WordFormat::new) enforces.

use crate::word::{FixedConfig, Word, WordFormat};

/// Lower input bound of the linear region.
pub const LOWER_BOUND: f64 = -2.0625;
/// Upper input bound of the linear region.
pub const UPPER_BOUND: f64 = 2.0625;
/// Output below the linear region.
pub const LOW_OUTPUT: f64 = 0.0625;
/// Output above the linear region.
pub const HIGH_OUTPUT: f64 = 0.9375;
/// Slope of the linear region.
pub const SLOPE: f64 = 0.1875;
/// Intercept of the linear region.
pub const INTERCEPT: f64 = 0.5;

/// Activation constants quantized for one word format.
///
/// Derived once at configuration time; [`activate`] is then pure and
/// bit-exact for the lifetime of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationConstants {
    /// Base (output) format.
    fmt: WordFormat,
    /// Input format — the double-width accumulator the core hands over.
    input_fmt: WordFormat,
    /// Lower bound, input format.
    lower: Word,
    /// Upper bound, input format.
    upper: Word,
    /// Low-side output, base format.
    low: Word,
    /// High-side output, base format.
    high: Word,
    /// Slope, base format.
    slope: Word,
    /// Intercept, pre-quantized into the slope·x product format.
    intercept: Word,
}

impl ActivationConstants {
    /// Quantize the canonical constants into `fmt`.
    pub fn derive(fmt: WordFormat) -> Self {
        let input_fmt = fmt.double();
        // slope (base) × x (double) lands in the field-wise sum format;
        // the intercept must be added there before the final resize.
        let product_fmt = WordFormat {
            integral_bits: fmt.integral_bits + input_fmt.integral_bits,
            fractional_bits: fmt.fractional_bits + input_fmt.fractional_bits,
        };
        Self {
            fmt,
            input_fmt,
            lower: Word::from_f64(LOWER_BOUND, input_fmt),
            upper: Word::from_f64(UPPER_BOUND, input_fmt),
            low: Word::from_f64(LOW_OUTPUT, fmt),
            high: Word::from_f64(HIGH_OUTPUT, fmt),
            slope: Word::from_f64(SLOPE, fmt),
            intercept: Word::from_f64(INTERCEPT, product_fmt),
        }
    }

    /// The format [`activate`] expects its input in.
    pub const fn input_format(&self) -> WordFormat {
        self.input_fmt
    }

    /// The format [`activate`] produces.
    pub const fn output_format(&self) -> WordFormat {
        self.fmt
    }
}

/// Apply the piecewise-linear activation to a double-width accumulator.
///
/// Pure: same input, same constants, same config — same bits out.
pub fn activate(x: Word, k: &ActivationConstants, cfg: FixedConfig) -> Word {
    debug_assert_eq!(x.format(), k.input_fmt, "activation input format");
    if x.raw() <= k.lower.raw() {
        k.low
    } else if x.raw() >= k.upper.raw() {
        k.high
    } else {
        let product = k.slope.mul(x);
        product.add(k.intercept, cfg).resize(k.fmt, cfg)
    }
}
