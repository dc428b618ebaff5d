//! Error type shared by every numeric stage of the pipeline.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by conditioning, synthesis and matched filtering.
///
/// None of these are retried: every computation is a pure function of its
/// inputs, so the caller is expected to change the input (or keep showing the
/// last valid result) instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A source parameter is outside its physically valid range.
    #[error("parameter '{param}' = {value} outside valid range [{min}, {max}]")]
    Domain {
        /// Name of the offending parameter.
        param: &'static str,
        /// The rejected value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// Two sequences that must line up have different lengths.
    #[error("length mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Operation that detected the mismatch.
        context: &'static str,
        /// Required length.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },

    /// A PSD was evaluated outside the frequency range it is defined on.
    #[error("PSD evaluated at {frequency} Hz, outside its support [{min}, {max}] Hz")]
    PsdCoverage {
        /// Requested frequency.
        frequency: f64,
        /// Lowest tabulated frequency.
        min: f64,
        /// Highest tabulated frequency.
        max: f64,
    },

    /// A PSD evaluated to zero, a negative value, or a non-finite value.
    #[error("PSD value {value} at {frequency} Hz is not strictly positive")]
    InvalidPsd {
        /// Frequency at which the PSD was evaluated.
        frequency: f64,
        /// The offending value.
        value: f64,
    },

    /// Band-pass edges are inverted or fall outside (0, Nyquist).
    #[error("invalid band [{low}, {high}] Hz for sample rate {sample_rate} Hz")]
    InvalidBand {
        /// Lower edge in Hz.
        low: f64,
        /// Upper edge in Hz.
        high: f64,
        /// Sample rate in Hz.
        sample_rate: f64,
    },

    /// The waveform oracle failed or produced non-finite output.
    #[error("waveform oracle failure: {0}")]
    Oracle(String),

    /// Any other malformed numeric input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a shape mismatch error.
    pub fn shape(context: &'static str, expected: usize, found: usize) -> Self {
        Error::ShapeMismatch {
            context,
            expected,
            found,
        }
    }

    /// Check that two lengths agree.
    pub fn check_len(context: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Error::shape(context, expected, found))
        }
    }

    /// Whether this error is a parameter-domain advisory rather than a failure
    /// of the computation itself.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::Domain { .. })
    }
}
