//! Noise power spectral density models.
//!
//! Conditioning and matched filtering only need point evaluations of a
//! one-sided PSD, so every model implements the small [`Psd`] trait. The
//! tabulated model is what event datasets carry; the flat model is used for
//! tests and for idealized white-noise studies.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Relative slack allowed at the edges of a tabulated support, so that a
/// Nyquist frequency computed as `k/(n·dt)` still lands inside a table that
/// ends at `1/(2·dt)`.
const EDGE_TOLERANCE: f64 = 1e-9;

/// One-sided noise power spectral density.
pub trait Psd {
    /// Frequency range `[min, max]` (Hz) over which the model is defined.
    fn support(&self) -> (f64, f64);

    /// Raw model value at `frequency` (Hz).
    ///
    /// Fails with [`Error::PsdCoverage`] outside [`Psd::support`]. The value
    /// is not checked for positivity; use [`Psd::evaluate`] for that.
    fn power(&self, frequency: f64) -> Result<f64>;

    /// Evaluate at every frequency, requiring strictly positive finite values.
    fn evaluate(&self, frequencies: &[f64]) -> Result<Vec<f64>> {
        frequencies
            .iter()
            .map(|&frequency| {
                let value = self.power(frequency)?;
                if value.is_finite() && value > 0.0 {
                    Ok(value)
                } else {
                    Err(Error::InvalidPsd { frequency, value })
                }
            })
            .collect()
    }
}

impl<P: Psd + ?Sized> Psd for &P {
    fn support(&self) -> (f64, f64) {
        (**self).support()
    }

    fn power(&self, frequency: f64) -> Result<f64> {
        (**self).power(frequency)
    }
}

/// Tabulated PSD with linear interpolation and no extrapolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PsdTable", into = "PsdTable")]
pub struct InterpolatedPsd {
    frequencies: Vec<f64>,
    power: Vec<f64>,
}

/// Serialized form of [`InterpolatedPsd`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsdTable {
    /// Ascending frequencies (Hz).
    pub frequencies: Vec<f64>,
    /// Power at each frequency (strain²/Hz).
    pub power: Vec<f64>,
}

impl InterpolatedPsd {
    /// Build from parallel frequency and power tables.
    ///
    /// Requires at least two points, equal lengths, finite values and
    /// strictly ascending frequencies.
    pub fn new(frequencies: Vec<f64>, power: Vec<f64>) -> Result<Self> {
        Error::check_len("PSD table", frequencies.len(), power.len())?;
        if frequencies.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "PSD table needs at least 2 points, got {}",
                frequencies.len()
            )));
        }
        if let Some(bad) = frequencies.iter().chain(&power).find(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "PSD table contains non-finite value {bad}"
            )));
        }
        if let Some(i) = frequencies.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::InvalidInput(format!(
                "PSD frequencies must be strictly ascending (index {} to {})",
                i,
                i + 1
            )));
        }
        Ok(Self { frequencies, power })
    }

    /// Tabulate any model on the given frequencies.
    pub fn tabulate(model: &dyn Psd, frequencies: &[f64]) -> Result<Self> {
        let power = frequencies
            .iter()
            .map(|&f| model.power(f))
            .collect::<Result<Vec<_>>>()?;
        Self::new(frequencies.to_vec(), power)
    }

    /// Tabulated frequencies.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Tabulated power values.
    pub fn values(&self) -> &[f64] {
        &self.power
    }
}

impl Psd for InterpolatedPsd {
    fn support(&self) -> (f64, f64) {
        (self.frequencies[0], self.frequencies[self.frequencies.len() - 1])
    }

    fn power(&self, frequency: f64) -> Result<f64> {
        let (min, max) = self.support();
        let slack = EDGE_TOLERANCE * max.abs().max(1.0);
        if !(frequency >= min - slack && frequency <= max + slack) {
            return Err(Error::PsdCoverage {
                frequency,
                min,
                max,
            });
        }
        let f = frequency.clamp(min, max);

        let upper = self
            .frequencies
            .partition_point(|&x| x < f)
            .clamp(1, self.frequencies.len() - 1);
        let lower = upper - 1;
        let (f0, f1) = (self.frequencies[lower], self.frequencies[upper]);
        let (p0, p1) = (self.power[lower], self.power[upper]);
        let t = (f - f0) / (f1 - f0);
        Ok(p0 + t * (p1 - p0))
    }
}

impl TryFrom<PsdTable> for InterpolatedPsd {
    type Error = Error;

    fn try_from(table: PsdTable) -> Result<Self> {
        Self::new(table.frequencies, table.power)
    }
}

impl From<InterpolatedPsd> for PsdTable {
    fn from(psd: InterpolatedPsd) -> Self {
        Self {
            frequencies: psd.frequencies,
            power: psd.power,
        }
    }
}

/// Frequency-independent PSD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatPsd {
    level: f64,
}

impl FlatPsd {
    /// Constant PSD of `level` at every non-negative frequency.
    pub fn new(level: f64) -> Self {
        Self { level }
    }

    /// The constant level.
    pub fn level(&self) -> f64 {
        self.level
    }
}

impl Psd for FlatPsd {
    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn power(&self, frequency: f64) -> Result<f64> {
        if frequency >= 0.0 {
            Ok(self.level)
        } else {
            Err(Error::PsdCoverage {
                frequency,
                min: 0.0,
                max: f64::INFINITY,
            })
        }
    }
}
