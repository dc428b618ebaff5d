//! Whitening and band-pass conditioning of strain series.

use crate::error::{Error, Result};
use crate::fft::{Fft, rfftfreq};
use crate::iir::SosFilter;
use crate::psd::Psd;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Butterworth order used for strain band-passing.
pub const BANDPASS_ORDER: usize = 4;

/// Frequency band in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower edge (Hz).
    pub low: f64,
    /// Upper edge (Hz).
    pub high: f64,
}

impl Band {
    /// Create a band from its edges.
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Band width in Hz.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Check that the band is ordered and lies strictly inside `(0, fs/2)`.
    pub fn validate(&self, sample_rate: f64) -> Result<()> {
        let nyquist = sample_rate / 2.0;
        let ok = self.low.is_finite()
            && self.high.is_finite()
            && sample_rate.is_finite()
            && self.low > 0.0
            && self.high < nyquist
            && self.low < self.high;
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidBand {
                low: self.low,
                high: self.high,
                sample_rate,
            })
        }
    }
}

impl Default for Band {
    fn default() -> Self {
        Self::new(35.0, 350.0)
    }
}

/// Whiten `strain` by the amplitude spectral density of `psd`.
///
/// Equivalent to [`whiten_shifted`] with no phase or time shift.
pub fn whiten(strain: &[f64], psd: &dyn Psd, dt: f64) -> Result<Vec<f64>> {
    whiten_shifted(strain, psd, dt, 0.0, 0.0)
}

/// Whiten `strain`, applying a constant phase shift (rad) and a time shift (s).
///
/// Each positive-frequency bin is multiplied by
/// `exp(−i·2π·time_shift·f − i·phase_shift)`, divided by `sqrt(psd(f))` and
/// scaled by `sqrt(2·dt)`. The output has the input's length. The PSD must
/// cover `[0, 1/(2·dt)]`.
pub fn whiten_shifted(
    strain: &[f64],
    psd: &dyn Psd,
    dt: f64,
    phase_shift: f64,
    time_shift: f64,
) -> Result<Vec<f64>> {
    let n = strain.len();
    if n == 0 {
        return Err(Error::InvalidInput("cannot whiten an empty series".into()));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(Error::InvalidInput(format!("sample interval {dt} must be positive")));
    }

    let freqs = rfftfreq(n, dt);
    let power = psd.evaluate(&freqs)?;

    let fft = Fft::new(n);
    let mut spectrum = fft.forward_real(strain);

    let norm = (2.0 * dt).sqrt();
    for ((bin, &f), &p) in spectrum.iter_mut().zip(&freqs).zip(&power) {
        let shift = Complex64::from_polar(1.0, -2.0 * PI * time_shift * f - phase_shift);
        *bin = *bin * shift * (norm / p.sqrt());
    }

    Ok(fft.inverse_real(&spectrum))
}

/// Zero-phase 4th-order Butterworth band-pass over `band`.
///
/// The output is divided by `sqrt(band_width / (fs/2))` so that white noise
/// keeps unit variance per unit bandwidth.
pub fn bandpass(strain: &[f64], band: Band, sample_rate: f64) -> Result<Vec<f64>> {
    band.validate(sample_rate)?;
    let nyquist = sample_rate / 2.0;
    let filter = SosFilter::butterworth_bandpass(BANDPASS_ORDER, band.low / nyquist, band.high / nyquist)?;
    let normalization = (band.width() / nyquist).sqrt();
    let mut out = filter.filtfilt(strain)?;
    for x in &mut out {
        *x /= normalization;
    }
    Ok(out)
}
