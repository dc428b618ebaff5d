//! Frequency-domain matched filter.
//!
//! The template is correlated against the data with each frequency bin
//! weighted by the inverse noise power. Only the positive-frequency half of
//! the data spectrum is kept, so the inverse transform is complex and its
//! argument at the peak gives the template phase that maximizes the match.

use gwslider_core::{Complex64, Error, Fft, Psd, Result, fftfreq, roll, tukey};
use serde::{Deserialize, Serialize};

/// Tukey fraction applied to template and data before transforming.
pub const DEFAULT_TAPER_ALPHA: f64 = 0.25;

/// SNR that defines the horizon distance.
pub const DEFAULT_REFERENCE_SNR: f64 = 8.0;

/// Best-fit quantities from one matched-filter evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedFilterOutput {
    /// Peak SNR.
    pub snr: f64,
    /// Time-axis value at the peak.
    pub time_of_max: f64,
    /// Distance at which the template matches the data amplitude, in the
    /// template's distance units.
    pub effective_distance: f64,
    /// Distance at which the template would reach the reference SNR.
    pub horizon: f64,
    /// Phase (rad) that rotates the template onto the data.
    pub phase: f64,
    /// Template shift in samples; positive means the data arrives later.
    pub offset: isize,
    /// Template normalization `sqrt(⟨h|h⟩)`.
    pub sigma: f64,
    /// `|SNR|` at every lag, with zero lag at the center sample.
    pub snr_series: Vec<f64>,
}

/// Matched filter for series of one fixed length.
///
/// Caches the FFT plan, window and frequency axis so repeated evaluations
/// on the same grid only pay for the transforms.
pub struct MatchedFilter {
    fft: Fft,
    window: Vec<f64>,
    frequencies: Vec<f64>,
    sample_rate: f64,
    reference_snr: f64,
}

impl MatchedFilter {
    /// Filter for `len` samples at `sample_rate` with the default taper and
    /// reference SNR.
    pub fn new(len: usize, sample_rate: f64) -> Result<Self> {
        Self::with_options(len, sample_rate, DEFAULT_TAPER_ALPHA, DEFAULT_REFERENCE_SNR)
    }

    /// Filter with an explicit taper fraction and reference SNR.
    pub fn with_options(len: usize, sample_rate: f64, taper_alpha: f64, reference_snr: f64) -> Result<Self> {
        if len < 2 {
            return Err(Error::InvalidInput(format!(
                "matched filter needs at least two samples, got {len}"
            )));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidInput(format!(
                "sample rate {sample_rate} must be positive"
            )));
        }
        if !(reference_snr.is_finite() && reference_snr > 0.0) {
            return Err(Error::InvalidInput(format!(
                "reference SNR {reference_snr} must be positive"
            )));
        }
        Ok(Self {
            fft: Fft::new(len),
            window: tukey(len, taper_alpha),
            frequencies: fftfreq(len, 1.0 / sample_rate),
            sample_rate,
            reference_snr,
        })
    }

    /// Series length this filter was planned for.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    fn spectrum(&self, x: &[f64]) -> Vec<Complex64> {
        let windowed: Vec<f64> = x.iter().zip(&self.window).map(|(v, w)| v * w).collect();
        let mut spectrum = self.fft.forward(&windowed);
        let scale = 1.0 / self.sample_rate;
        for c in &mut spectrum {
            *c *= scale;
        }
        spectrum
    }

    /// Correlate `template` against `data`.
    ///
    /// `time` labels each sample and only feeds [`MatchedFilterOutput::time_of_max`].
    /// The PSD is evaluated at `|f|` for every FFT bin, so it must cover
    /// `[0, fs/2]`.
    pub fn run(&self, template: &[f64], data: &[f64], time: &[f64], psd: &dyn Psd) -> Result<MatchedFilterOutput> {
        let n = self.len();
        Error::check_len("matched filter template", n, template.len())?;
        Error::check_len("matched filter data", n, data.len())?;
        Error::check_len("matched filter time", n, time.len())?;

        let template_fft = self.spectrum(template);
        let mut data_fft = self.spectrum(data);
        let abs_freqs: Vec<f64> = self.frequencies.iter().map(|f| f.abs()).collect();
        let noise_power = psd.evaluate(&abs_freqs)?;

        for (d, &f) in data_fft.iter_mut().zip(&self.frequencies) {
            if f < 0.0 {
                *d = Complex64::new(0.0, 0.0);
            }
        }

        let mut optimal: Vec<Complex64> = data_fft
            .iter()
            .zip(&template_fft)
            .zip(&noise_power)
            .map(|((d, t), p)| d * t.conj() / p)
            .collect();
        self.fft.inverse_complex(&mut optimal);

        let df = self.sample_rate / n as f64;
        let sigmasq: f64 = 2.0
            * template_fft
                .iter()
                .zip(&noise_power)
                .map(|(t, p)| t.norm_sqr() / p)
                .sum::<f64>()
            * df;
        let sigma = sigmasq.abs().sqrt();
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(Error::InvalidInput(format!(
                "template normalization {sigma} is not positive; template has no in-band power"
            )));
        }

        let scale = 4.0 * self.sample_rate / sigma;
        let snr_complex: Vec<Complex64> = optimal.iter().map(|z| z * scale).collect();
        let zero_lag = n / 2;
        let snr_complex = roll(&snr_complex, zero_lag as isize);
        let snr_series: Vec<f64> = snr_complex.iter().map(|z| z.norm()).collect();

        let peak = snr_series
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0;
        let snr = snr_series[peak];

        Ok(MatchedFilterOutput {
            snr,
            time_of_max: time[peak],
            effective_distance: sigma / snr,
            horizon: sigma / self.reference_snr,
            phase: -snr_complex[peak].arg(),
            offset: peak as isize - zero_lag as isize,
            sigma,
            snr_series,
        })
    }
}

/// One-shot matched filter with the default taper and reference SNR.
///
/// # Example
///
/// ```rust
/// use gwslider_core::FlatPsd;
/// use gwslider_filter::matched_filter;
///
/// let fs = 256.0;
/// let n = 512;
/// let chirp: Vec<f64> = (0..n)
///     .map(|i| {
///         let t = (i as f64 - 256.0) / fs;
///         (-t * t * 200.0).exp() * (2.0 * std::f64::consts::PI * 40.0 * t).sin()
///     })
///     .collect();
/// let time: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();
///
/// let out = matched_filter(&chirp, &chirp, &time, &FlatPsd::new(1.0), fs).unwrap();
/// assert_eq!(out.offset, 0);
/// assert!((out.snr / out.sigma - 1.0).abs() < 1e-3);
/// ```
pub fn matched_filter(
    template: &[f64],
    data: &[f64],
    time: &[f64],
    psd: &dyn Psd,
    sample_rate: f64,
) -> Result<MatchedFilterOutput> {
    MatchedFilter::new(template.len(), sample_rate)?.run(template, data, time, psd)
}
