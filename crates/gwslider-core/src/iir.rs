//! Butterworth IIR design and zero-phase filtering.
//!
//! Filters are realized as cascades of second-order sections (biquads) in
//! Direct Form II Transposed, which stays well conditioned for the narrow
//! normalized bands used on strain data.
//!
//! The band-pass design follows the classic analog route: Butterworth
//! low-pass prototype poles, low-pass → band-pass transformation around the
//! pre-warped band edges, then the bilinear transform. An order-`N` design
//! therefore has `2N` poles and `N` sections.

use crate::error::{Error, Result};
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// A single second-order section.
///
/// Transfer function: `H(z) = (b0 + b1 z⁻¹ + b2 z⁻²) / (1 + a1 z⁻¹ + a2 z⁻²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    /// Numerator coefficients `[b0, b1, b2]`
    b: [f64; 3],
    /// Denominator coefficients `[a1, a2]` (a0 normalized to 1)
    a: [f64; 2],
}

impl Biquad {
    /// Create a section from numerator and normalized denominator coefficients.
    pub fn new(b: [f64; 3], a: [f64; 2]) -> Self {
        Self { b, a }
    }

    /// Numerator coefficients.
    pub fn numerator(&self) -> &[f64; 3] {
        &self.b
    }

    /// Denominator coefficients `[a1, a2]`.
    pub fn denominator(&self) -> &[f64; 2] {
        &self.a
    }

    /// Gain at DC (`z = 1`).
    pub fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (1.0 + self.a[0] + self.a[1])
    }

    /// Steady-state delay-line contents for a unit step input.
    fn step_state(&self) -> [f64; 2] {
        let g = self.dc_gain();
        [g - self.b[0], self.b[2] - self.a[1] * g]
    }

    /// Complex response at normalized angular frequency `omega` (rad/sample).
    pub fn response(&self, omega: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = self.b[0] + self.b[1] * z1 + self.b[2] * z2;
        let den = 1.0 + self.a[0] * z1 + self.a[1] * z2;
        num / den
    }

    /// Whether both poles lie inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }

    /// Run the section over `input` starting from delay-line state `state`.
    fn run(&self, input: &mut [f64], mut state: [f64; 2]) {
        let [b0, b1, b2] = self.b;
        let [a1, a2] = self.a;
        for x in input.iter_mut() {
            let u = *x;
            let y = b0 * u + state[0];
            state[0] = b1 * u - a1 * y + state[1];
            state[1] = b2 * u - a2 * y;
            *x = y;
        }
    }
}

/// Cascade of second-order sections.
#[derive(Debug, Clone, PartialEq)]
pub struct SosFilter {
    sections: Vec<Biquad>,
}

impl SosFilter {
    /// Build a filter from explicit sections.
    pub fn new(sections: Vec<Biquad>) -> Self {
        Self { sections }
    }

    /// Design a Butterworth band-pass filter.
    ///
    /// `low` and `high` are band edges normalized to the Nyquist frequency and
    /// must satisfy `0 < low < high < 1`. The result has `order` sections and
    /// unity gain at the (warped) geometric center of the band.
    pub fn butterworth_bandpass(order: usize, low: f64, high: f64) -> Result<Self> {
        if order == 0 {
            return Err(Error::InvalidInput("filter order must be at least 1".into()));
        }
        if !(low > 0.0 && high < 1.0 && low < high) {
            return Err(Error::InvalidInput(format!(
                "normalized band [{low}, {high}] must satisfy 0 < low < high < 1"
            )));
        }

        // Work at fs = 2 so normalized edges map straight onto the warp.
        let fs2 = 4.0;
        let w1 = fs2 * (PI * low / 2.0).tan();
        let w2 = fs2 * (PI * high / 2.0).tan();
        let bw = w2 - w1;
        let w0_sq = w1 * w2;

        let mut upper_poles = Vec::with_capacity(order);
        for k in 0..order {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            let p = Complex64::from_polar(1.0, theta);
            let a = p * (bw / 2.0);
            let d = (a * a - w0_sq).sqrt();
            for s in [a + d, a - d] {
                if s.im > 0.0 {
                    upper_poles.push(s);
                }
            }
        }
        if upper_poles.len() != order {
            return Err(Error::InvalidInput(format!(
                "band-pass design produced {} complex pole pairs, expected {order}",
                upper_poles.len()
            )));
        }

        let mut sections: Vec<Biquad> = upper_poles
            .iter()
            .map(|&s| {
                let z = (fs2 + s) / (fs2 - s);
                Biquad::new([1.0, 0.0, -1.0], [-2.0 * z.re, z.norm_sqr()])
            })
            .collect();

        let omega_c = 2.0 * (w0_sq.sqrt() / fs2).atan();
        let mut filter = Self::new(sections.clone());
        let gain = filter.response(omega_c).norm();
        if !(gain.is_finite() && gain > 0.0) {
            return Err(Error::InvalidInput(format!(
                "band-pass design has degenerate center gain {gain}"
            )));
        }
        let per_section = gain.powf(-1.0 / order as f64);
        for section in &mut sections {
            for b in &mut section.b {
                *b *= per_section;
            }
        }
        filter.sections = sections;
        Ok(filter)
    }

    /// The sections of the cascade.
    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Complex response at normalized angular frequency `omega` (rad/sample).
    pub fn response(&self, omega: f64) -> Complex64 {
        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, s| acc * s.response(omega))
    }

    /// Whether every section is stable.
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(Biquad::is_stable)
    }

    /// Number of samples of odd extension used by [`Self::filtfilt`].
    pub fn pad_len(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Causal filtering from rest.
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let mut out = input.to_vec();
        for section in &self.sections {
            section.run(&mut out, [0.0, 0.0]);
        }
        out
    }

    /// Causal filtering with every section started in the steady state for a
    /// constant input equal to `x0`.
    fn filter_steady(&self, buffer: &mut [f64], x0: f64) {
        let mut scale = x0;
        for section in &self.sections {
            let [s0, s1] = section.step_state();
            section.run(buffer, [s0 * scale, s1 * scale]);
            scale *= section.dc_gain();
        }
    }

    /// Zero-phase forward-backward filtering.
    ///
    /// The input is extended at both ends by an odd reflection of
    /// [`Self::pad_len`] samples and each pass starts from steady-state
    /// initial conditions, which suppresses start-up transients. The
    /// magnitude response is the square of [`Self::response`].
    pub fn filtfilt(&self, input: &[f64]) -> Result<Vec<f64>> {
        let n = input.len();
        let pad = self.pad_len();
        if n <= pad {
            return Err(Error::InvalidInput(format!(
                "filtfilt needs more than {pad} samples, got {n}"
            )));
        }

        let first = input[0];
        let last = input[n - 1];
        let mut ext = Vec::with_capacity(n + 2 * pad);
        ext.extend((1..=pad).rev().map(|i| 2.0 * first - input[i]));
        ext.extend_from_slice(input);
        ext.extend((1..=pad).map(|i| 2.0 * last - input[n - 1 - i]));

        let x0 = ext[0];
        self.filter_steady(&mut ext, x0);

        ext.reverse();
        let y0 = ext[0];
        self.filter_steady(&mut ext, y0);
        ext.reverse();

        Ok(ext[pad..pad + n].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> SosFilter {
        // 35–350 Hz at 4096 Hz
        SosFilter::butterworth_bandpass(4, 35.0 * 2.0 / 4096.0, 350.0 * 2.0 / 4096.0).unwrap()
    }

    fn omega(freq: f64, fs: f64) -> f64 {
        2.0 * PI * freq / fs
    }

    #[test]
    fn test_bandpass_has_order_sections_and_is_stable() {
        let filter = design();
        assert_eq!(filter.sections().len(), 4);
        assert!(filter.is_stable());
    }

    #[test]
    fn test_bandpass_unity_at_center_half_power_at_edges() {
        let fs = 4096.0;
        let filter = design();
        let t1 = (PI * 35.0 / fs).tan();
        let t2 = (PI * 350.0 / fs).tan();
        let center = fs / PI * (t1 * t2).sqrt().atan();
        assert!((filter.response(omega(center, fs)).norm() - 1.0).abs() < 1e-9);

        let edge_gain = std::f64::consts::FRAC_1_SQRT_2;
        assert!((filter.response(omega(35.0, fs)).norm() - edge_gain).abs() < 1e-6);
        assert!((filter.response(omega(350.0, fs)).norm() - edge_gain).abs() < 1e-6);
    }

    #[test]
    fn test_bandpass_rejects_dc_and_nyquist() {
        let filter = design();
        assert!(filter.response(0.0).norm() < 1e-9);
        assert!(filter.response(PI).norm() < 1e-9);
        assert!(filter.response(omega(5.0, 4096.0)).norm() < 5e-4);
        assert!(filter.response(omega(1500.0, 4096.0)).norm() < 1e-3);
    }

    #[test]
    fn test_bandpass_matches_butterworth_magnitude() {
        let fs = 4096.0;
        let filter = design();
        let t1 = (PI * 35.0 / fs).tan();
        let t2 = (PI * 350.0 / fs).tan();
        for freq in [5.0, 20.0, 100.0, 600.0, 1500.0] {
            let t = (PI * freq / fs).tan();
            // prewarped low-pass prototype frequency
            let w = (t * t - t1 * t2) / (t * (t2 - t1));
            let expected = 1.0 / (1.0 + w.powi(8)).sqrt();
            let got = filter.response(omega(freq, fs)).norm();
            assert!((got / expected - 1.0).abs() < 1e-6, "{freq} Hz: {got} vs {expected}");
        }
    }

    #[test]
    fn test_invalid_band_rejected() {
        assert!(SosFilter::butterworth_bandpass(4, 0.0, 0.5).is_err());
        assert!(SosFilter::butterworth_bandpass(4, 0.2, 1.0).is_err());
        assert!(SosFilter::butterworth_bandpass(4, 0.3, 0.2).is_err());
        assert!(SosFilter::butterworth_bandpass(0, 0.1, 0.2).is_err());
    }

    #[test]
    fn test_filtfilt_passband_sine_is_unchanged() {
        let fs = 4096.0;
        let filter = design();
        let t1 = (PI * 35.0 / fs).tan();
        let t2 = (PI * 350.0 / fs).tan();
        let center = fs / PI * (t1 * t2).sqrt().atan();
        let input: Vec<f64> = (0..8192)
            .map(|i| (2.0 * PI * center * i as f64 / fs).sin())
            .collect();
        let output = filter.filtfilt(&input).unwrap();
        assert_eq!(output.len(), input.len());
        for i in 2048..6144 {
            assert!(
                (output[i] - input[i]).abs() < 1e-3,
                "sample {i}: {} vs {}",
                output[i],
                input[i]
            );
        }
    }

    #[test]
    fn test_filtfilt_removes_constant_offset() {
        let filter = design();
        let output = filter.filtfilt(&vec![3.0; 4096]).unwrap();
        for &y in &output {
            assert!(y.abs() < 1e-6, "got {y}");
        }
    }

    #[test]
    fn test_filtfilt_needs_more_than_padding() {
        let filter = design();
        assert!(filter.filtfilt(&[1.0; 27]).is_err());
        assert!(filter.filtfilt(&[1.0; 28]).is_ok());
    }

    #[test]
    fn test_causal_filter_impulse_decays() {
        let filter = design();
        let mut impulse = vec![0.0; 8192];
        impulse[0] = 1.0;
        let response = filter.filter(&impulse);
        let tail: f64 = response[6000..].iter().map(|x| x.abs()).sum();
        assert!(tail < 1e-8, "tail energy {tail}");
    }
}
