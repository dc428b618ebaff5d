//! FFT wrapper with the usual DSP normalization conventions.
//!
//! Forward transforms are unnormalized; inverse transforms divide by the
//! transform length, so `inverse(forward(x)) == x`. Real transforms return
//! the `n/2 + 1` non-negative frequency bins.

use rustfft::{Fft as RustFft, FftPlanner, num_complex::Complex64};
use std::sync::Arc;

/// FFT processor for a fixed transform size.
pub struct Fft {
    fft: Arc<dyn RustFft<f64>>,
    ifft: Arc<dyn RustFft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward FFT of a complex buffer (in-place, unnormalized).
    pub fn forward_complex(&self, buffer: &mut [Complex64]) {
        self.fft.process(buffer);
    }

    /// Inverse FFT of a complex buffer (in-place, scaled by `1/size`).
    pub fn inverse_complex(&self, buffer: &mut [Complex64]) {
        self.ifft.process(buffer);

        let scale = 1.0 / self.size as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }

    /// Full complex spectrum of a real input, zero-padded or truncated to the
    /// transform size.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer
    }

    /// Non-negative frequency half of the spectrum of a real input
    /// (`size/2 + 1` bins, DC to Nyquist).
    pub fn forward_real(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer = self.forward(input);
        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Real signal of length `size` from a half spectrum.
    ///
    /// Missing bins are treated as zero and extra bins are ignored. The
    /// imaginary parts of the DC and (for even sizes) Nyquist bins are
    /// discarded.
    pub fn inverse_real(&self, half_spectrum: &[Complex64]) -> Vec<f64> {
        let n = self.size;
        if n == 0 {
            return Vec::new();
        }
        let half = n / 2;
        let bin = |k: usize| {
            half_spectrum
                .get(k)
                .copied()
                .unwrap_or(Complex64::new(0.0, 0.0))
        };

        let mut buffer = vec![Complex64::new(0.0, 0.0); n];
        buffer[0] = Complex64::new(bin(0).re, 0.0);
        for k in 1..=half {
            let value = bin(k);
            if 2 * k == n {
                buffer[k] = Complex64::new(value.re, 0.0);
            } else {
                buffer[k] = value;
                buffer[n - k] = value.conj();
            }
        }

        self.ifft.process(&mut buffer);

        let scale = 1.0 / n as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

/// Real FFT of `input`, `n/2 + 1` bins.
pub fn rfft(input: &[f64]) -> Vec<Complex64> {
    Fft::new(input.len()).forward_real(input)
}

/// Inverse real FFT producing `n` samples.
pub fn irfft(half_spectrum: &[Complex64], n: usize) -> Vec<f64> {
    Fft::new(n).inverse_real(half_spectrum)
}

/// Sample frequencies of a full-length FFT, in bin order.
///
/// Bin `k` maps to `k/(n·dt)` for `k < ceil(n/2)` and to `(k − n)/(n·dt)`
/// otherwise, so for even `n` the Nyquist bin is negative.
pub fn fftfreq(n: usize, dt: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * dt);
    let positive = n.div_ceil(2);
    (0..n)
        .map(|k| {
            if k < positive {
                k as f64 * scale
            } else {
                (k as f64 - n as f64) * scale
            }
        })
        .collect()
}

/// Sample frequencies of a real FFT.
pub fn rfftfreq(n: usize, dt: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * dt);
    (0..=n / 2).map(|k| k as f64 * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_real_roundtrip_even_and_odd() {
        for n in [256usize, 255] {
            let input: Vec<f64> = (0..n)
                .map(|i| (2.0 * PI * 10.0 * i as f64 / n as f64).sin() + 0.1 * i as f64)
                .collect();
            let spectrum = rfft(&input);
            assert_eq!(spectrum.len(), n / 2 + 1);
            let back = irfft(&spectrum, n);
            for (a, b) in input.iter().zip(back.iter()) {
                assert!((a - b).abs() < 1e-9, "n={n}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_complex_roundtrip() {
        let fft = Fft::new(64);
        let original: Vec<Complex64> = (0..64)
            .map(|i| Complex64::new(i as f64, -(i as f64) * 0.5))
            .collect();
        let mut buffer = original.clone();
        fft.forward_complex(&mut buffer);
        fft.inverse_complex(&mut buffer);
        for (a, b) in original.iter().zip(buffer.iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_dc_detection() {
        let spectrum = rfft(&[1.0; 128]);
        assert!((spectrum[0].re - 128.0).abs() < 1e-9);
        let rest: f64 = spectrum[1..].iter().map(|c| c.norm()).sum();
        assert!(rest < 1e-9);
    }

    #[test]
    fn test_fftfreq_layout() {
        let f = fftfreq(8, 0.125);
        assert_eq!(f, vec![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]);
        let f = fftfreq(5, 1.0);
        assert_eq!(f, vec![0.0, 0.2, 0.4, -0.4, -0.2]);
    }

    #[test]
    fn test_rfftfreq_ends_at_nyquist() {
        let f = rfftfreq(4096, 1.0 / 4096.0);
        assert_eq!(f.len(), 2049);
        assert_eq!(f[0], 0.0);
        assert!((f[2048] - 2048.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_real_ignores_imaginary_dc() {
        let spectrum = vec![Complex64::new(4.0, 3.0), Complex64::new(0.0, 0.0), Complex64::new(0.0, 7.0)];
        let out = irfft(&spectrum, 4);
        for x in out {
            assert!((x - 1.0).abs() < 1e-12);
        }
    }
}
