//! Interpolation, circular shifts and Fourier-domain resampling.

use crate::error::{Error, Result};
use crate::fft::Fft;
use rustfft::num_complex::Complex64;

/// Piecewise-linear interpolation of `(xp, fp)` at each point of `x`.
///
/// `xp` must be ascending. Points outside `[xp[0], xp[last]]` take the end
/// values.
pub fn interp_linear(x: &[f64], xp: &[f64], fp: &[f64]) -> Result<Vec<f64>> {
    Error::check_len("interpolation table", xp.len(), fp.len())?;
    if xp.is_empty() {
        return Err(Error::InvalidInput("interpolation table is empty".into()));
    }
    let last = xp.len() - 1;

    Ok(x
        .iter()
        .map(|&v| {
            if v <= xp[0] {
                return fp[0];
            }
            if v >= xp[last] {
                return fp[last];
            }
            let upper = xp.partition_point(|&p| p <= v).min(last);
            let lower = upper - 1;
            let span = xp[upper] - xp[lower];
            if span <= 0.0 {
                return fp[upper];
            }
            let t = (v - xp[lower]) / span;
            fp[lower] + t * (fp[upper] - fp[lower])
        })
        .collect())
}

/// Circularly shift `input` right by `shift` samples (negative shifts left).
pub fn roll<T: Clone>(input: &[T], shift: isize) -> Vec<T> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }
    let k = shift.rem_euclid(n as isize) as usize;
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&input[n - k..]);
    out.extend_from_slice(&input[..n - k]);
    out
}

/// Resample a real periodic signal to `num` samples in the Fourier domain.
///
/// Keeps the lowest `min(n, num)` frequencies, splitting or merging the
/// Nyquist bin when the shorter length is even, and rescales by `num/n` so
/// that sample values are preserved.
pub fn resample(input: &[f64], num: usize) -> Result<Vec<f64>> {
    let n = input.len();
    if n == 0 || num == 0 {
        return Err(Error::InvalidInput(format!(
            "cannot resample {n} samples to {num}"
        )));
    }
    if n == num {
        return Ok(input.to_vec());
    }

    let spectrum = Fft::new(n).forward_real(input);
    let m = n.min(num);
    let keep = m / 2 + 1;

    let mut target = vec![Complex64::new(0.0, 0.0); num / 2 + 1];
    target[..keep].copy_from_slice(&spectrum[..keep]);
    if m % 2 == 0 {
        if num < n {
            target[m / 2] *= 2.0;
        } else {
            target[m / 2] *= 0.5;
        }
    }

    let scale = num as f64 / n as f64;
    Ok(Fft::new(num)
        .inverse_real(&target)
        .into_iter()
        .map(|x| x * scale)
        .collect())
}
