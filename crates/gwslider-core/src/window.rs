//! Tapering windows.

use std::f64::consts::PI;

/// Tukey (tapered cosine) window of length `n`.
///
/// `alpha` is the fraction of the window inside the cosine tapers: 0 gives a
/// rectangular window, 1 a Hann window. The flat top therefore covers
/// `1 − alpha` of the samples. The window is symmetric, with both end
/// samples at zero for `alpha > 0`.
pub fn tukey(n: usize, alpha: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    if alpha <= 0.0 {
        return vec![1.0; n];
    }
    let alpha = alpha.min(1.0);

    let m = (n - 1) as f64;
    let width = (alpha * m / 2.0).floor() as usize;

    (0..n)
        .map(|i| {
            let x = i as f64;
            if i <= width {
                0.5 * (1.0 + (PI * (-1.0 + 2.0 * x / (alpha * m))).cos())
            } else if i < n - width - 1 {
                1.0
            } else {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + 2.0 * x / (alpha * m))).cos())
            }
        })
        .collect()
}

/// Multiply `buffer` by a Tukey window in place.
pub fn apply_tukey(buffer: &mut [f64], alpha: f64) {
    let window = tukey(buffer.len(), alpha);
    for (sample, w) in buffer.iter_mut().zip(window) {
        *sample *= w;
    }
}

/// Return a Tukey-windowed copy of `input`.
pub fn tukey_windowed(input: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = input.to_vec();
    apply_tukey(&mut out, alpha);
    out
}
