//! Template alignment and residuals.

use gwslider_core::{Band, Error, Psd, Result, bandpass, whiten_shifted};
use serde::{Deserialize, Serialize};

use crate::matched_filter::MatchedFilterOutput;

/// Best-fit amplitude, phase and time shift to apply to a raw template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// The template is divided by this.
    pub effective_distance: f64,
    /// Phase rotation (rad).
    pub phase: f64,
    /// Time shift in samples.
    pub offset: isize,
}

impl From<&MatchedFilterOutput> for Alignment {
    fn from(out: &MatchedFilterOutput) -> Self {
        Self {
            effective_distance: out.effective_distance,
            phase: out.phase,
            offset: out.offset,
        }
    }
}

/// Scale, rotate, shift, whiten and band-pass a raw template so it can be
/// overlaid on whitened, band-passed data.
pub fn align_template(
    raw_template: &[f64],
    alignment: Alignment,
    psd: &dyn Psd,
    dt: f64,
    band: Band,
) -> Result<Vec<f64>> {
    let d_eff = alignment.effective_distance;
    if !(d_eff.is_finite() && d_eff > 0.0) {
        return Err(Error::InvalidInput(format!(
            "effective distance {d_eff} must be positive"
        )));
    }
    let scaled: Vec<f64> = raw_template.iter().map(|x| x / d_eff).collect();
    let whitened = whiten_shifted(&scaled, psd, dt, alignment.phase, alignment.offset as f64 * dt)?;
    bandpass(&whitened, band, 1.0 / dt)
}

/// `data − fit`, sample by sample.
pub fn residual(data: &[f64], fit: &[f64]) -> Result<Vec<f64>> {
    Error::check_len("residual", data.len(), fit.len())?;
    Ok(data.iter().zip(fit).map(|(d, f)| d - f).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwslider_core::{FlatPsd, whiten};
    use std::f64::consts::PI;

    const FS: f64 = 1024.0;

    fn tone(n: usize, freq: f64) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / FS).sin()).collect()
    }

    #[test]
    fn residual_of_identical_series_is_zero() {
        let d = tone(256, 50.0);
        assert!(residual(&d, &d).unwrap().iter().all(|&r| r == 0.0));
    }

    #[test]
    fn residual_length_mismatch() {
        let err = residual(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, Error::shape("residual", 2, 1));
    }

    #[test]
    fn unit_alignment_matches_plain_conditioning() {
        let raw = tone(4096, 100.0);
        let psd = FlatPsd::new(1e-2);
        let band = Band::new(35.0, 350.0);
        let identity = Alignment {
            effective_distance: 1.0,
            phase: 0.0,
            offset: 0,
        };
        let aligned = align_template(&raw, identity, &psd, 1.0 / FS, band).unwrap();
        let expected = bandpass(&whiten(&raw, &psd, 1.0 / FS).unwrap(), band, FS).unwrap();
        for (a, e) in aligned.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-9);
        }
    }

    #[test]
    fn amplitude_and_phase_applied() {
        let raw = tone(4096, 128.0);
        let psd = FlatPsd::new(1.0);
        let band = Band::new(35.0, 350.0);
        let base = align_template(
            &raw,
            Alignment { effective_distance: 1.0, phase: 0.0, offset: 0 },
            &psd,
            1.0 / FS,
            band,
        )
        .unwrap();
        let flipped = align_template(
            &raw,
            Alignment { effective_distance: 2.0, phase: PI, offset: 0 },
            &psd,
            1.0 / FS,
            band,
        )
        .unwrap();
        for (b, f) in base.iter().zip(&flipped).skip(500).take(3000) {
            assert!((f + 0.5 * b).abs() < 1e-9, "{f} vs {b}");
        }
    }

    #[test]
    fn non_positive_distance_rejected() {
        let raw = tone(512, 100.0);
        let bad = Alignment { effective_distance: 0.0, phase: 0.0, offset: 0 };
        assert!(align_template(&raw, bad, &FlatPsd::new(1.0), 1.0 / FS, Band::default()).is_err());
    }
}
