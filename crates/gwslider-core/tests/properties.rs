//! Property-based tests for gwslider-core.
//!
//! Covers the parameter reparametrizations, whitening invertibility and
//! band-pass stability over randomized inputs.

use proptest::prelude::*;
use gwslider_core::{
    FlatPsd, IntrinsicParams, MassMode, ParamMode, SosFilter, SpinMode, bandpass, whiten_shifted,
    Band,
};
use std::f64::consts::PI;

fn rel_close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

/// Periodic signal with no DC or Nyquist content, so every bin survives a
/// complex phase rotation through the real inverse transform.
fn periodic_signal(n: usize, amps: &[f64], phases: &[f64]) -> Vec<f64> {
    (0..n)
        .map(|i| {
            amps.iter()
                .zip(phases)
                .enumerate()
                .map(|(j, (a, p))| {
                    a * (2.0 * PI * (j + 1) as f64 * i as f64 / n as f64 + p).cos()
                })
                .sum()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Intrinsic → derived → intrinsic recovers the original vector.
    #[test]
    fn derived_roundtrip(
        m1 in 5.0f64..100.0,
        m2 in 5.0f64..100.0,
        s1 in -0.99f64..0.99,
        s2 in -0.99f64..0.99,
    ) {
        let p = IntrinsicParams::new(m1, m2, s1, s2);
        let back = p.to_derived().to_intrinsic().unwrap();
        prop_assert!(rel_close(back.mass1, m1, 1e-9), "mass1 {} vs {}", back.mass1, m1);
        prop_assert!(rel_close(back.mass2, m2, 1e-9), "mass2 {} vs {}", back.mass2, m2);
        prop_assert!((back.spin1z - s1).abs() < 1e-9);
        prop_assert!((back.spin2z - s2).abs() < 1e-9);
    }

    /// Slider vectors convert back to the same parameters in every mode.
    #[test]
    fn slider_roundtrip(
        m1 in 10.0f64..80.0,
        m2 in 10.0f64..80.0,
        s1 in -0.9f64..0.9,
        s2 in -0.9f64..0.9,
        chirp in any::<bool>(),
        effective in any::<bool>(),
    ) {
        let mode = ParamMode::new(
            if chirp { MassMode::ChirpRatio } else { MassMode::Components },
            if effective { SpinMode::EffectiveAntisymmetric } else { SpinMode::Components },
        );
        let p = IntrinsicParams::new(m1, m2, s1, s2);
        let back = mode.from_sliders(mode.to_sliders(&p)).unwrap();
        for (a, b) in back.to_array().iter().zip(p.to_array()) {
            prop_assert!(rel_close(*a, b, 1e-9), "{}: {} vs {}", mode, a, b);
        }
    }

    /// Chirp mass is symmetric in the component masses.
    #[test]
    fn chirp_mass_symmetric(m1 in 1.0f64..200.0, m2 in 1.0f64..200.0) {
        let a = IntrinsicParams::new(m1, m2, 0.0, 0.0).chirp_mass();
        let b = IntrinsicParams::new(m2, m1, 0.0, 0.0).chirp_mass();
        prop_assert!(rel_close(a, b, 1e-12));
        prop_assert!(a <= m1.max(m2));
    }

    /// Whitening with a flat PSD is undone by re-whitening with the inverse
    /// shift and removing the two scale factors.
    #[test]
    fn whiten_is_invertible_for_flat_psd(
        amps in prop::collection::vec(-1.0f64..1.0, 6),
        phases in prop::collection::vec(-PI..PI, 6),
        level in 0.1f64..10.0,
        phase_shift in -PI..PI,
        shift_samples in -20i32..20,
    ) {
        let n = 256;
        let dt = 1.0 / 256.0;
        let input = periodic_signal(n, &amps, &phases);
        let time_shift = f64::from(shift_samples) * dt;

        let white = whiten_shifted(&input, &FlatPsd::new(level), dt, phase_shift, time_shift).unwrap();
        let back = whiten_shifted(&white, &FlatPsd::new(1.0), dt, -phase_shift, -time_shift).unwrap();
        let undo = level.sqrt() / (2.0 * dt);
        for (i, (b, x)) in back.iter().zip(&input).enumerate() {
            prop_assert!((b * undo - x).abs() < 1e-9, "sample {}: {} vs {}", i, b * undo, x);
        }
    }

    /// Any valid band gives a stable design with unit gain at its center and
    /// finite band-passed output.
    #[test]
    fn bandpass_designs_are_stable(
        low in 10.0f64..200.0,
        width in 20.0f64..1500.0,
        input in prop::collection::vec(-1.0f64..1.0, 256),
    ) {
        let fs = 4096.0;
        let high = (low + width).min(2000.0);
        let nyquist = fs / 2.0;
        let filter = SosFilter::butterworth_bandpass(4, low / nyquist, high / nyquist).unwrap();
        prop_assert!(filter.is_stable());

        let t1 = (PI * low / fs).tan();
        let t2 = (PI * high / fs).tan();
        let center = 2.0 * (t1 * t2).sqrt().atan();
        prop_assert!((filter.response(center).norm() - 1.0).abs() < 1e-6);

        let out = bandpass(&input, Band::new(low, high), fs).unwrap();
        prop_assert!(out.iter().all(|x| x.is_finite()));
    }
}
