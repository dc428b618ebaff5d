//! Integration tests for gwslider-core.
//!
//! Exercise the conditioning chain the way the filter stages use it:
//! tabulated PSDs, windowed spectra, whitening followed by band-passing and
//! resampling of tapered templates.

use gwslider_core::{
    Band, FlatPsd, InterpolatedPsd, Psd, bandpass, fftfreq, interp_linear, resample, rfft,
    rfftfreq, roll, tukey, tukey_windowed, whiten,
};
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tone(freq_hz: f64, sample_rate: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
        .collect()
}

fn rms(signal: &[f64]) -> f64 {
    (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

// ===========================================================================
// PSD tables
// ===========================================================================

#[test]
fn tabulated_flat_psd_whitens_like_flat_model() {
    let fs = 1024.0;
    let n = 2048;
    let freqs = rfftfreq(n, 1.0 / fs);
    let table = InterpolatedPsd::tabulate(&FlatPsd::new(3.0), &freqs).unwrap();
    assert_eq!(table.support(), (0.0, fs / 2.0));

    let strain = tone(60.0, fs, n);
    let a = whiten(&strain, &table, 1.0 / fs).unwrap();
    let b = whiten(&strain, &FlatPsd::new(3.0), 1.0 / fs).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn psd_evaluated_on_absolute_fft_frequencies() {
    let fs = 512.0;
    let n = 64;
    let table = InterpolatedPsd::new(vec![0.0, fs / 2.0], vec![1.0, 2.0]).unwrap();
    let abs_freqs: Vec<f64> = fftfreq(n, 1.0 / fs).iter().map(|f| f.abs()).collect();
    let values = table.evaluate(&abs_freqs).unwrap();
    assert_eq!(values[0], 1.0);
    assert!((values[n / 2] - 2.0).abs() < 1e-12);
    assert!((values[1] - values[n - 1]).abs() < 1e-15);
}

// ===========================================================================
// Conditioning chain
// ===========================================================================

#[test]
fn whiten_then_bandpass_isolates_in_band_tone() {
    let fs = 4096.0;
    let n = 4 * 4096;
    let in_band = tone(120.0, fs, n);
    let out_band = tone(10.0, fs, n);
    let mixed: Vec<f64> = in_band.iter().zip(&out_band).map(|(a, b)| a + b).collect();

    let white = whiten(&mixed, &FlatPsd::new(1.0), 1.0 / fs).unwrap();
    let filtered = bandpass(&white, Band::default(), fs).unwrap();

    let norm = (2.0 / fs).sqrt() / (Band::default().width() / (fs / 2.0)).sqrt();
    let expected_rms = rms(&in_band) * norm;
    let middle = &filtered[n / 4..3 * n / 4];
    let ratio = rms(middle) / expected_rms;
    assert!((0.9..1.05).contains(&ratio), "rms ratio {ratio}");
}

#[test]
fn windowed_tone_spectrum_peaks_at_tone_bin() {
    let fs = 1024.0;
    let n = 1024;
    let spectrum = rfft(&tukey_windowed(&tone(100.0, fs, n), 0.25));
    let peak = spectrum
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak, 100);
}

// ===========================================================================
// Template resampling
// ===========================================================================

#[test]
fn oversample_taper_downsample_keeps_shape() {
    let fs = 2048.0;
    let n = 512;
    let times: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();
    let signal: Vec<f64> = times
        .iter()
        .map(|t| (2.0 * PI * 40.0 * t).sin() * (-((t - 0.125) * 20.0).powi(2)).exp())
        .collect();

    let fine_times: Vec<f64> = (0..4 * n).map(|i| i as f64 / (4.0 * fs)).collect();
    let fine = interp_linear(&fine_times, &times, &signal).unwrap();
    let tapered = tukey_windowed(&fine, 0.25);
    let coarse = resample(&tapered, n).unwrap();
    assert_eq!(coarse.len(), n);

    let window = tukey(n, 0.25);
    for i in n / 4..3 * n / 4 {
        let expected = signal[i] * window[i];
        assert!((coarse[i] - expected).abs() < 2e-2, "sample {i}: {} vs {expected}", coarse[i]);
    }
}

#[test]
fn roll_moves_peak_to_target_index() {
    let mut data = vec![0.0; 32];
    data[25] = 1.0;
    let rolled = roll(&data, 10 - 25);
    assert_eq!(rolled[10], 1.0);
}
