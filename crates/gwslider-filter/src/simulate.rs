//! Simulated events: a known injection in colored Gaussian noise.
//!
//! Noise is drawn in the frequency domain from an analytic advanced-LIGO
//! design curve, so the dataset's PSD is known exactly. The injection is
//! rendered the same way interactive templates are and scaled to a target
//! optimal SNR.

use gwslider_config::AnalysisConfig;
use gwslider_core::{Band, Complex64, Error, InterpolatedPsd, Psd, Result, bandpass, irfft, rfft, rfftfreq, whiten};
use gwslider_registry::{Detector, DetectorStrain, EventDataset, RegisteredEvent, RegistryError};
use gwslider_waveform::{WaveformOracle, WaveformSynthesizer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Name of the simulated event in the registry.
pub const SIMULATED_EVENT_NAME: &str = "SIMULATED";

/// Spacing of the tabulated PSD stored with a simulated dataset (Hz).
pub const PSD_TABLE_STEP: f64 = 0.25;

/// Analytic fit to the advanced-LIGO zero-detuned high-power design
/// sensitivity.
///
/// `S(f) = S0·[x^−4.14 − 5·x^−2 + 111·(1 − x² + x⁴/2)/(1 + x²/2)]` with
/// `x = f/215 Hz`. Below the low-frequency cutoff the value is held at
/// `S(cutoff)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AligoPsd {
    low_cutoff: f64,
}

impl AligoPsd {
    const S0: f64 = 1e-49;
    const F0: f64 = 215.0;

    /// Design curve held flat below 10 Hz.
    pub fn new() -> Self {
        Self { low_cutoff: 10.0 }
    }

    fn fit(&self, f: f64) -> f64 {
        let x = f / Self::F0;
        let x2 = x * x;
        Self::S0 * (x.powf(-4.14) - 5.0 / x2 + 111.0 * (1.0 - x2 + 0.5 * x2 * x2) / (1.0 + 0.5 * x2))
    }
}

impl Default for AligoPsd {
    fn default() -> Self {
        Self::new()
    }
}

impl Psd for AligoPsd {
    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn power(&self, frequency: f64) -> Result<f64> {
        if !(frequency >= 0.0) {
            return Err(Error::PsdCoverage {
                frequency,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(self.fit(frequency.max(self.low_cutoff)))
    }
}

/// Stationary Gaussian noise of `len` samples whose one-sided PSD is `psd`.
pub fn colored_noise(psd: &dyn Psd, len: usize, sample_rate: f64, rng: &mut impl Rng) -> Result<Vec<f64>> {
    if len < 2 {
        return Err(Error::InvalidInput(format!("noise needs at least two samples, got {len}")));
    }
    let dt = 1.0 / sample_rate;
    let freqs = rfftfreq(len, dt);
    let power = psd.evaluate(&freqs)?;
    let nyquist_bin = (len % 2 == 0).then_some(freqs.len() - 1);
    let mut gaussian = || -> f64 { StandardNormal.sample(&mut *rng) };

    let spectrum: Vec<Complex64> = power
        .iter()
        .enumerate()
        .map(|(k, &p)| {
            if k == 0 || Some(k) == nyquist_bin {
                let sd = (len as f64 * p / (2.0 * dt)).sqrt();
                Complex64::new(sd * gaussian(), 0.0)
            } else {
                let sd = (len as f64 * p / (4.0 * dt)).sqrt();
                Complex64::new(sd * gaussian(), sd * gaussian())
            }
        })
        .collect();
    Ok(irfft(&spectrum, len))
}

/// Optimal SNR `sqrt(⟨h|h⟩)` of `signal` in noise described by `psd`.
pub fn optimal_snr(signal: &[f64], psd: &dyn Psd, sample_rate: f64) -> Result<f64> {
    let n = signal.len();
    let freqs = rfftfreq(n, 1.0 / sample_rate);
    let power = psd.evaluate(&freqs)?;
    let df = sample_rate / n as f64;
    let sum: f64 = rfft(signal)
        .iter()
        .zip(&power)
        .skip(1)
        .map(|(h, p)| (h / sample_rate).norm_sqr() / p)
        .sum();
    Ok((4.0 * df * sum).sqrt())
}

/// Build the simulated dataset described by `config.simulation`.
///
/// Each detector gets its own noise realization (seeds `seed` and
/// `seed + 1`) and the same injection, scaled to the configured SNR per
/// detector and merging at `gps_center`.
pub fn simulate_dataset<O: WaveformOracle>(
    config: &AnalysisConfig,
    synth: &WaveformSynthesizer<O>,
) -> std::result::Result<EventDataset, RegistryError> {
    let sim = &config.simulation;
    let fs = sim.sample_rate;
    let dt = 1.0 / fs;
    let n = config.analysis_samples(fs);
    let band: Band = config.filter.band;
    band.validate(fs)?;

    let model = AligoPsd::new();
    let table_len = (fs / 2.0 / PSD_TABLE_STEP).floor() as usize + 1;
    let table_freqs: Vec<f64> = (0..table_len).map(|i| i as f64 * PSD_TABLE_STEP).collect();
    let psd = InterpolatedPsd::tabulate(&model, &table_freqs)?;

    let injection = synth.render_padded_template(&sim.injection, &config.render, fs, n, n / 2)?;
    let rho = optimal_snr(&injection, &psd, fs)?;
    if !(rho.is_finite() && rho > 0.0) {
        return Err(Error::InvalidInput(format!("injection has optimal SNR {rho}")).into());
    }
    let scale = sim.snr / rho;
    tracing::debug!(rho, scale, n, "scaled injection");

    let strains = Detector::ALL.map(|detector| -> std::result::Result<DetectorStrain, RegistryError> {
        let mut rng = StdRng::seed_from_u64(sim.seed.wrapping_add(detector.index() as u64));
        let noise = colored_noise(&psd, n, fs, &mut rng)?;
        let strain: Vec<f64> = noise.iter().zip(&injection).map(|(w, h)| w + scale * h).collect();
        let strain_whiten = whiten(&strain, &psd, dt)?;
        let strain_whitenbp = bandpass(&strain_whiten, band, fs)?;
        Ok(DetectorStrain {
            strain,
            strain_whiten,
            strain_whitenbp,
        })
    });
    let [h1, l1] = strains;

    let time: Vec<f64> = (0..n)
        .map(|i| sim.gps_center + (i as f64 - (n / 2) as f64) * dt)
        .collect();
    let dataset = EventDataset::new(time, sim.gps_center, dt, fs, [h1?, l1?], [psd.clone(), psd])?;
    tracing::info!(
        seed = sim.seed,
        snr = sim.snr,
        duration = dataset.duration(),
        "simulated dataset ready"
    );
    Ok(dataset)
}

/// The simulated dataset registered under [`SIMULATED_EVENT_NAME`], with the
/// injection as its reference parameters.
pub fn simulate_event<O: WaveformOracle>(
    config: &AnalysisConfig,
    synth: &WaveformSynthesizer<O>,
) -> std::result::Result<RegisteredEvent, RegistryError> {
    let dataset = simulate_dataset(config, synth)?;
    let sim = &config.simulation;
    Ok(RegisteredEvent::new(SIMULATED_EVENT_NAME, sim.gps_center, sim.injection, dataset).simulated())
}
