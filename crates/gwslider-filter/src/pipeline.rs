//! Per-event matched filtering across both detectors.

use gwslider_config::FilterConfig;
use gwslider_core::{Band, Error, Result};
use gwslider_registry::{Detector, EventDataset};
use serde::{Deserialize, Serialize};

use crate::align::{Alignment, align_template, residual};
use crate::matched_filter::{DEFAULT_REFERENCE_SNR, DEFAULT_TAPER_ALPHA, MatchedFilter, MatchedFilterOutput};

/// Crop window and filter options for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Length of the window around the event that is filtered (s).
    pub window_seconds: f64,
    /// Band-pass applied to the aligned template.
    pub band: Band,
    /// Tukey fraction for the matched filter.
    pub taper_alpha: f64,
    /// SNR that defines the horizon distance.
    pub reference_snr: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            window_seconds: 4.0,
            band: Band::default(),
            taper_alpha: DEFAULT_TAPER_ALPHA,
            reference_snr: DEFAULT_REFERENCE_SNR,
        }
    }
}

impl From<&FilterConfig> for FilterSettings {
    fn from(config: &FilterConfig) -> Self {
        Self {
            window_seconds: config.window_seconds,
            band: config.band,
            taper_alpha: config.taper_alpha,
            reference_snr: config.reference_snr,
        }
    }
}

/// Filter result and plot curves for one detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorResult {
    /// Which detector.
    pub detector: Detector,
    /// Best-fit quantities.
    pub filter: MatchedFilterOutput,
    /// Aligned, whitened, band-passed template.
    pub template: Vec<f64>,
    /// Whitened, band-passed data in the window.
    pub data: Vec<f64>,
    /// `data − template`.
    pub residual: Vec<f64>,
}

impl DetectorResult {
    /// Amplitude readout `1 / d_eff`.
    pub fn amplitude(&self) -> f64 {
        1.0 / self.filter.effective_distance
    }
}

/// Results for both detectors on one event.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedFilterReport {
    time: Vec<f64>,
    results: [DetectorResult; 2],
}

impl MatchedFilterReport {
    /// Window time axis relative to the event time (s).
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Result for `detector`.
    pub fn detector(&self, detector: Detector) -> &DetectorResult {
        &self.results[detector.index()]
    }

    /// Result of the last detector processed (L1).
    pub fn last(&self) -> &DetectorResult {
        &self.results[Detector::ALL.len() - 1]
    }

    /// Quadrature sum of the detector SNRs.
    pub fn network_snr(&self) -> f64 {
        self.results.iter().map(|r| r.filter.snr * r.filter.snr).sum::<f64>().sqrt()
    }

    /// Results in processing order.
    pub fn iter(&self) -> std::slice::Iter<'_, DetectorResult> {
        self.results.iter()
    }
}

/// Filter `template` against both detectors of `dataset`.
///
/// `template` must span the whole dataset (see
/// `WaveformSynthesizer::render_padded_template`). Template and data are
/// cropped to `settings.window_seconds` around the event, filtered with each
/// detector's PSD, and the template is aligned for plotting.
pub fn calculate_matched_filter(
    template: &[f64],
    dataset: &EventDataset,
    settings: &FilterSettings,
) -> Result<MatchedFilterReport> {
    Error::check_len("padded template", dataset.len(), template.len())?;
    settings.band.validate(dataset.sample_rate())?;

    let range = dataset.crop_range(settings.window_seconds)?;
    let window_template = &template[range.clone()];
    let window_time = &dataset.time()[range.clone()];
    let filter = MatchedFilter::with_options(
        range.len(),
        dataset.sample_rate(),
        settings.taper_alpha,
        settings.reference_snr,
    )?;

    let run = |detector: Detector| -> Result<DetectorResult> {
        let strain = dataset.strain(detector);
        let psd = dataset.psd(detector);
        let out = filter.run(window_template, &strain.strain[range.clone()], window_time, psd)?;
        tracing::debug!(
            %detector,
            snr = out.snr,
            offset = out.offset,
            phase = out.phase,
            d_eff = out.effective_distance,
            "matched filter"
        );

        let aligned = align_template(window_template, Alignment::from(&out), psd, dataset.dt(), settings.band)?;
        let data = strain.strain_whitenbp[range.clone()].to_vec();
        let residual = residual(&data, &aligned)?;
        Ok(DetectorResult {
            detector,
            filter: out,
            template: aligned,
            data,
            residual,
        })
    };

    let results = [run(Detector::H1)?, run(Detector::L1)?];
    Ok(MatchedFilterReport {
        time: dataset.relative_time(range),
        results,
    })
}
