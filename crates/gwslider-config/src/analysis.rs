//! Analysis configuration file format.

use gwslider_core::{Band, IntrinsicParams};
use gwslider_waveform::{RenderSpec, WaveformSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, write_with_parents};

/// Everything that shapes a matched-filter analysis.
///
/// Every section and every field is optional in the file; missing entries
/// take the defaults shown below.
///
/// # TOML Format
///
/// ```toml
/// [waveform]
/// f_min = 16.0
/// f_max = 1024.0
/// num_bins = 16385
/// window_start = -0.22
/// window_end = 0.03
/// distance_mpc = 100.0
///
/// [render]
/// oversample = 4
/// taper_alpha = 0.25
/// margin = 0.05
///
/// [filter]
/// window_seconds = 4.0
/// analysis_seconds = 32.0
/// band = { low = 35.0, high = 350.0 }
/// taper_alpha = 0.25
/// reference_snr = 8.0
///
/// [simulation]
/// enabled = true
/// snr = 20.0
/// sample_rate = 4096.0
/// seed = 150914
/// gps_center = 1126259462.0
/// injection = { mass1 = 50.0, mass2 = 30.0, spin1z = 0.3, spin2z = -0.4 }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Synthesis grid and template window.
    pub waveform: WaveformSpec,
    /// Template resampling onto dataset grids.
    pub render: RenderSpec,
    /// Matched-filter settings.
    pub filter: FilterConfig,
    /// Simulated injection event.
    pub simulation: SimulationConfig,
}

/// Matched-filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Length of the cropped analysis window around the event (s).
    pub window_seconds: f64,
    /// Length of the full dataset a template is padded to (s).
    pub analysis_seconds: f64,
    /// Band-pass applied to the aligned template.
    pub band: Band,
    /// Tukey fraction applied to template and data before filtering.
    pub taper_alpha: f64,
    /// SNR that defines the horizon distance.
    pub reference_snr: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_seconds: 4.0,
            analysis_seconds: 32.0,
            band: Band::default(),
            taper_alpha: 0.25,
            reference_snr: 8.0,
        }
    }
}

/// Simulated event: a known injection in colored Gaussian noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Offer the simulated event alongside real ones.
    pub enabled: bool,
    /// Injected source.
    pub injection: IntrinsicParams,
    /// Optimal SNR the injection is scaled to, per detector.
    pub snr: f64,
    /// Sample rate of the generated strain (Hz).
    pub sample_rate: f64,
    /// Noise generator seed.
    pub seed: u64,
    /// GPS time assigned to the injection's merger.
    pub gps_center: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            injection: IntrinsicParams::new(50.0, 30.0, 0.3, -0.4),
            snr: 20.0,
            sample_rate: 4096.0,
            seed: 150914,
            gps_center: 1126259462.0,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load and validate, reporting every problem at once.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        crate::validation::validate_analysis(&config)?;
        Ok(config)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_with_parents(path.as_ref(), &self.to_toml()?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of samples in the cropped analysis window at `sample_rate`.
    pub fn window_samples(&self, sample_rate: f64) -> usize {
        (self.filter.window_seconds * sample_rate).round() as usize
    }

    /// Number of samples in a full dataset at `sample_rate`.
    pub fn analysis_samples(&self, sample_rate: f64) -> usize {
        (self.filter.analysis_seconds * sample_rate).round() as usize
    }
}
