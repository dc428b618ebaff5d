//! Frequency and time axes shared by every synthesized waveform.

use gwslider_core::constants::MPC_SI;
use gwslider_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Slack used when deciding whether a grid time falls inside the window, so
/// that `−0.22 + 512/2048` still counts as `0.03`.
const TIME_EPSILON: f64 = 1e-9;

/// Layout of the synthesis grid and the template observation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformSpec {
    /// Synthesis starts strictly above this frequency (Hz).
    pub f_min: f64,
    /// Highest frequency bin (Hz); the time-domain sample rate is `2·f_max`.
    pub f_max: f64,
    /// Number of bins from DC to `f_max` inclusive.
    pub num_bins: usize,
    /// Template window start relative to merger (s).
    pub window_start: f64,
    /// Template window end relative to merger (s).
    pub window_end: f64,
    /// Luminosity distance used for synthesis (Mpc).
    pub distance_mpc: f64,
}

impl Default for WaveformSpec {
    fn default() -> Self {
        Self {
            f_min: 16.0,
            f_max: 1024.0,
            num_bins: (1 << 14) + 1,
            window_start: -0.22,
            window_end: 0.03,
            distance_mpc: 100.0,
        }
    }
}

impl WaveformSpec {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.num_bins < 3 {
            return Err(Error::InvalidInput(format!(
                "num_bins must be at least 3, got {}",
                self.num_bins
            )));
        }
        if !(self.f_max.is_finite() && self.f_max > 0.0) {
            return Err(Error::InvalidInput(format!("f_max {} must be positive", self.f_max)));
        }
        if !(self.f_min >= 0.0 && self.f_min < self.f_max) {
            return Err(Error::InvalidInput(format!(
                "f_min {} must lie in [0, f_max)",
                self.f_min
            )));
        }
        if !(self.window_start <= 0.0 && self.window_end >= 0.0 && self.window_start < self.window_end) {
            return Err(Error::InvalidInput(format!(
                "window [{}, {}] must contain the merger at t = 0",
                self.window_start, self.window_end
            )));
        }
        if !(self.distance_mpc.is_finite() && self.distance_mpc > 0.0) {
            return Err(Error::InvalidInput(format!(
                "distance {} Mpc must be positive",
                self.distance_mpc
            )));
        }
        let span = self.window_end - self.window_start;
        let full_duration = (self.num_bins - 1) as f64 / self.f_max;
        if span >= full_duration {
            return Err(Error::InvalidInput(format!(
                "window of {span} s does not fit the {full_duration} s inverse transform"
            )));
        }
        Ok(())
    }

    /// Distance in meters.
    pub fn distance_m(&self) -> f64 {
        self.distance_mpc * MPC_SI
    }
}

/// Evenly spaced frequency axis from DC to `f_max`, with the synthesis subset
/// and its turn-on taper.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    full: Vec<f64>,
    first: usize,
    taper: Vec<f64>,
}

impl FrequencyGrid {
    /// Build the grid described by `spec`.
    pub fn new(spec: &WaveformSpec) -> Result<Self> {
        spec.validate()?;
        let n = spec.num_bins;
        let df = spec.f_max / (n - 1) as f64;
        let full: Vec<f64> = (0..n).map(|i| i as f64 * df).collect();

        let first = full.partition_point(|&f| f <= spec.f_min);
        if n - first < 2 {
            return Err(Error::InvalidInput(format!(
                "no synthesis bins above f_min = {} Hz",
                spec.f_min
            )));
        }
        let f_first = full[first];
        let taper = full[first..].iter().map(|&f| (f - f_first).tanh()).collect();

        Ok(Self { full, first, taper })
    }

    /// All bins, DC to `f_max`.
    pub fn full(&self) -> &[f64] {
        &self.full
    }

    /// Bins strictly above `f_min`.
    pub fn synthesis(&self) -> &[f64] {
        &self.full[self.first..]
    }

    /// Index of the first synthesis bin in [`Self::full`].
    pub fn first_index(&self) -> usize {
        self.first
    }

    /// `tanh(f − f_first)` over the synthesis bins.
    pub fn taper(&self) -> &[f64] {
        &self.taper
    }

    /// Total number of bins.
    pub fn len(&self) -> usize {
        self.full.len()
    }

    /// Whether the grid is empty (never true for a constructed grid).
    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// Bin spacing (Hz).
    pub fn df(&self) -> f64 {
        self.full[1] - self.full[0]
    }

    /// Highest frequency (Hz).
    pub fn f_max(&self) -> f64 {
        self.full[self.full.len() - 1]
    }

    /// Sample rate of the real inverse transform, `2·f_max`.
    pub fn sample_rate(&self) -> f64 {
        2.0 * self.f_max()
    }

    /// Length of the real inverse transform, `2·(len − 1)`.
    pub fn time_domain_len(&self) -> usize {
        2 * (self.full.len() - 1)
    }
}

/// Time axis of the truncated template.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
    merger_index: usize,
    sample_rate: f64,
}

impl TimeGrid {
    /// Window `[window_start, window_end]` sampled at the grid's inverse
    /// transform rate, starting exactly at `window_start`.
    pub fn new(spec: &WaveformSpec, grid: &FrequencyGrid) -> Result<Self> {
        let fs = grid.sample_rate();
        let dt = 1.0 / fs;
        let times: Vec<f64> = (0..grid.time_domain_len())
            .map(|i| spec.window_start + i as f64 * dt)
            .take_while(|&t| t <= spec.window_end + TIME_EPSILON)
            .collect();
        if times.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "template window [{}, {}] holds fewer than two samples at {fs} Hz",
                spec.window_start, spec.window_end
            )));
        }

        let merger_index = times
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i)
            .unwrap_or(0);

        Ok(Self {
            times,
            merger_index,
            sample_rate: fs,
        })
    }

    /// Sample times relative to merger (s).
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of template samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the axis is empty (never true for a constructed axis).
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Index of the sample closest to `t = 0`.
    pub fn merger_index(&self) -> usize {
        self.merger_index
    }

    /// Sample interval (s).
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Sample rate (Hz).
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// First sample time (s).
    pub fn start(&self) -> f64 {
        self.times[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_layout() {
        let spec = WaveformSpec::default();
        let grid = FrequencyGrid::new(&spec).unwrap();
        assert_eq!(grid.len(), 16385);
        assert_eq!(grid.df(), 1.0 / 16.0);
        assert_eq!(grid.synthesis()[0], 16.0625);
        assert_eq!(grid.synthesis().len(), 16385 - 257);
        assert_eq!(grid.sample_rate(), 2048.0);
        assert_eq!(grid.time_domain_len(), 32768);
        assert_eq!(grid.taper()[0], 0.0);
        assert!(grid.taper()[100] > 0.999);
    }

    #[test]
    fn default_time_window() {
        let spec = WaveformSpec::default();
        let grid = FrequencyGrid::new(&spec).unwrap();
        let times = TimeGrid::new(&spec, &grid).unwrap();
        assert_eq!(times.len(), 513);
        assert_eq!(times.merger_index(), 451);
        assert!((times.start() + 0.22).abs() < 1e-15);
        assert!(times.times()[451].abs() < 0.5 / 2048.0);
    }

    #[test]
    fn invalid_specs_rejected() {
        let bad = [
            WaveformSpec { num_bins: 2, ..Default::default() },
            WaveformSpec { f_min: 2000.0, ..Default::default() },
            WaveformSpec { window_start: 0.1, ..Default::default() },
            WaveformSpec { distance_mpc: 0.0, ..Default::default() },
            WaveformSpec { window_start: -40.0, ..Default::default() },
        ];
        for spec in bad {
            assert!(FrequencyGrid::new(&spec).is_err(), "{spec:?}");
        }
    }

    #[test]
    fn distance_in_meters() {
        let spec = WaveformSpec::default();
        assert!((spec.distance_m() / 3.0857e24 - 1.0).abs() < 1e-4);
    }
}
