//! Frequency-domain synthesis and time-domain template rendering.

use crate::grid::{FrequencyGrid, TimeGrid, WaveformSpec};
use crate::oracle::{OracleRequest, WaveformOracle};
use crate::phenom::PhenomImr;
use gwslider_core::constants::MSUN_SI;
use gwslider_core::{
    Complex64, Error, Fft, IntrinsicParams, Result, apply_tukey, interp_linear, resample, roll,
};
use serde::{Deserialize, Serialize};

/// How a template is brought onto a dataset's sample grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSpec {
    /// Integer oversampling factor of the intermediate interpolation grid.
    pub oversample: usize,
    /// Tukey taper fraction applied before downsampling.
    pub taper_alpha: f64,
    /// Extra waveform kept on both sides of the template window (s), so the
    /// taper ramps fall outside it.
    pub margin: f64,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            oversample: 4,
            taper_alpha: 0.25,
            margin: 0.05,
        }
    }
}

impl RenderSpec {
    /// Check the factor and taper fraction.
    pub fn validate(&self) -> Result<()> {
        if self.oversample == 0 {
            return Err(Error::InvalidInput("oversample must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.taper_alpha) {
            return Err(Error::InvalidInput(format!(
                "taper_alpha {} must lie in [0, 1]",
                self.taper_alpha
            )));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(Error::InvalidInput(format!("margin {} must be non-negative", self.margin)));
        }
        Ok(())
    }
}

/// Turns source parameters into frequency-domain waveforms and windowed
/// time-domain templates.
///
/// The grids are built once and never change; every call recomputes from
/// scratch.
///
/// # Example
///
/// ```rust,no_run
/// use gwslider_core::IntrinsicParams;
/// use gwslider_waveform::{WaveformSpec, WaveformSynthesizer};
///
/// let synth = WaveformSynthesizer::new(WaveformSpec::default()).unwrap();
/// let template = synth
///     .time_domain(&IntrinsicParams::new(34.6, 30.0, 0.0, 0.0), 0.0)
///     .unwrap();
/// assert_eq!(template.len(), synth.times().len());
/// ```
pub struct WaveformSynthesizer<O = PhenomImr> {
    spec: WaveformSpec,
    grid: FrequencyGrid,
    times: TimeGrid,
    oracle: O,
    fft: Fft,
}

impl WaveformSynthesizer<PhenomImr> {
    /// Synthesizer backed by the built-in IMR approximant.
    pub fn new(spec: WaveformSpec) -> Result<Self> {
        Self::with_oracle(spec, PhenomImr)
    }
}

impl<O: WaveformOracle> WaveformSynthesizer<O> {
    /// Synthesizer backed by an arbitrary model.
    pub fn with_oracle(spec: WaveformSpec, oracle: O) -> Result<Self> {
        let grid = FrequencyGrid::new(&spec)?;
        let times = TimeGrid::new(&spec, &grid)?;
        let fft = Fft::new(grid.time_domain_len());
        Ok(Self {
            spec,
            grid,
            times,
            oracle,
            fft,
        })
    }

    /// Grid and window layout.
    pub fn spec(&self) -> &WaveformSpec {
        &self.spec
    }

    /// Frequency axis.
    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// Template time axis.
    pub fn times(&self) -> &TimeGrid {
        &self.times
    }

    /// The waveform model.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Complex waveform on the full grid, zero at and below `f_min`.
    ///
    /// Parameters are validated before the model is consulted; non-finite
    /// model output is rejected.
    pub fn frequency_domain(&self, params: &IntrinsicParams, reference_phase: f64) -> Result<Vec<Complex64>> {
        params.validate()?;
        tracing::debug!(oracle = self.oracle.name(), %params, reference_phase, "synthesizing waveform");

        let synthesis = self.grid.synthesis();
        let request = OracleRequest {
            frequencies: synthesis,
            reference_phase,
            reference_frequency: 0.0,
            mass1_kg: params.mass1 * MSUN_SI,
            mass2_kg: params.mass2 * MSUN_SI,
            spin1z: params.spin1z,
            spin2z: params.spin2z,
            distance_m: self.spec.distance_m(),
        };
        let h22 = self.oracle.generate(&request)?;

        Error::check_len("oracle amplitude", synthesis.len(), h22.amplitude.len())?;
        Error::check_len("oracle phase", synthesis.len(), h22.phase.len())?;
        if let Some((name, i)) = h22.first_non_finite() {
            return Err(Error::Oracle(format!(
                "{} returned non-finite {name} at {} Hz",
                self.oracle.name(),
                synthesis[i]
            )));
        }

        let mut spectrum = vec![Complex64::new(0.0, 0.0); self.grid.len()];
        let first = self.grid.first_index();
        for (k, ((&amp, &phase), &taper)) in h22
            .amplitude
            .iter()
            .zip(&h22.phase)
            .zip(self.grid.taper())
            .enumerate()
        {
            spectrum[first + k] = Complex64::from_polar(amp * taper, -phase);
        }
        Ok(spectrum)
    }

    /// Real inverse transform, circularly shifted so the first maximum lands
    /// on the merger index, then cut to the template window.
    pub fn inverse_transform(&self, spectrum: &[Complex64]) -> Result<Vec<f64>> {
        self.extended(spectrum, 0)
    }

    /// Like [`inverse_transform`](Self::inverse_transform), with `lead`
    /// extra samples kept on each side of the window.
    fn extended(&self, spectrum: &[Complex64], lead: usize) -> Result<Vec<f64>> {
        Error::check_len("frequency-domain waveform", self.grid.len(), spectrum.len())?;
        let full = self.fft.inverse_real(spectrum);
        let len = self.times.len() + 2 * lead;
        if len > full.len() {
            return Err(Error::InvalidInput(format!(
                "{lead} extra samples per side do not fit the {} sample transform",
                full.len()
            )));
        }

        let peak = full
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0;
        let shift = (self.times.merger_index() + lead) as isize - peak as isize;
        let mut template = roll(&full, shift);
        template.truncate(len);
        Ok(template)
    }

    /// Windowed time-domain template for `params`.
    pub fn time_domain(&self, params: &IntrinsicParams, reference_phase: f64) -> Result<Vec<f64>> {
        let spectrum = self.frequency_domain(params, reference_phase)?;
        self.inverse_transform(&spectrum)
    }

    /// Template resampled to `sample_rate` and zero-padded to `total_len`
    /// samples with the merger at index `merger_at`.
    ///
    /// The template window widened by `render.margin` on both sides is
    /// linearly interpolated onto a grid `oversample` times finer than the
    /// target rate, tapered, and brought down to the target rate by Fourier
    /// resampling.
    pub fn render_padded_template(
        &self,
        params: &IntrinsicParams,
        render: &RenderSpec,
        sample_rate: f64,
        total_len: usize,
        merger_at: usize,
    ) -> Result<Vec<f64>> {
        render.validate()?;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidInput(format!(
                "sample rate {sample_rate} must be positive"
            )));
        }

        let source_dt = self.times.dt();
        let lead = (render.margin / source_dt).ceil() as usize;
        let spectrum = self.frequency_domain(params, 0.0)?;
        let source = self.extended(&spectrum, lead)?;
        let source_start = self.times.start() - lead as f64 * source_dt;
        let source_times: Vec<f64> = (0..source.len()).map(|i| source_start + i as f64 * source_dt).collect();

        let start = self.spec.window_start - render.margin;
        let span = self.spec.window_end + render.margin - start;
        let n_coarse = (span * sample_rate + 1e-6).floor() as usize;
        if n_coarse < 2 {
            return Err(Error::InvalidInput(format!(
                "template window of {span} s is shorter than two samples at {sample_rate} Hz"
            )));
        }
        let n_fine = n_coarse * render.oversample;
        let fine_dt = 1.0 / (sample_rate * render.oversample as f64);
        let fine_times: Vec<f64> = (0..n_fine).map(|i| start + i as f64 * fine_dt).collect();

        let mut fine = interp_linear(&fine_times, &source_times, &source)?;
        apply_tukey(&mut fine, render.taper_alpha);
        let coarse = resample(&fine, n_coarse)?;

        let merger = (-start * sample_rate).round() as usize;
        let Some(first) = merger_at.checked_sub(merger) else {
            return Err(Error::InvalidInput(format!(
                "merger at sample {merger_at} leaves no room for the {merger} template samples before it"
            )));
        };
        if first + n_coarse > total_len {
            return Err(Error::shape("padded template", first + n_coarse, total_len));
        }
        let mut padded = vec![0.0; total_len];
        padded[first..first + n_coarse].copy_from_slice(&coarse);
        tracing::debug!(merger_at, first, n_coarse, "padded template");
        Ok(padded)
    }
}
