//! Waveform model interface.
//!
//! A model maps source parameters onto amplitude, phase and time-of-frequency
//! arrays evaluated on caller-supplied frequencies. The synthesizer only
//! talks to models through [`WaveformOracle`], so a different approximant
//! can be dropped in without touching conditioning or filtering.

use gwslider_core::Result;

/// Arguments of a single model evaluation.
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    /// Ascending, strictly positive frequencies (Hz).
    pub frequencies: &'a [f64],
    /// Orbital reference phase (rad).
    pub reference_phase: f64,
    /// Reference frequency (Hz); 0 selects the model's peak frequency.
    pub reference_frequency: f64,
    /// Primary mass (kg).
    pub mass1_kg: f64,
    /// Secondary mass (kg).
    pub mass2_kg: f64,
    /// Aligned spin of the primary.
    pub spin1z: f64,
    /// Aligned spin of the secondary.
    pub spin2z: f64,
    /// Luminosity distance (m).
    pub distance_m: f64,
}

/// Parallel amplitude, phase and time arrays, one entry per requested
/// frequency.
///
/// The strain is `amplitude · exp(−i·phase)`; `time` is `phase'(f) / 2π`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmpPhase {
    /// Strain amplitude (1/Hz).
    pub amplitude: Vec<f64>,
    /// Phase (rad).
    pub phase: Vec<f64>,
    /// Time of each frequency relative to the reference (s).
    pub time: Vec<f64>,
}

impl AmpPhase {
    /// Preallocate for `n` frequencies.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            amplitude: Vec::with_capacity(n),
            phase: Vec::with_capacity(n),
            time: Vec::with_capacity(n),
        }
    }

    /// Number of frequencies.
    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    /// Whether no frequencies were evaluated.
    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }

    /// First non-finite entry, as `(array name, index)`.
    pub fn first_non_finite(&self) -> Option<(&'static str, usize)> {
        [
            ("amplitude", &self.amplitude),
            ("phase", &self.phase),
            ("time", &self.time),
        ]
        .into_iter()
        .find_map(|(name, values)| values.iter().position(|v| !v.is_finite()).map(|i| (name, i)))
    }
}

/// A frequency-domain waveform model for the dominant (2,2) mode.
pub trait WaveformOracle {
    /// Short model name for logs.
    fn name(&self) -> &str;

    /// Evaluate the model on `request.frequencies`.
    fn generate(&self, request: &OracleRequest<'_>) -> Result<AmpPhase>;
}

impl<O: WaveformOracle + ?Sized> WaveformOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&self, request: &OracleRequest<'_>) -> Result<AmpPhase> {
        (**self).generate(request)
    }
}
