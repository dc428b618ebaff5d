//! GWslider Waveform - template synthesis for compact binary coalescences
//!
//! - [`grid`] - Frequency grid, template time axis and their configuration
//! - [`oracle`] - The [`WaveformOracle`] trait every waveform model implements
//! - [`phenom`] - [`PhenomImr`], a closed-form aligned-spin IMR approximant
//! - [`synth`] - [`WaveformSynthesizer`]: frequency-domain waveforms,
//!   windowed time-domain templates and padded templates on a dataset grid
//!
//! The synthesis grid runs from DC to 1024 Hz in 1/16 Hz steps; the model is
//! evaluated only strictly above 16 Hz, where a `tanh` ramp switches it on.
//! The real inverse transform (2048 Hz, 16 s) is rotated so the loudest sample
//! sits at `t = 0` and cut to `[−0.22 s, +0.03 s]`.

pub mod grid;
pub mod oracle;
pub mod phenom;
pub mod synth;

pub use grid::{FrequencyGrid, TimeGrid, WaveformSpec};
pub use oracle::{AmpPhase, OracleRequest, WaveformOracle};
pub use phenom::{PhenomImr, Remnant};
pub use synth::{RenderSpec, WaveformSynthesizer};
