//! GWslider Core - signal conditioning for gravitational-wave matched filtering
//!
//! This crate holds the numeric building blocks shared by waveform synthesis
//! and matched filtering:
//!
//! - [`fft`] - FFT wrapper with unnormalized forward / `1/n` inverse transforms and frequency axes
//! - [`window`] - Tukey tapering window
//! - [`iir`] - Butterworth band-pass design and zero-phase `filtfilt`
//! - [`conditioning`] - Whitening by a PSD and band-passing of strain series
//! - [`psd`] - Noise PSD models (tabulated and flat)
//! - [`resample`] - Linear interpolation, circular shifts, FFT resampling
//! - [`params`] - Intrinsic / derived source parameters and slider modes
//! - [`constants`] - Physical constants in SI units
//!
//! All arithmetic is `f64`: detector PSDs sit around `1e-46 /Hz`, far below
//! what single precision can resolve after squaring.
//!
//! ## Example
//!
//! ```rust
//! use gwslider_core::{Band, FlatPsd, bandpass, whiten};
//!
//! let fs = 4096.0;
//! let strain: Vec<f64> = (0..8192).map(|i| (i as f64 * 0.1).sin() * 1e-21).collect();
//! let white = whiten(&strain, &FlatPsd::new(1e-46), 1.0 / fs).unwrap();
//! let filtered = bandpass(&white, Band::new(35.0, 350.0), fs).unwrap();
//! assert_eq!(filtered.len(), strain.len());
//! ```

pub mod conditioning;
pub mod constants;
pub mod error;
pub mod fft;
pub mod iir;
pub mod params;
pub mod psd;
pub mod resample;
pub mod window;

pub use conditioning::{Band, bandpass, whiten, whiten_shifted};
pub use error::{Error, Result};
pub use fft::{Fft, fftfreq, irfft, rfft, rfftfreq};
pub use iir::{Biquad, SosFilter};
pub use params::{DerivedParams, IntrinsicParams, MassMode, ParamMode, SpinMode, chirp_mass};
pub use psd::{FlatPsd, InterpolatedPsd, Psd, PsdTable};
pub use resample::{interp_linear, resample, roll};
pub use window::{apply_tukey, tukey, tukey_windowed};

pub use rustfft::num_complex::Complex64;
