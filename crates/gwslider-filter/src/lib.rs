//! Matched filtering and interactive exploration for gwslider.
//!
//! - [`matched_filter`] - frequency-domain matched filter with SNR, effective
//!   distance, phase and time offset of the best fit
//! - [`align`] - best-fit template alignment and residuals
//! - [`pipeline`] - per-event analysis across both detectors
//! - [`simulate`] - injections in colored Gaussian noise with a known PSD
//! - [`session`] - session, user state, pure recomputation and the explorer
//!
//! # Example
//!
//! ```rust,no_run
//! use gwslider_config::{AnalysisConfig, EventTable};
//! use gwslider_filter::{Explorer, Session, StateUpdate};
//! use std::path::Path;
//!
//! let session = Session::load(AnalysisConfig::default(), &EventTable::default(), Path::new("."), Path::new(".")).unwrap();
//! let mut explorer = Explorer::new(&session).unwrap();
//! explorer.apply(StateUpdate::ToggleResidual).unwrap();
//! let render = explorer.render().unwrap();
//! println!("{}: SNR {:.1}, amplitude {:.2}", render.event, render.snr, render.amplitude);
//! ```

pub mod align;
pub mod matched_filter;
pub mod pipeline;
pub mod session;
pub mod simulate;

pub use align::{Alignment, align_template, residual};
pub use matched_filter::{
    DEFAULT_REFERENCE_SNR, DEFAULT_TAPER_ALPHA, MatchedFilter, MatchedFilterOutput, matched_filter,
};
pub use pipeline::{DetectorResult, FilterSettings, MatchedFilterReport, calculate_matched_filter};
pub use session::{AppState, Explorer, RenderData, Session, SessionError, StateUpdate, recompute};
pub use simulate::{AligoPsd, SIMULATED_EVENT_NAME, colored_noise, optimal_snr, simulate_dataset, simulate_event};
