//! Interactive exploration: session, state and recomputation.
//!
//! A [`Session`] owns everything that is fixed for a run (configuration,
//! synthesizer, registry). Everything the user can change lives in
//! [`AppState`]; [`recompute`] turns the pair into plot curves and readouts
//! from scratch. [`Explorer`] applies [`StateUpdate`]s and keeps the last
//! good render when a recomputation fails.

use gwslider_config::{AnalysisConfig, EventTable};
use gwslider_core::{IntrinsicParams, MassMode, ParamMode, SpinMode};
use gwslider_registry::{Detector, EventRegistry, RegisteredEvent, RegistryError};
use gwslider_waveform::{PhenomImr, WaveformOracle, WaveformSynthesizer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::pipeline::{FilterSettings, MatchedFilterReport, calculate_matched_filter};
use crate::simulate::simulate_event;

/// Errors surfaced by a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Numeric or parameter error
    #[error(transparent)]
    Core(#[from] gwslider_core::Error),

    /// Event lookup or dataset error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Slider index outside `0..4`
    #[error("slider index {0} out of range (0..4)")]
    SliderIndex(usize),

    /// The registry has no event with a usable dataset
    #[error("no event has a usable dataset")]
    NoUsableEvent,
}

impl SessionError {
    /// Whether the error is a parameter outside its physical range.
    pub fn is_domain(&self) -> bool {
        match self {
            Self::Core(e) | Self::Registry(RegistryError::Core(e)) => e.is_domain(),
            _ => false,
        }
    }
}

/// Immutable context of an exploration run.
pub struct Session<O = PhenomImr> {
    config: AnalysisConfig,
    synth: WaveformSynthesizer<O>,
    registry: EventRegistry,
    settings: FilterSettings,
}

impl Session<PhenomImr> {
    /// Session over an existing registry, using the built-in model.
    pub fn new(config: AnalysisConfig, registry: EventRegistry) -> Result<Self, SessionError> {
        Self::with_oracle(config, registry, PhenomImr)
    }

    /// Load every event in `table` and, when enabled, add the simulated
    /// event.
    pub fn load(
        config: AnalysisConfig,
        table: &EventTable,
        base: &Path,
        datasets_dir: &Path,
    ) -> Result<Self, SessionError> {
        let registry = EventRegistry::from_table(table, base, datasets_dir);
        let mut session = Self::new(config, registry)?;
        if session.config.simulation.enabled {
            let event = simulate_event(&session.config, &session.synth)?;
            session.registry.insert(event);
        }
        Ok(session)
    }
}

impl<O: WaveformOracle> Session<O> {
    /// Session backed by an arbitrary waveform model.
    pub fn with_oracle(config: AnalysisConfig, registry: EventRegistry, oracle: O) -> Result<Self, SessionError> {
        let synth = WaveformSynthesizer::with_oracle(config.waveform, oracle)?;
        let settings = FilterSettings::from(&config.filter);
        Ok(Self {
            config,
            synth,
            registry,
            settings,
        })
    }

    /// Analysis configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Waveform synthesizer.
    pub fn synth(&self) -> &WaveformSynthesizer<O> {
        &self.synth
    }

    /// Registered events.
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Filter settings derived from the configuration.
    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// First event with a usable dataset.
    pub fn default_event(&self) -> Option<&RegisteredEvent> {
        self.registry.usable().next()
    }

    /// Template for `params` rendered onto `event`'s sample grid.
    pub fn template(&self, event: &RegisteredEvent, params: &IntrinsicParams) -> Result<Vec<f64>, SessionError> {
        let dataset = event.dataset()?;
        Ok(self
            .synth
            .render_padded_template(params, &self.config.render, dataset.sample_rate(), dataset.len(), dataset.center_index())?)
    }

    /// Render a template for `params` and filter it against `event`.
    pub fn analyze(&self, event: &RegisteredEvent, params: &IntrinsicParams) -> Result<MatchedFilterReport, SessionError> {
        let template = self.template(event, params)?;
        Ok(calculate_matched_filter(&template, event.dataset()?, &self.settings)?)
    }
}

/// Everything the user controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Selected event name.
    pub event: String,
    /// Detector whose curves are shown.
    pub detector: Detector,
    /// How the four sliders are interpreted.
    pub mode: ParamMode,
    /// Slider values in `mode`.
    pub sliders: [f64; 4],
    /// Whether the residual curve is shown.
    pub show_residual: bool,
}

impl AppState {
    /// State showing `event` at its reference parameters.
    ///
    /// Starts on L1, the detector the analysis reports last.
    pub fn at_reference(event: &RegisteredEvent) -> Self {
        let mode = ParamMode::default();
        Self {
            event: event.name().to_string(),
            detector: Detector::L1,
            mode,
            sliders: mode.to_sliders(event.reference()),
            show_residual: false,
        }
    }

    /// Source parameters the sliders describe.
    pub fn params(&self) -> gwslider_core::Result<IntrinsicParams> {
        self.mode.from_sliders(self.sliders)
    }
}

/// Curves and readouts for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderData {
    /// Event shown.
    pub event: String,
    /// Detector shown.
    pub detector: Detector,
    /// Parameters the template was built from.
    pub params: IntrinsicParams,
    /// Time relative to the event (s).
    pub time: Vec<f64>,
    /// Aligned, whitened, band-passed template.
    pub template: Vec<f64>,
    /// Whitened, band-passed data.
    pub data: Vec<f64>,
    /// `data − template`, when shown.
    pub residual: Option<Vec<f64>>,
    /// Matched-filter SNR for the shown detector.
    pub snr: f64,
    /// `1 / d_eff` for the shown detector.
    pub amplitude: f64,
    /// Best-fit phase (rad) for the shown detector.
    pub phase: f64,
    /// Template shift (samples) for the shown detector.
    pub offset: isize,
    /// Quadrature sum over both detectors.
    pub network_snr: f64,
}

/// Recompute curves and readouts for `state`.
///
/// Pure: the result depends only on the session and the state.
pub fn recompute<O: WaveformOracle>(session: &Session<O>, state: &AppState) -> Result<RenderData, SessionError> {
    let event = session.registry().get(&state.event)?;
    let params = state.params()?;
    params.validate()?;
    let report = session.analyze(event, &params)?;
    let shown = report.detector(state.detector);
    tracing::debug!(
        event = event.name(),
        detector = %state.detector,
        snr = shown.filter.snr,
        network_snr = report.network_snr(),
        "recomputed"
    );

    Ok(RenderData {
        event: event.name().to_string(),
        detector: state.detector,
        params,
        time: report.time().to_vec(),
        template: shown.template.clone(),
        data: shown.data.clone(),
        residual: state.show_residual.then(|| shown.residual.clone()),
        snr: shown.filter.snr,
        amplitude: shown.amplitude(),
        phase: shown.filter.phase,
        offset: shown.filter.offset,
        network_snr: report.network_snr(),
    })
}

/// A single user action.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// Move slider `index` to `value`, clamped to the event's bounds.
    SetSlider {
        /// Slot `0..4`.
        index: usize,
        /// Requested value.
        value: f64,
    },
    /// Switch the mass slots, converting their values.
    SetMassMode(MassMode),
    /// Switch the spin slots, converting their values.
    SetSpinMode(SpinMode),
    /// Show another event at its reference parameters.
    SelectEvent(String),
    /// Show a specific detector.
    SelectDetector(Detector),
    /// Show the other detector.
    ToggleDetector,
    /// Show or hide the residual.
    ToggleResidual,
    /// Reset the sliders to the event's reference parameters.
    GoToReference,
}

/// Drives a session from user actions.
pub struct Explorer<'a, O = PhenomImr> {
    session: &'a Session<O>,
    state: AppState,
    render: Option<RenderData>,
    error: Option<String>,
}

impl<'a, O: WaveformOracle> Explorer<'a, O> {
    /// Start on the session's first usable event at its reference
    /// parameters.
    pub fn new(session: &'a Session<O>) -> Result<Self, SessionError> {
        let event = session.default_event().ok_or(SessionError::NoUsableEvent)?;
        let mut explorer = Self {
            session,
            state: AppState::at_reference(event),
            render: None,
            error: None,
        };
        explorer.refresh()?;
        Ok(explorer)
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Last successful render.
    pub fn render(&self) -> Option<&RenderData> {
        self.render.as_ref()
    }

    /// Message from the last failed update, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The session being explored.
    pub fn session(&self) -> &Session<O> {
        self.session
    }

    /// Apply `update` and recompute.
    ///
    /// An update that cannot be applied leaves the state untouched. A state
    /// that applies but fails to recompute is kept, while the previous
    /// render stays on display. Either way the message is kept in
    /// [`Self::error`].
    pub fn apply(&mut self, update: StateUpdate) -> Result<(), SessionError> {
        match self.next_state(update) {
            Ok(next) => {
                self.state = next;
                self.refresh()
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn refresh(&mut self) -> Result<(), SessionError> {
        match recompute(self.session, &self.state) {
            Ok(render) => {
                self.render = Some(render);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "recompute failed; keeping previous render");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn event(&self) -> Result<&'a RegisteredEvent, SessionError> {
        Ok(self.session.registry().get(&self.state.event)?)
    }

    fn next_state(&self, update: StateUpdate) -> Result<AppState, SessionError> {
        let mut next = self.state.clone();
        match update {
            StateUpdate::SetSlider { index, value } => {
                let ranges = self.event()?.bounds().for_mode(next.mode);
                let range = ranges.get(index).ok_or(SessionError::SliderIndex(index))?;
                next.sliders[index] = range.clamp(value);
            }
            StateUpdate::SetMassMode(mass) => {
                let mode = ParamMode::new(mass, next.mode.spin);
                next.sliders = mode.to_sliders(&next.params()?);
                next.mode = mode;
            }
            StateUpdate::SetSpinMode(spin) => {
                let mode = ParamMode::new(next.mode.mass, spin);
                next.sliders = mode.to_sliders(&next.params()?);
                next.mode = mode;
            }
            StateUpdate::SelectEvent(name) => {
                let event = self.session.registry().get(&name)?;
                event.dataset()?;
                next.event = event.name().to_string();
                next.sliders = next.mode.to_sliders(event.reference());
            }
            StateUpdate::SelectDetector(detector) => next.detector = detector,
            StateUpdate::ToggleDetector => next.detector = next.detector.other(),
            StateUpdate::ToggleResidual => next.show_residual = !next.show_residual,
            StateUpdate::GoToReference => {
                next.sliders = next.mode.to_sliders(self.event()?.reference());
            }
        }
        Ok(next)
    }
}
