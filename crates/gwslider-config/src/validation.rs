//! Configuration and event-table validation.
//!
//! Validation collects every problem instead of stopping at the first one,
//! so a user editing a file sees the whole list at once.
//!
//! # Example
//!
//! ```rust
//! use gwslider_config::{AnalysisConfig, validate_analysis};
//!
//! let mut config = AnalysisConfig::default();
//! validate_analysis(&config).expect("defaults are valid");
//!
//! config.filter.window_seconds = 40.0;
//! config.simulation.snr = 0.0;
//! let err = validate_analysis(&config).unwrap_err();
//! assert_eq!(err.count(), 2);
//! ```

use std::collections::HashSet;
use thiserror::Error;

use crate::analysis::AnalysisConfig;
use crate::events::EventTable;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value out of range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the field.
        field: String,
        /// The rejected value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Inconsistent or malformed field.
    #[error("invalid '{field}': {reason}")]
    Invalid {
        /// Dotted path of the field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Two events share a name.
    #[error("duplicate event name: {0}")]
    DuplicateEvent(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    /// Number of individual problems carried.
    pub fn count(&self) -> usize {
        match self {
            ValidationError::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }

    fn invalid(field: impl Into<String>, reason: impl ToString) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Accumulates problems and folds them into one result.
#[derive(Default)]
struct Problems(Vec<ValidationError>);

impl Problems {
    fn range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !(value.is_finite() && value >= min && value <= max) {
            self.0.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        if !(value.is_finite() && value > 0.0) {
            self.0.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
    }

    fn check<E: ToString>(&mut self, field: &str, result: Result<(), E>) {
        if let Err(e) = result {
            self.0.push(ValidationError::invalid(field, e));
        }
    }

    fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.0.len() {
            0 => Ok(()),
            1 => Err(self.0.remove(0)),
            _ => Err(ValidationError::Multiple(self.0)),
        }
    }
}

/// Validate an analysis configuration.
pub fn validate_analysis(config: &AnalysisConfig) -> ValidationResult<()> {
    let mut problems = Problems::default();

    problems.check("waveform", config.waveform.validate());
    problems.check("render", config.render.validate());

    let filter = &config.filter;
    problems.positive("filter.window_seconds", filter.window_seconds);
    problems.positive("filter.analysis_seconds", filter.analysis_seconds);
    if filter.window_seconds > filter.analysis_seconds {
        problems.push(ValidationError::invalid(
            "filter.window_seconds",
            format!(
                "{} s window exceeds the {} s dataset",
                filter.window_seconds, filter.analysis_seconds
            ),
        ));
    }
    let template_span = config.waveform.window_end - config.waveform.window_start;
    if template_span >= filter.window_seconds {
        problems.push(ValidationError::invalid(
            "filter.window_seconds",
            format!("{template_span} s template does not fit the analysis window"),
        ));
    }
    problems.range("filter.taper_alpha", filter.taper_alpha, 0.0, 1.0);
    problems.positive("filter.reference_snr", filter.reference_snr);

    let sim = &config.simulation;
    problems.positive("simulation.snr", sim.snr);
    problems.positive("simulation.sample_rate", sim.sample_rate);
    problems.positive("simulation.gps_center", sim.gps_center);
    problems.check("simulation.injection", sim.injection.validate());
    problems.check("filter.band", filter.band.validate(sim.sample_rate));

    problems.finish()
}

/// Validate an event table.
pub fn validate_events(table: &EventTable) -> ValidationResult<()> {
    let mut problems = Problems::default();
    let mut seen = HashSet::new();

    for event in table {
        let name = event.name.trim();
        if name.is_empty() {
            problems.push(ValidationError::invalid("events.name", "empty event name"));
            continue;
        }
        if !seen.insert(name.to_ascii_uppercase()) {
            problems.push(ValidationError::DuplicateEvent(name.to_string()));
        }
        problems.positive(&format!("{name}.gps_time"), event.gps_time);
        problems.positive(&format!("{name}.mass1"), event.mass1);
        problems.positive(&format!("{name}.mass2"), event.mass2);
        problems.range(&format!("{name}.chi_eff"), event.chi_eff, -1.0, 1.0);
        problems.range(&format!("{name}.chi_a"), event.chi_a, -1.0, 1.0);
        problems.check(name, event.reference_params().validate());
    }

    problems.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ReferenceEvent;
    use gwslider_core::Band;

    #[test]
    fn defaults_are_valid() {
        validate_analysis(&AnalysisConfig::default()).unwrap();
    }

    #[test]
    fn single_problem_is_not_wrapped() {
        let mut config = AnalysisConfig::default();
        config.filter.reference_snr = 0.0;
        let err = validate_analysis(&config).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "filter.reference_snr"));
    }

    #[test]
    fn all_problems_are_reported() {
        let mut config = AnalysisConfig::default();
        config.filter.band = Band::new(35.0, 3000.0);
        config.filter.taper_alpha = 1.5;
        config.render.oversample = 0;
        config.simulation.injection.spin1z = 0.998;
        let err = validate_analysis(&config).unwrap_err();
        assert_eq!(err.count(), 4, "{err}");
        let msg = err.to_string();
        assert!(msg.contains("filter.band"), "{msg}");
        assert!(msg.contains("spin1z"), "{msg}");
    }

    #[test]
    fn window_must_hold_template() {
        let mut config = AnalysisConfig::default();
        config.filter.window_seconds = 0.2;
        let err = validate_analysis(&config).unwrap_err();
        assert!(err.to_string().contains("template"), "{err}");
    }

    #[test]
    fn duplicate_events_detected() {
        let table = EventTable::new(vec![
            ReferenceEvent::new("GW150914", 1126259462.4, 34.6, 30.0),
            ReferenceEvent::new("gw150914", 1126259462.4, 34.6, 30.0),
        ]);
        assert_eq!(
            validate_events(&table).unwrap_err(),
            ValidationError::DuplicateEvent("gw150914".to_string())
        );
    }

    #[test]
    fn bad_event_values_collected() {
        let table = EventTable::new(vec![
            ReferenceEvent::new("A", -1.0, 0.0, 30.0),
            ReferenceEvent::new("", 1.0, 30.0, 30.0),
        ]);
        let err = validate_events(&table).unwrap_err();
        // gps_time, mass1, mass1 domain, empty name
        assert_eq!(err.count(), 4, "{err}");
    }
}
