//! Slider ranges derived from an event's reference parameters.

use gwslider_core::constants::SPIN_LIMIT;
use gwslider_core::{IntrinsicParams, MassMode, ParamMode, chirp_mass};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Half-width of the component-mass ranges (M☉).
pub const MASS_HALF_WIDTH: f64 = 5.0;

/// Lightest component mass a slider may reach (M☉).
pub const MIN_COMPONENT_MASS: f64 = 1.0;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
}

impl Range {
    /// Create a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies in the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Ranges of every slider for one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    /// Primary mass (M☉).
    pub mass1: Range,
    /// Secondary mass (M☉).
    pub mass2: Range,
    /// Chirp mass (M☉).
    pub chirp_mass: Range,
    /// `mass2 / mass1`.
    pub mass_ratio: Range,
    /// Any spin slider, component or effective.
    pub spin: Range,
    /// Amplitude readout `1 / d_eff`.
    pub amplitude: Range,
    /// Phase readout (rad).
    pub phase: Range,
}

impl SliderBounds {
    /// Bounds around a reference source: component masses ±5 M☉, chirp mass
    /// between the chirp masses of the lower and upper mass corners.
    pub fn around(reference: &IntrinsicParams) -> Self {
        let mass1 = Range::new(
            (reference.mass1 - MASS_HALF_WIDTH).max(MIN_COMPONENT_MASS),
            reference.mass1 + MASS_HALF_WIDTH,
        );
        let mass2 = Range::new(
            (reference.mass2 - MASS_HALF_WIDTH).max(MIN_COMPONENT_MASS),
            reference.mass2 + MASS_HALF_WIDTH,
        );
        Self {
            mass1,
            mass2,
            chirp_mass: Range::new(chirp_mass(mass1.min, mass2.min), chirp_mass(mass1.max, mass2.max)),
            mass_ratio: Range::new(0.0, 0.99),
            spin: Range::new(-SPIN_LIMIT, SPIN_LIMIT),
            amplitude: Range::new(-4.0, 5.0),
            phase: Range::new(-PI, PI),
        }
    }

    /// Ranges of the four parameter slots under `mode`.
    ///
    /// Component and effective spins share one range.
    pub fn for_mode(&self, mode: ParamMode) -> [Range; 4] {
        let (a, b) = match mode.mass {
            MassMode::Components => (self.mass1, self.mass2),
            MassMode::ChirpRatio => (self.chirp_mass, self.mass_ratio),
        };
        [a, b, self.spin, self.spin]
    }

    /// Clamp slider values into their ranges under `mode`.
    pub fn clamp(&self, mode: ParamMode, values: [f64; 4]) -> [f64; 4] {
        let ranges = self.for_mode(mode);
        std::array::from_fn(|i| ranges[i].clamp(values[i]))
    }
}
