//! Source parameters and their reparametrizations.
//!
//! The waveform model consumes the intrinsic vector (component masses in
//! solar masses, aligned dimensionless spins). Interactive exploration can
//! instead drive chirp mass / mass ratio and effective / antisymmetric spin;
//! [`ParamMode`] says which pair each slider slot holds.

use crate::constants::SPIN_LIMIT;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Component masses (M☉) and aligned spins of a binary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicParams {
    /// Primary mass (M☉).
    pub mass1: f64,
    /// Secondary mass (M☉).
    pub mass2: f64,
    /// Dimensionless aligned spin of the primary.
    pub spin1z: f64,
    /// Dimensionless aligned spin of the secondary.
    pub spin2z: f64,
}

/// Chirp mass, mass ratio, effective spin and antisymmetric spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedParams {
    /// Chirp mass (M☉).
    pub chirp_mass: f64,
    /// `mass2 / mass1`.
    pub mass_ratio: f64,
    /// Mass-weighted spin sum.
    pub chi_eff: f64,
    /// Mass-weighted spin difference.
    pub chi_a: f64,
}

/// Chirp mass of a pair of component masses.
pub fn chirp_mass(mass1: f64, mass2: f64) -> f64 {
    (mass1 * mass2).powf(0.6) / (mass1 + mass2).powf(0.2)
}

impl IntrinsicParams {
    /// Create a parameter vector. No validation is performed.
    pub const fn new(mass1: f64, mass2: f64, spin1z: f64, spin2z: f64) -> Self {
        Self {
            mass1,
            mass2,
            spin1z,
            spin2z,
        }
    }

    /// Build from component masses and effective / antisymmetric spins, the
    /// form reference parameter tables use.
    pub fn from_masses_and_effective_spins(mass1: f64, mass2: f64, chi_eff: f64, chi_a: f64) -> Self {
        let (spin1z, spin2z) = component_spins(mass1, mass2, chi_eff, chi_a);
        Self::new(mass1, mass2, spin1z, spin2z)
    }

    /// Reject non-physical values before any waveform is generated.
    ///
    /// Masses must be finite and positive; spins must lie in
    /// `[-0.997, 0.997]`.
    pub fn validate(&self) -> Result<()> {
        for (param, value) in [("mass1", self.mass1), ("mass2", self.mass2)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Domain {
                    param,
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        for (param, value) in [("spin1z", self.spin1z), ("spin2z", self.spin2z)] {
            if !(-SPIN_LIMIT..=SPIN_LIMIT).contains(&value) {
                return Err(Error::Domain {
                    param,
                    value,
                    min: -SPIN_LIMIT,
                    max: SPIN_LIMIT,
                });
            }
        }
        Ok(())
    }

    /// `mass1 + mass2` (M☉).
    pub fn total_mass(&self) -> f64 {
        self.mass1 + self.mass2
    }

    /// Symmetric mass ratio `m1·m2 / M²`.
    pub fn symmetric_mass_ratio(&self) -> f64 {
        let m = self.total_mass();
        self.mass1 * self.mass2 / (m * m)
    }

    /// Chirp mass (M☉).
    pub fn chirp_mass(&self) -> f64 {
        chirp_mass(self.mass1, self.mass2)
    }

    /// `mass2 / mass1`.
    pub fn mass_ratio(&self) -> f64 {
        self.mass2 / self.mass1
    }

    /// Effective spin `(m1·χ1 + m2·χ2) / M`.
    pub fn chi_eff(&self) -> f64 {
        (self.mass1 * self.spin1z + self.mass2 * self.spin2z) / self.total_mass()
    }

    /// Antisymmetric spin `(m2·χ2 − m1·χ1) / M`.
    pub fn chi_a(&self) -> f64 {
        (self.mass2 * self.spin2z - self.mass1 * self.spin1z) / self.total_mass()
    }

    /// Convert to the derived parametrization.
    pub fn to_derived(&self) -> DerivedParams {
        DerivedParams {
            chirp_mass: self.chirp_mass(),
            mass_ratio: self.mass_ratio(),
            chi_eff: self.chi_eff(),
            chi_a: self.chi_a(),
        }
    }

    /// Values as `[mass1, mass2, spin1z, spin2z]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.mass1, self.mass2, self.spin1z, self.spin2z]
    }
}

impl fmt::Display for IntrinsicParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m1={:.3} m2={:.3} chi1={:.3} chi2={:.3}",
            self.mass1, self.mass2, self.spin1z, self.spin2z
        )
    }
}

/// Component spins from effective and antisymmetric spins.
fn component_spins(mass1: f64, mass2: f64, chi_eff: f64, chi_a: f64) -> (f64, f64) {
    let m = mass1 + mass2;
    (
        m / (2.0 * mass1) * (chi_eff - chi_a),
        m / (2.0 * mass2) * (chi_eff + chi_a),
    )
}

/// Component masses from chirp mass and `mass2 / mass1`.
fn component_masses(chirp: f64, mass_ratio: f64) -> Result<(f64, f64)> {
    if !(chirp.is_finite() && chirp > 0.0) {
        return Err(Error::Domain {
            param: "chirp_mass",
            value: chirp,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    if !(mass_ratio.is_finite() && mass_ratio > 0.0) {
        return Err(Error::Domain {
            param: "mass_ratio",
            value: mass_ratio,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    let q = 1.0 / mass_ratio;
    let common = (1.0 + q).powf(0.2) * chirp;
    Ok((q.powf(0.4) * common, q.powf(-0.6) * common))
}

impl DerivedParams {
    /// Convert back to component masses and spins.
    ///
    /// Fails with [`Error::Domain`] if the chirp mass or mass ratio is not
    /// positive; the resulting spins are not range checked here.
    pub fn to_intrinsic(&self) -> Result<IntrinsicParams> {
        let (mass1, mass2) = component_masses(self.chirp_mass, self.mass_ratio)?;
        Ok(IntrinsicParams::from_masses_and_effective_spins(
            mass1,
            mass2,
            self.chi_eff,
            self.chi_a,
        ))
    }
}

/// How the two mass slots are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassMode {
    /// `mass1`, `mass2`.
    #[default]
    Components,
    /// Chirp mass and `mass2 / mass1`.
    ChirpRatio,
}

/// How the two spin slots are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    /// `spin1z`, `spin2z`.
    #[default]
    Components,
    /// `chi_eff`, `chi_a`.
    EffectiveAntisymmetric,
}

/// Interpretation of a four-slot slider vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamMode {
    /// Mass slot interpretation.
    pub mass: MassMode,
    /// Spin slot interpretation.
    pub spin: SpinMode,
}

impl ParamMode {
    /// Create a mode.
    pub const fn new(mass: MassMode, spin: SpinMode) -> Self {
        Self { mass, spin }
    }

    /// Slot labels in slider order.
    pub fn labels(&self) -> [&'static str; 4] {
        let [m1, m2] = match self.mass {
            MassMode::Components => ["mass1", "mass2"],
            MassMode::ChirpRatio => ["chirp_mass", "mass_ratio"],
        };
        let [s1, s2] = match self.spin {
            SpinMode::Components => ["spin1z", "spin2z"],
            SpinMode::EffectiveAntisymmetric => ["chi_eff", "chi_a"],
        };
        [m1, m2, s1, s2]
    }

    /// Express `params` as slider values under this mode.
    pub fn to_sliders(&self, params: &IntrinsicParams) -> [f64; 4] {
        let [a, b] = match self.mass {
            MassMode::Components => [params.mass1, params.mass2],
            MassMode::ChirpRatio => [params.chirp_mass(), params.mass_ratio()],
        };
        let [c, d] = match self.spin {
            SpinMode::Components => [params.spin1z, params.spin2z],
            SpinMode::EffectiveAntisymmetric => [params.chi_eff(), params.chi_a()],
        };
        [a, b, c, d]
    }

    /// Interpret slider values under this mode.
    ///
    /// The masses are resolved first, since effective spins are mass
    /// weighted. The result is not range checked; call
    /// [`IntrinsicParams::validate`] before synthesis.
    pub fn from_sliders(&self, sliders: [f64; 4]) -> Result<IntrinsicParams> {
        let [a, b, c, d] = sliders;
        let (mass1, mass2) = match self.mass {
            MassMode::Components => (a, b),
            MassMode::ChirpRatio => component_masses(a, b)?,
        };
        Ok(match self.spin {
            SpinMode::Components => IntrinsicParams::new(mass1, mass2, c, d),
            SpinMode::EffectiveAntisymmetric => {
                IntrinsicParams::from_masses_and_effective_spins(mass1, mass2, c, d)
            }
        })
    }
}

impl fmt::Display for ParamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join("/"))
    }
}
