//! Physical constants in SI units.

/// Speed of light in vacuum (m/s).
pub const C_SI: f64 = 299_792_458.0;

/// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
pub const G_SI: f64 = 6.674_30e-11;

/// Solar mass (kg).
pub const MSUN_SI: f64 = 1.988_409_870_698_051e30;

/// Solar mass expressed as a time, `G·M☉/c³` (s).
pub const MTSUN_SI: f64 = MSUN_SI * G_SI / (C_SI * C_SI * C_SI);

/// Parsec (m).
pub const PC_SI: f64 = 3.085_677_581_491_367e16;

/// Megaparsec (m).
pub const MPC_SI: f64 = 1.0e6 * PC_SI;

/// Euler–Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Largest aligned spin magnitude accepted by the waveform model
/// (near-extremal Kerr bound).
pub const SPIN_LIMIT: f64 = 0.997;

/// Convert a mass in kilograms to seconds (`G·m/c³`).
#[inline]
pub fn mass_kg_to_seconds(mass_kg: f64) -> f64 {
    mass_kg * G_SI / (C_SI * C_SI * C_SI)
}
