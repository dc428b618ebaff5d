//! Closed-form inspiral-merger-ringdown approximant for aligned-spin binaries.
//!
//! The inspiral phase is TaylorF2 to 3.5PN with aligned-spin corrections.
//! Above half the ringdown frequency the group delay `t(f)` switches to a
//! Lorentzian ringdown term (the transform of a damped sinusoid) plus a
//! saturating bridge that keeps `t` and `t'` continuous; the phase is its
//! closed-form integral. The amplitude is a Phenom-B style three-piece fit,
//! continuous at both transitions.
//!
//! Remnant properties come from published fits: radiated energy, a
//! Rezzolla-type final spin and the Berti–Cardoso–Will fundamental (2,2)
//! quasi-normal mode.

use crate::oracle::{AmpPhase, OracleRequest, WaveformOracle};
use gwslider_core::constants::{C_SI, EULER_GAMMA, mass_kg_to_seconds};
use gwslider_core::{Error, Result};
use std::f64::consts::PI;

/// Remnant spin magnitude is kept inside the extremal Kerr limit.
const MAX_FINAL_SPIN: f64 = 0.998;

/// Aligned-spin IMR frequency-domain approximant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhenomImr;

impl PhenomImr {
    /// Create the model.
    pub fn new() -> Self {
        Self
    }
}

impl WaveformOracle for PhenomImr {
    fn name(&self) -> &str {
        "PhenomImr"
    }

    fn generate(&self, request: &OracleRequest<'_>) -> Result<AmpPhase> {
        if let Some(&f) = request.frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(Error::Oracle(format!("frequency {f} Hz is not positive")));
        }
        let binary = Binary::new(request)?;
        let reference = if request.reference_frequency > 0.0 {
            request.reference_frequency
        } else {
            binary.f_ring
        };
        let phase_ref = binary.phase(reference);
        let time_ref = binary.time(reference);
        let phase_offset = 2.0 * request.reference_phase;

        let mut out = AmpPhase::with_capacity(request.frequencies.len());
        for &f in request.frequencies {
            out.amplitude.push(binary.amplitude(f));
            out.phase
                .push(binary.phase(f) - phase_ref - 2.0 * PI * time_ref * (f - reference) - phase_offset);
            out.time.push(binary.time(f) - time_ref);
        }
        Ok(out)
    }
}

/// Remnant mass and spin of a merger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remnant {
    /// Final mass as a fraction of the initial total mass.
    pub mass_fraction: f64,
    /// Dimensionless final spin.
    pub spin: f64,
}

impl Remnant {
    /// Fit-based remnant for component masses (any units) and aligned spins.
    pub fn from_components(mass1: f64, mass2: f64, spin1z: f64, spin2z: f64) -> Self {
        let total = mass1 + mass2;
        let eta = mass1 * mass2 / (total * total);

        let (heavy_spin, light_spin, q) = if mass2 > mass1 {
            (spin2z, spin1z, mass1 / mass2)
        } else {
            (spin1z, spin2z, mass2 / mass1)
        };
        let q2 = q * q;
        let a_tilde = (heavy_spin + light_spin * q2) / (1.0 + q2);

        const S4: f64 = -0.1229;
        const S5: f64 = 0.4537;
        const T0: f64 = -2.8904;
        const T2: f64 = -3.5171;
        const T3: f64 = 2.5763;
        let spin = a_tilde
            + S4 * a_tilde * a_tilde * eta
            + S5 * a_tilde * eta * eta
            + T0 * a_tilde * eta
            + 2.0 * 3f64.sqrt() * eta
            + T2 * eta * eta
            + T3 * eta * eta * eta;

        let radiated = (1.0 - (8.0f64 / 9.0).sqrt()) * eta + 0.4333 * eta * eta + 0.4392 * eta * eta * eta;

        Self {
            mass_fraction: 1.0 - radiated,
            spin: spin.clamp(-MAX_FINAL_SPIN, MAX_FINAL_SPIN),
        }
    }

    /// Fundamental (2,2) mode `(M_f·ω, Q)`.
    pub fn quasi_normal_mode(&self) -> (f64, f64) {
        let x = 1.0 - self.spin;
        let omega = 1.5251 - 1.1568 * x.powf(0.1292);
        let quality = 0.7 + 1.4187 * x.powf(-0.4990);
        (omega, quality)
    }
}

/// Per-request derived quantities.
struct Binary {
    /// Total mass in seconds.
    m_sec: f64,
    eta: f64,
    /// TaylorF2 coefficients: `Σ (a_k + b_k ln v) v^k`.
    pn_a: [f64; 8],
    pn_b: [f64; 8],
    amp_norm: f64,
    alpha2: f64,
    alpha3: f64,
    eps1: f64,
    eps2: f64,
    f_ring: f64,
    f_damp: f64,
    f_join: f64,
    w_merger: f64,
    w_ring: f64,
    t_join: f64,
    phase_join: f64,
    bridge_slope: f64,
}

impl Binary {
    fn new(request: &OracleRequest<'_>) -> Result<Self> {
        let (m1, m2) = (request.mass1_kg, request.mass2_kg);
        let (s1, s2) = (request.spin1z, request.spin2z);
        if !(m1.is_finite() && m2.is_finite() && m1 > 0.0 && m2 > 0.0) {
            return Err(Error::Oracle(format!("masses {m1} kg, {m2} kg must be positive")));
        }
        if !(s1.abs() < 1.0 && s2.abs() < 1.0) {
            return Err(Error::Oracle(format!("spins {s1}, {s2} must lie in (-1, 1)")));
        }
        let distance = request.distance_m;
        if !(distance.is_finite() && distance > 0.0) {
            return Err(Error::Oracle(format!("distance {distance} m must be positive")));
        }

        let total = m1 + m2;
        let m_sec = mass_kg_to_seconds(total);
        let eta = m1 * m2 / (total * total);
        let delta = (m1 - m2) / total;
        let chi_s = 0.5 * (s1 + s2);
        let chi_a = 0.5 * (s1 - s2);
        let chi_eff = (m1 * s1 + m2 * s2) / total;

        let (pn_a, pn_b) = taylor_f2_coefficients(eta, delta, chi_s, chi_a);

        let remnant = Remnant::from_components(m1, m2, s1, s2);
        let (omega, quality) = remnant.quasi_normal_mode();
        let f_ring = omega / (2.0 * PI * m_sec * remnant.mass_fraction);
        let f_damp = f_ring / (2.0 * quality);
        let f_join = 0.5 * f_ring;

        let amp_norm = (5.0f64 / 24.0).sqrt() * PI.powf(-2.0 / 3.0) * C_SI * eta.sqrt()
            * m_sec.powf(5.0 / 6.0)
            / distance;

        let mut binary = Self {
            m_sec,
            eta,
            pn_a,
            pn_b,
            amp_norm,
            alpha2: -323.0 / 224.0 + 451.0 * eta / 168.0,
            alpha3: (27.0 / 8.0 - 11.0 * eta / 6.0) * chi_eff,
            eps1: 1.4547 * chi_eff - 1.8897,
            eps2: -1.8153 * chi_eff + 1.6557,
            f_ring,
            f_damp,
            f_join,
            w_merger: 0.0,
            w_ring: 0.0,
            t_join: 0.0,
            phase_join: 0.0,
            bridge_slope: 0.0,
        };

        binary.w_merger = binary.inspiral_amplitude(f_join) / binary.merger_shape(f_join);
        binary.w_ring = binary.w_merger * binary.merger_shape(f_ring) / binary.lorentzian(f_ring);

        binary.t_join = binary.inspiral_time(f_join);
        binary.phase_join = binary.inspiral_phase(f_join);
        let h = 1e-3 * f_join;
        let inspiral_slope =
            (binary.inspiral_time(f_join + h) - binary.inspiral_time(f_join - h)) / (2.0 * h);
        binary.bridge_slope = inspiral_slope - binary.ringdown_delay_slope(f_join);

        let weights = [binary.w_merger, binary.w_ring, binary.t_join, binary.bridge_slope];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::Oracle(format!(
                "merger-ringdown matching failed for m1={m1} kg, m2={m2} kg"
            )));
        }
        Ok(binary)
    }

    fn velocity(&self, f: f64) -> f64 {
        (PI * self.m_sec * f).cbrt()
    }

    fn inspiral_phase(&self, f: f64) -> f64 {
        let v = self.velocity(f);
        let ln_v = v.ln();
        let sum: f64 = (0..8)
            .map(|k| (self.pn_a[k] + self.pn_b[k] * ln_v) * v.powi(k as i32 - 5))
            .sum();
        3.0 / (128.0 * self.eta) * sum
    }

    fn inspiral_time(&self, f: f64) -> f64 {
        let v = self.velocity(f);
        let ln_v = v.ln();
        let dpsi_dv: f64 = (0..8)
            .map(|k| {
                let p = k as f64 - 5.0;
                let vk = v.powi(k as i32 - 6);
                self.pn_a[k] * p * vk + self.pn_b[k] * (p * vk * ln_v + vk)
            })
            .sum::<f64>()
            * 3.0
            / (128.0 * self.eta);
        let dv_df = PI * self.m_sec / (3.0 * v * v);
        dpsi_dv * dv_df / (2.0 * PI)
    }

    /// Ringdown group delay, `1 / (2π·f_damp·(1 + x²))`.
    fn ringdown_delay(&self, f: f64) -> f64 {
        let x = (f - self.f_ring) / self.f_damp;
        1.0 / (2.0 * PI * self.f_damp * (1.0 + x * x))
    }

    fn ringdown_delay_slope(&self, f: f64) -> f64 {
        let x = (f - self.f_ring) / self.f_damp;
        let d = 1.0 + x * x;
        -2.0 * x / (2.0 * PI * self.f_damp * self.f_damp * d * d)
    }

    fn bridge(&self, u: f64) -> f64 {
        let s = self.f_damp;
        self.bridge_slope * s * (1.0 - (-u / s).exp())
    }

    fn bridge_integral(&self, u: f64) -> f64 {
        let s = self.f_damp;
        self.bridge_slope * s * (u - s * (1.0 - (-u / s).exp()))
    }

    /// Time of frequency `f` before referencing.
    fn time(&self, f: f64) -> f64 {
        if f < self.f_join {
            return self.inspiral_time(f);
        }
        let u = f - self.f_join;
        self.t_join - self.ringdown_delay(self.f_join) + self.bridge(u) + self.ringdown_delay(f)
    }

    /// Phase of frequency `f` before referencing.
    fn phase(&self, f: f64) -> f64 {
        if f < self.f_join {
            return self.inspiral_phase(f);
        }
        let u = f - self.f_join;
        let x = (f - self.f_ring) / self.f_damp;
        let x_join = (self.f_join - self.f_ring) / self.f_damp;
        let base = 2.0 * PI * self.t_join - 2.0 * PI * self.ringdown_delay(self.f_join);
        self.phase_join + base * u + 2.0 * PI * self.bridge_integral(u) + x.atan() - x_join.atan()
    }

    fn inspiral_amplitude(&self, f: f64) -> f64 {
        let v = self.velocity(f);
        self.amp_norm * f.powf(-7.0 / 6.0) * (1.0 + self.alpha2 * v * v + self.alpha3 * v * v * v)
    }

    fn merger_shape(&self, f: f64) -> f64 {
        let v = self.velocity(f);
        f.powf(-2.0 / 3.0) * (1.0 + self.eps1 * v + self.eps2 * v * v)
    }

    fn lorentzian(&self, f: f64) -> f64 {
        let sigma = 2.0 * self.f_damp;
        let d = f - self.f_ring;
        sigma / (2.0 * PI * (d * d + 0.25 * sigma * sigma))
    }

    fn amplitude(&self, f: f64) -> f64 {
        if f < self.f_join {
            self.inspiral_amplitude(f)
        } else if f < self.f_ring {
            self.w_merger * self.merger_shape(f)
        } else {
            self.w_ring * self.lorentzian(f)
        }
    }
}

/// TaylorF2 phasing coefficients `(a_k, b_k)` with aligned-spin terms.
fn taylor_f2_coefficients(eta: f64, delta: f64, chi_s: f64, chi_a: f64) -> ([f64; 8], [f64; 8]) {
    let eta2 = eta * eta;
    let eta3 = eta2 * eta;
    let pi2 = PI * PI;

    let mut a = [0.0; 8];
    let mut b = [0.0; 8];

    a[0] = 1.0;
    a[2] = 3715.0 / 756.0 + 55.0 * eta / 9.0;
    a[3] = -16.0 * PI + 113.0 / 3.0 * delta * chi_a + (113.0 / 3.0 - 76.0 * eta / 3.0) * chi_s;
    a[4] = 15293365.0 / 508032.0 + 27145.0 * eta / 504.0 + 3085.0 * eta2 / 72.0
        + (-405.0 / 8.0 + 200.0 * eta) * chi_a * chi_a
        - 405.0 / 4.0 * delta * chi_a * chi_s
        + (-405.0 / 8.0 + 5.0 * eta / 2.0) * chi_s * chi_s;

    let c5 = 38645.0 * PI / 756.0 - 65.0 * PI * eta / 9.0
        + delta * chi_a * (-732985.0 / 2268.0 - 140.0 * eta / 9.0)
        + chi_s * (-732985.0 / 2268.0 + 24260.0 * eta / 81.0 + 340.0 * eta2 / 9.0);
    a[5] = c5;
    b[5] = 3.0 * c5;

    let log6 = -6848.0 / 21.0;
    a[6] = 11583231236531.0 / 4694215680.0 - 6848.0 * EULER_GAMMA / 21.0 - 640.0 * pi2 / 3.0
        + (-15737765635.0 / 3048192.0 + 2255.0 * pi2 / 12.0) * eta
        + 76055.0 * eta2 / 1728.0
        - 127825.0 * eta3 / 1296.0
        + log6 * 4f64.ln()
        + PI * (2270.0 / 3.0 * delta * chi_a + (2270.0 / 3.0 - 520.0 * eta) * chi_s);
    b[6] = log6;

    a[7] = PI * (77096675.0 / 254016.0 + 378515.0 * eta / 1512.0 - 74045.0 * eta2 / 756.0)
        + delta * chi_a * (-25150083775.0 / 3048192.0 + 26804935.0 * eta / 6048.0 - 1985.0 * eta2 / 48.0)
        + chi_s
            * (-25150083775.0 / 3048192.0 + 10566655595.0 * eta / 762048.0 - 1042165.0 * eta2 / 3024.0
                + 5345.0 * eta3 / 36.0);

    (a, b)
}
