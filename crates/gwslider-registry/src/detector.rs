//! Interferometer identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// A LIGO interferometer.
///
/// Ordering is the canonical processing order: Hanford, then Livingston.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Detector {
    /// LIGO Hanford.
    H1,
    /// LIGO Livingston.
    L1,
}

impl Detector {
    /// Both detectors in processing order.
    pub const ALL: [Detector; 2] = [Detector::H1, Detector::L1];

    /// Short identifier, e.g. `"H1"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Detector::H1 => "H1",
            Detector::L1 => "L1",
        }
    }

    /// Site name.
    pub const fn site(&self) -> &'static str {
        match self {
            Detector::H1 => "Hanford",
            Detector::L1 => "Livingston",
        }
    }

    /// Position in [`Detector::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Detector::H1 => 0,
            Detector::L1 => 1,
        }
    }

    /// The other detector.
    pub const fn other(&self) -> Detector {
        match self {
            Detector::H1 => Detector::L1,
            Detector::L1 => Detector::H1,
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Detector {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H1" | "H" | "HANFORD" => Ok(Detector::H1),
            "L1" | "L" | "LIVINGSTON" => Ok(Detector::L1),
            _ => Err(RegistryError::UnknownDetector(s.to_string())),
        }
    }
}
