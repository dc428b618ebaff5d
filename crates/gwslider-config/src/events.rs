//! Reference event table.
//!
//! Each entry names a detection, its GPS time and a reference source in the
//! form catalogs quote it: component masses plus effective and antisymmetric
//! spin. The registry turns entries into slider defaults and bounds.

use gwslider_core::IntrinsicParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, write_with_parents};

/// One reference event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEvent {
    /// Catalog name, e.g. `GW150914`.
    pub name: String,
    /// GPS time of the merger (s).
    pub gps_time: f64,
    /// Primary mass (M☉).
    pub mass1: f64,
    /// Secondary mass (M☉).
    pub mass2: f64,
    /// Effective spin.
    #[serde(default)]
    pub chi_eff: f64,
    /// Antisymmetric spin.
    #[serde(default)]
    pub chi_a: f64,
    /// Dataset file; relative paths resolve against the table's directory,
    /// and a missing entry means `<name>.json` in the datasets directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
}

impl ReferenceEvent {
    /// Entry with zero reference spins.
    pub fn new(name: impl Into<String>, gps_time: f64, mass1: f64, mass2: f64) -> Self {
        Self {
            name: name.into(),
            gps_time,
            mass1,
            mass2,
            chi_eff: 0.0,
            chi_a: 0.0,
            dataset: None,
        }
    }

    /// Set the reference spins.
    pub fn with_spins(mut self, chi_eff: f64, chi_a: f64) -> Self {
        self.chi_eff = chi_eff;
        self.chi_a = chi_a;
        self
    }

    /// Set the dataset path.
    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset = Some(path.into());
        self
    }

    /// Reference source as component masses and spins.
    pub fn reference_params(&self) -> IntrinsicParams {
        IntrinsicParams::from_masses_and_effective_spins(self.mass1, self.mass2, self.chi_eff, self.chi_a)
    }

    /// Where this event's dataset lives.
    ///
    /// `base` is the directory relative paths are resolved against and
    /// `datasets_dir` the fallback location.
    pub fn dataset_path(&self, base: &Path, datasets_dir: &Path) -> PathBuf {
        match &self.dataset {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => datasets_dir.join(format!("{}.json", self.name)),
        }
    }
}

/// Ordered list of reference events.
///
/// # TOML Format
///
/// ```toml
/// [[events]]
/// name = "GW150914"
/// gps_time = 1126259462.4
/// mass1 = 34.6
/// mass2 = 30.0
/// chi_eff = 0.0
/// chi_a = 0.0
/// dataset = "GW150914.json"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTable {
    /// Events in display order.
    #[serde(default)]
    pub events: Vec<ReferenceEvent>,
}

impl EventTable {
    /// Table from a list of events.
    pub fn new(events: Vec<ReferenceEvent>) -> Self {
        Self { events }
    }

    /// Load a table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load and validate.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let table = Self::load(path)?;
        crate::validation::validate_events(&table)?;
        Ok(table)
    }

    /// Parse a table from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_with_parents(path.as_ref(), &self.to_toml()?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Look up an event by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ReferenceEvent> {
        self.events.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Look up an event, failing with [`ConfigError::EventNotFound`].
    pub fn require(&self, name: &str) -> Result<&ReferenceEvent, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::EventNotFound(name.to_string()))
    }

    /// Event names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over events.
    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventTable {
    type Item = &'a ReferenceEvent;
    type IntoIter = std::slice::Iter<'a, ReferenceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
