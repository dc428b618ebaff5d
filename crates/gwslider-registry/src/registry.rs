//! Registry of reference events and their datasets.
//!
//! Events are registered from an [`EventTable`]; each one's dataset is loaded
//! once, upfront. An event whose dataset fails to load stays listed but is
//! marked unusable, with the reason kept for display.

use gwslider_config::{EventTable, ReferenceEvent};
use gwslider_core::{DerivedParams, IntrinsicParams};
use std::path::Path;

use crate::bounds::SliderBounds;
use crate::dataset::EventDataset;
use crate::error::RegistryError;

/// One event: reference parameters, slider bounds and (when usable) data.
#[derive(Debug, Clone)]
pub struct RegisteredEvent {
    name: String,
    gps_time: f64,
    reference: IntrinsicParams,
    bounds: SliderBounds,
    simulated: bool,
    dataset: Result<EventDataset, String>,
}

impl RegisteredEvent {
    /// Event backed by a loaded dataset.
    pub fn new(name: impl Into<String>, gps_time: f64, reference: IntrinsicParams, dataset: EventDataset) -> Self {
        Self::with_dataset(name, gps_time, reference, Ok(dataset))
    }

    /// Event whose dataset could not be loaded.
    pub fn unavailable(
        name: impl Into<String>,
        gps_time: f64,
        reference: IntrinsicParams,
        reason: impl Into<String>,
    ) -> Self {
        Self::with_dataset(name, gps_time, reference, Err(reason.into()))
    }

    fn with_dataset(
        name: impl Into<String>,
        gps_time: f64,
        reference: IntrinsicParams,
        dataset: Result<EventDataset, String>,
    ) -> Self {
        Self {
            name: name.into(),
            gps_time,
            bounds: SliderBounds::around(&reference),
            reference,
            simulated: false,
            dataset,
        }
    }

    /// Mark as a simulated injection.
    pub fn simulated(mut self) -> Self {
        self.simulated = true;
        self
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// GPS time of the merger.
    pub fn gps_time(&self) -> f64 {
        self.gps_time
    }

    /// Reference source parameters.
    pub fn reference(&self) -> &IntrinsicParams {
        &self.reference
    }

    /// Reference parameters in the derived parametrization.
    pub fn reference_derived(&self) -> DerivedParams {
        self.reference.to_derived()
    }

    /// Slider ranges.
    pub fn bounds(&self) -> &SliderBounds {
        &self.bounds
    }

    /// Whether this is a simulated injection.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Whether the dataset loaded.
    pub fn is_usable(&self) -> bool {
        self.dataset.is_ok()
    }

    /// Why the dataset is missing, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.dataset.as_ref().err().map(String::as_str)
    }

    /// The dataset, or [`RegistryError::Unavailable`].
    pub fn dataset(&self) -> Result<&EventDataset, RegistryError> {
        self.dataset
            .as_ref()
            .map_err(|_| RegistryError::Unavailable(self.name.clone()))
    }
}

/// All events of a session, in display order.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: Vec<RegisteredEvent>,
}

impl EventRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every event in `table`, loading datasets from disk.
    ///
    /// Relative dataset paths resolve against `base`; events without a path
    /// look for `<name>.json` in `datasets_dir`.
    pub fn from_table(table: &EventTable, base: &Path, datasets_dir: &Path) -> Self {
        let mut registry = Self::new();
        for event in table {
            let path = event.dataset_path(base, datasets_dir);
            let entry = match EventDataset::load(&path) {
                Ok(dataset) => {
                    tracing::info!(
                        event = %event.name,
                        path = %path.display(),
                        samples = dataset.len(),
                        fs = dataset.sample_rate(),
                        "loaded dataset"
                    );
                    Self::entry(event, Ok(dataset))
                }
                Err(e) => {
                    tracing::warn!(event = %event.name, path = %path.display(), error = %e, "event unusable");
                    Self::entry(event, Err(e.to_string()))
                }
            };
            registry.insert(entry);
        }
        registry
    }

    fn entry(event: &ReferenceEvent, dataset: Result<EventDataset, String>) -> RegisteredEvent {
        RegisteredEvent::with_dataset(&event.name, event.gps_time, event.reference_params(), dataset)
    }

    /// Add an event, replacing any event with the same name.
    pub fn insert(&mut self, event: RegisteredEvent) {
        match self.position(&event.name) {
            Some(i) => self.events[i] = event,
            None => self.events.push(event),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Look up an event by name (case-insensitive).
    pub fn get(&self, name: &str) -> Result<&RegisteredEvent, RegistryError> {
        self.position(name)
            .map(|i| &self.events[i])
            .ok_or_else(|| RegistryError::UnknownEvent(name.to_string()))
    }

    /// Event at `index` in display order.
    pub fn by_index(&self, index: usize) -> Option<&RegisteredEvent> {
        self.events.get(index)
    }

    /// Index of an event in display order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.position(name)
    }

    /// Event names in display order.
    pub fn names(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }

    /// Events whose datasets loaded.
    pub fn usable(&self) -> impl Iterator<Item = &RegisteredEvent> {
        self.events.iter().filter(|e| e.is_usable())
    }

    /// All events.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredEvent> {
        self.events.iter()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventRegistry {
    type Item = &'a RegisteredEvent;
    type IntoIter = std::slice::Iter<'a, RegisteredEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_file;
    use tempfile::TempDir;

    fn dataset() -> EventDataset {
        EventDataset::try_from(sample_file(64, 16.0)).unwrap()
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut reg = EventRegistry::new();
        let p = IntrinsicParams::new(34.6, 30.0, 0.0, 0.0);
        reg.insert(RegisteredEvent::new("GW150914", 1.0, p, dataset()));
        reg.insert(RegisteredEvent::unavailable("gw150914", 1.0, p, "gone"));
        assert_eq!(reg.len(), 1);
        assert!(!reg.get("GW150914").unwrap().is_usable());
    }

    #[test]
    fn unknown_and_unavailable_events() {
        let mut reg = EventRegistry::new();
        let p = IntrinsicParams::new(34.6, 30.0, 0.0, 0.0);
        reg.insert(RegisteredEvent::unavailable("GW150914", 1.0, p, "missing file"));
        assert!(matches!(reg.get("GW170817"), Err(RegistryError::UnknownEvent(_))));
        let event = reg.get("GW150914").unwrap();
        assert_eq!(event.unavailable_reason(), Some("missing file"));
        assert!(matches!(event.dataset(), Err(RegistryError::Unavailable(_))));
        assert_eq!(reg.usable().count(), 0);
    }

    #[test]
    fn from_table_loads_what_it_can() {
        let temp = TempDir::new().unwrap();
        dataset().save(temp.path().join("GW150914.json")).unwrap();
        std::fs::write(temp.path().join("GW200224.json"), "{ not json").unwrap();

        let table = gwslider_config::factory_events();
        let reg = EventRegistry::from_table(&table, temp.path(), temp.path());
        assert_eq!(reg.len(), 8);
        assert_eq!(reg.names(), table.names());
        let usable: Vec<_> = reg.usable().map(|e| e.name()).collect();
        assert_eq!(usable, vec!["GW150914"]);
        assert!(reg.get("GW200224").unwrap().unavailable_reason().unwrap().contains("JSON"));
    }

    #[test]
    fn reference_and_bounds() {
        let p = IntrinsicParams::from_masses_and_effective_spins(50.0, 30.0, 0.0375, -0.3375);
        let event = RegisteredEvent::new("SIM", 0.0, p, dataset()).simulated();
        assert!(event.is_simulated());
        let d = event.reference_derived();
        assert!((d.mass_ratio - 0.6).abs() < 1e-12);
        assert_eq!(event.bounds().mass1.max, 55.0);
    }
}
