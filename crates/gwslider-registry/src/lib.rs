//! Event datasets and the reference-event registry.
//!
//! - [`Detector`] - the two LIGO interferometers, in processing order
//! - [`EventDataset`] - validated strain, whitened strain and PSDs for one
//!   event, loaded atomically from JSON
//! - [`EventRegistry`] - reference parameters, slider bounds and datasets for
//!   every event in a session
//!
//! # Example
//!
//! ```rust,no_run
//! use gwslider_config::{factory_events, paths};
//! use gwslider_registry::{Detector, EventRegistry};
//!
//! let dir = paths::datasets_dir();
//! let registry = EventRegistry::from_table(&factory_events(), &dir, &dir);
//! for event in registry.usable() {
//!     let data = event.dataset().unwrap();
//!     println!("{}: {} samples, H1 PSD from {:?} Hz", event.name(), data.len(),
//!              data.psd(Detector::H1).frequencies().first());
//! }
//! ```

pub mod bounds;
pub mod dataset;
pub mod detector;
mod error;
pub mod registry;

pub use bounds::{Range, SliderBounds};
pub use dataset::{DatasetFile, DetectorStrain, EventDataset};
pub use detector::Detector;
pub use error::RegistryError;
pub use registry::{EventRegistry, RegisteredEvent};
