//! Configuration for gwslider analyses.
//!
//! # Features
//!
//! - **Analysis config**: synthesis grid, template rendering, filter and
//!   simulation settings in one TOML file ([`AnalysisConfig`])
//! - **Event tables**: reference events with catalog parameters ([`EventTable`])
//! - **Validation**: every problem in a file reported together
//! - **Paths**: platform-specific config and dataset directories
//! - **Factory events**: built-in table of eight detections
//!
//! # Example
//!
//! ```rust,no_run
//! use gwslider_config::{AnalysisConfig, factory_events, paths};
//!
//! let config = AnalysisConfig::load_validated(paths::analysis_config_path())
//!     .unwrap_or_default();
//! let events = factory_events();
//! for event in &events {
//!     println!("{} at GPS {}", event.name, event.gps_time);
//! }
//! # let _ = config;
//! ```

mod analysis;
mod error;
mod events;

/// Platform-specific config and dataset paths.
pub mod paths;

/// Configuration and event-table validation.
pub mod validation;

/// Reference events bundled with the library.
pub mod factory_events;

pub use analysis::{AnalysisConfig, FilterConfig, SimulationConfig};
pub use error::ConfigError;
pub use events::{EventTable, ReferenceEvent};
pub use factory_events::{FACTORY_EVENT_NAMES, factory_events, is_factory_event};
pub use paths::{
    analysis_config_path, datasets_dir, ensure_datasets_dir, ensure_user_config_dir,
    event_name_from_path, event_table_path, list_datasets, user_config_dir,
};
pub use validation::{ValidationError, ValidationResult, validate_analysis, validate_events};
