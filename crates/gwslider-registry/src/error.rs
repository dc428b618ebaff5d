//! Error types for dataset loading and event lookup.

use std::path::PathBuf;
use thiserror::Error;

use crate::detector::Detector;

/// Errors raised while loading datasets or querying the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON
    #[error("failed to parse dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No event with this name is registered
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// Event is registered but its dataset could not be loaded
    #[error("event '{0}' has no usable dataset")]
    Unavailable(String),

    /// Detector name not recognized
    #[error("unknown detector: {0}")]
    UnknownDetector(String),

    /// A required detector is absent from the dataset
    #[error("dataset has no {section} entry for detector {detector}")]
    MissingDetector {
        /// Section of the document (`detectors` or `psds`).
        section: &'static str,
        /// The absent detector.
        detector: Detector,
    },

    /// A series does not match the time axis
    #[error("{detector} {series} has {found} samples, time axis has {expected}")]
    LengthMismatch {
        /// Detector the series belongs to.
        detector: Detector,
        /// Series name.
        series: &'static str,
        /// Length of the time axis.
        expected: usize,
        /// Length of the series.
        found: usize,
    },

    /// Inconsistent timing or other structural problem
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// PSD table rejected
    #[error("invalid {detector} PSD: {source}")]
    Psd {
        /// Detector the PSD belongs to.
        detector: Detector,
        /// Underlying numeric error.
        #[source]
        source: gwslider_core::Error,
    },

    /// Numeric error
    #[error(transparent)]
    Core(#[from] gwslider_core::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] gwslider_config::ConfigError),
}

impl RegistryError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::WriteFile {
            path: path.into(),
            source,
        }
    }
}
