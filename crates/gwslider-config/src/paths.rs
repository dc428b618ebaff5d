//! Platform-specific paths for configuration files and event datasets.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/gwslider/` (Linux), `~/Library/Application Support/gwslider/` (macOS), `%APPDATA%\gwslider\` (Windows)
//! - **Datasets**: `~/.local/share/gwslider/events/` (Linux), `~/Library/Application Support/gwslider/events/` (macOS), `%APPDATA%\gwslider\events\` (Windows)
//!
//! # Example
//!
//! ```rust,no_run
//! use gwslider_config::paths;
//!
//! println!("config: {:?}", paths::analysis_config_path());
//! for path in paths::list_datasets(&paths::datasets_dir()) {
//!     println!("dataset at {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "gwslider";

/// Subdirectory holding event datasets.
const EVENTS_SUBDIR: &str = "events";

/// File name of the analysis configuration.
pub const ANALYSIS_FILE: &str = "analysis.toml";

/// File name of the user event table.
pub const EVENTS_FILE: &str = "events.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the directory event datasets are looked up in.
///
/// Returns a fallback path if the data directory cannot be determined.
pub fn datasets_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(EVENTS_SUBDIR)
}

/// Default location of the analysis configuration.
pub fn analysis_config_path() -> PathBuf {
    user_config_dir().join(ANALYSIS_FILE)
}

/// Default location of the user event table.
pub fn event_table_path() -> PathBuf {
    user_config_dir().join(EVENTS_FILE)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    ensure_dir(user_config_dir())
}

/// Ensure the datasets directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_datasets_dir() -> Result<PathBuf, crate::ConfigError> {
    ensure_dir(datasets_dir())
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, crate::ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List dataset files (`*.json`) in a directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_datasets(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    found.sort();
    found
}

/// Event name from a dataset path (the file stem).
pub fn event_name_from_path(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dirs_carry_app_name() {
        assert!(user_config_dir().to_string_lossy().contains("gwslider"));
        assert!(datasets_dir().ends_with("gwslider/events"));
        assert!(analysis_config_path().ends_with("analysis.toml"));
        assert!(event_table_path().ends_with("events.toml"));
    }

    #[test]
    fn list_only_json() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.json"), "").unwrap();
        fs::write(temp.path().join("a.json"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let found = list_datasets(temp.path());
        let names: Vec<_> = found.iter().filter_map(|p| event_name_from_path(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(list_datasets(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
