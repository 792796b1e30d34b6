//! Configuration loading for ClubHub.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default cap on the number of clubs a registry may hold.
pub const DEFAULT_MAX_CLUBS: usize = 10;

/// Get the ClubHub home directory (~/.clubhub).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".clubhub"))
}

/// Get the settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from ~/.clubhub/settings.json, falling back to defaults
/// when the file does not exist.
pub fn load_settings() -> Result<Settings> {
    let path = get_settings_path()?;

    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    load_settings_from(&path)
}

/// Load settings from an explicit path. The file must exist.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let settings = parse_settings(&content)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Parse and validate a settings document.
pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = serde_json::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.max_clubs == 0 {
        return Err(Error::Config("max_clubs must be at least 1".to_string()));
    }
    Ok(())
}

/// Load settings or return default if not found.
pub fn load_settings_or_default() -> Settings {
    load_settings().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings: {}, using defaults", e);
        Settings::default()
    })
}

/// Resolve settings for a CLI invocation: an explicit path must load,
/// the implicit one degrades to defaults.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) => load_settings_from(path),
        None => Ok(load_settings_or_default()),
    }
}

/// What to do with membership lines that reference a student or club the
/// file never declared.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Fail the load with a malformed-file error.
    Reject,
    /// Drop the reference and log a warning.
    Skip,
}

impl Default for OrphanPolicy {
    fn default() -> Self {
        OrphanPolicy::Reject
    }
}

impl std::fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrphanPolicy::Reject => write!(f, "reject"),
            OrphanPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Load configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LoadSettings {
    #[serde(default)]
    pub orphans: OrphanPolicy,
}

/// ClubHub settings.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Settings {
    #[serde(default = "default_max_clubs")]
    pub max_clubs: usize,

    /// Used by save/load when no filename is given.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub load: LoadSettings,
}

fn default_max_clubs() -> usize {
    DEFAULT_MAX_CLUBS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_clubs: default_max_clubs(),
            data_file: None,
            load: LoadSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = parse_settings("{}").unwrap();
        assert_eq!(settings.max_clubs, DEFAULT_MAX_CLUBS);
        assert!(settings.data_file.is_none());
        assert_eq!(settings.load.orphans, OrphanPolicy::Reject);
    }

    #[test]
    fn test_full_document() {
        let settings = parse_settings(
            r#"{"max_clubs": 3, "data_file": "/tmp/clubs.txt", "load": {"orphans": "skip"}}"#,
        )
        .unwrap();
        assert_eq!(settings.max_clubs, 3);
        assert_eq!(settings.data_file, Some(PathBuf::from("/tmp/clubs.txt")));
        assert_eq!(settings.load.orphans, OrphanPolicy::Skip);
    }

    #[test]
    fn test_zero_max_clubs_rejected() {
        let err = parse_settings(r#"{"max_clubs": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = parse_settings(r#"{"load": {"orphans": "ignore"}}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        assert!(matches!(
            load_settings_from(&missing),
            Err(Error::Config(_))
        ));

        let present = temp_dir.path().join("settings.json");
        std::fs::write(&present, r#"{"max_clubs": 4}"#).unwrap();
        assert_eq!(resolve_settings(Some(&present)).unwrap().max_clubs, 4);
    }
}
