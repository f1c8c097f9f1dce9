//! Loading `config.ini` from disk.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or parsed.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// A key holds a value that cannot be used.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Loads the configuration from the platform config directory.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        match config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

/// `<config dir>/staticmaps`, if the platform has a config directory.
pub fn config_directory() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("staticmaps"))
}

/// `<config dir>/staticmaps/config.ini`
pub fn config_file_path() -> Option<PathBuf> {
    config_directory().map(|d| d.join("config.ini"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp_dir.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_config_file_name() {
        if let Some(path) = config_file_path() {
            assert!(path.ends_with("staticmaps/config.ini"));
        }
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.ini");
        std::fs::write(&path, "[render\nwidth = 3\n").unwrap();
        assert!(matches!(
            ConfigFile::load_from(&path),
            Err(ConfigFileError::ReadError(_))
        ));
    }
}
