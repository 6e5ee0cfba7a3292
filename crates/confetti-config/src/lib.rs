//! Persistent configuration for the confetti terminal app.
//!
//! Settings live in `config.toml` inside the platform config directory. A
//! missing file is not an error: defaults are used until [`Config::save`]
//! writes one.

use std::fs;
use std::path::{Path, PathBuf};

use confetti_core::ConfettiOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading or saving the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No home directory to derive the config location from.
    #[error("config directory not found")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Terminal display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Redraws per second.
    pub frame_rate: u32,
    /// Show the key help line.
    pub show_help: bool,
    /// Show the state and progress line.
    pub show_status: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            show_help: true,
            show_status: true,
        }
    }
}

/// Everything stored in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub confetti: ConfettiOptions,
    pub display: DisplayConfig,
}

impl Config {
    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "confetti")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use confetti_core::{Easing, Point, Rgb};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r##"
[confetti]
count = 50
fade_out_on_end = true
colors = ["#fff", "#FF0000"]
cannons_positions = [{ x = -20.0, y = 600.0 }]
easing = "linear"

[display]
show_help = false
"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.confetti.count, 50);
        assert!(config.confetti.fade_out_on_end);
        assert_eq!(
            config.confetti.colors,
            vec![Rgb::new(255, 255, 255), Rgb::new(255, 0, 0)]
        );
        assert_eq!(config.confetti.cannons_positions, vec![Point::new(-20.0, 600.0)]);
        assert_eq!(config.confetti.easing, Easing::Linear);
        assert_eq!(config.confetti.fall_duration, 8000);
        assert!(!config.display.show_help);
        assert_eq!(config.display.frame_rate, 60);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.confetti.count = 75;
        config.confetti.is_infinite = Some(false);
        config.display.frame_rate = 30;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[confetti]\ncolors = [\"red\"]\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
