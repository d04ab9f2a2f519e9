//! Configuration File Loading
//!
//! Finds and loads the configuration file from the usual locations, in
//! TOML or JSON, and validates it before use.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File stem used in every search location
const CONFIG_STEM: &str = "companion-host";

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "COMPANION_HOST_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Base paths (without extension) searched in order
    search_paths: Vec<PathBuf>,
    /// Path of the file that was loaded, if any
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Format implied by a file extension; TOML when unknown
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

const SUPPORTED_FORMATS: [ConfigFormat; 2] = [ConfigFormat::Toml, ConfigFormat::Json];

impl ConfigLoader {
    /// Create a loader over the default search paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
            current_path: None,
        }
    }

    /// Load from the first existing search location, or defaults
    pub fn load(&mut self) -> Result<Config> {
        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            return self.load_from_path(Path::new(&explicit));
        }

        for base in &self.search_paths {
            for format in SUPPORTED_FORMATS {
                let path = base.with_extension(format.extension());
                if !path.exists() {
                    continue;
                }
                // The first file found wins; a broken one is not skipped
                let config = Self::read_file(&path, format).map_err(|e| {
                    error!("Failed to load config from {}: {}", path.display(), e);
                    e
                })?;
                validate_config(&config)?;
                info!("Configuration loaded from {}", path.display());
                self.current_path = Some(path);
                return Ok(config);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Load a specific file; its absence is an error
    pub fn load_from_path(&mut self, path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigLoadFailed {
                path: path.to_path_buf(),
                reason: "file does not exist".to_string(),
            });
        }
        let config = Self::read_file(path, ConfigFormat::from_path(path))?;
        validate_config(&config)?;
        self.current_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save a configuration, choosing the format from the extension
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    fn read_file(path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(CONFIG_STEM).join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{}", CONFIG_STEM)));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(CONFIG_STEM));
        }

        paths
    }

    /// Path of the loaded file, if one was found
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Replace the search paths with a single base path (no extension)
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a configuration for values the host cannot work with
pub fn validate_config(config: &Config) -> Result<()> {
    if config.worker.program.trim().is_empty() {
        return Err(Error::ConfigValidationFailed {
            field: "worker.program".to_string(),
            reason: "Worker program cannot be empty".to_string(),
        });
    }

    if config.overlay.width == 0 || config.overlay.height == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "overlay".to_string(),
            reason: "Overlay footprint must be non-empty".to_string(),
        });
    }

    for display in &config.displays {
        if display.bounds.is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: format!("displays[{}].bounds", display.id),
                reason: "Display bounds must cover a non-empty area".to_string(),
            });
        }
    }

    if config.displays.iter().filter(|d| d.primary).count() > 1 {
        return Err(Error::ConfigValidationFailed {
            field: "displays".to_string(),
            reason: "At most one display can be primary".to_string(),
        });
    }

    Ok(())
}
