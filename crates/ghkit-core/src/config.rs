//! Configuration management for ghkit.
//!
//! Handles loading and saving configuration from TOML files.
//! Config files are stored in platform-specific locations:
//!
//! - **macOS/Linux**: `~/.config/ghkit/config.toml`
//! - **Windows**: `%APPDATA%\ghkit\config.toml`
//!
//! The access token is deliberately not part of the file.
//!
//! # Example
//!
//! ```ignore
//! use ghkit_core::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("github.organization", "meteora-pro")?;
//! config.set("github.all_pages", "true")?;
//! config.save()?;
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config directory name.
const CONFIG_DIR_NAME: &str = "ghkit";

// =============================================================================
// Configuration structures
// =============================================================================

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// GitHub configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GitHubConfig>,
}

/// GitHub client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Organization (or user) owning the repositories
    #[serde(default)]
    pub organization: String,
    /// Follow `next` links until the last page on list calls
    #[serde(default)]
    pub all_pages: bool,
    /// GitHub API base URL (for GitHub Enterprise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Page sizes per list endpoint
    #[serde(default, rename = "per_page")]
    pub page_sizes: PageSizes,
}

/// `per_page` values sent by each list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSizes {
    pub repositories: u32,
    pub branches: u32,
    pub tags: u32,
    /// Used when walking tags looking for one by name
    pub tag_search: u32,
    pub users: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            repositories: 100,
            branches: 4,
            tags: 12,
            tag_search: 100,
            users: 100,
        }
    }
}

impl PageSizes {
    /// GitHub rejects anything above this.
    pub const MAX: u32 = 100;

    fn field_mut(&mut self, name: &str) -> Option<&mut u32> {
        match name {
            "repositories" | "repos" => Some(&mut self.repositories),
            "branches" => Some(&mut self.branches),
            "tags" => Some(&mut self.tags),
            "tag_search" => Some(&mut self.tag_search),
            "users" => Some(&mut self.users),
            _ => None,
        }
    }

    fn field(&self, name: &str) -> Option<u32> {
        let mut copy = *self;
        copy.field_mut(name).map(|v| *v)
    }
}

// =============================================================================
// Config implementation
// =============================================================================

impl Config {
    /// Get the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Returns a default (empty) config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        debug!(path = ?path, "Loading config");

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        info!(path = ?path, "Config loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        debug!(path = ?path, "Saving config");

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        info!(path = ?path, "Config saved successfully");
        Ok(())
    }

    /// Set a configuration value by key path.
    ///
    /// Key format: `github.field` or `github.per_page.endpoint`
    /// (e.g. `github.organization`, `github.per_page.branches`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.first() {
            Some(&"github") => {}
            Some(provider) if parts.len() >= 2 => {
                return Err(Error::Config(format!("Unknown provider: {}", provider)));
            }
            _ => return Err(invalid_key(key)),
        }

        // a rejected key or value leaves self untouched
        let mut config = self.github.clone().unwrap_or_default();

        match parts[1..] {
            ["organization" | "org"] => config.organization = value.to_string(),
            ["all_pages"] => config.all_pages = parse_bool(value)?,
            ["base_url" | "url"] => config.base_url = Some(value.to_string()),
            ["per_page", endpoint] => {
                let size = parse_page_size(value)?;
                let slot = config.page_sizes.field_mut(endpoint).ok_or_else(|| {
                    Error::Config(format!("Unknown per_page endpoint: {}", endpoint))
                })?;
                *slot = size;
            }
            [field] => {
                return Err(Error::Config(format!(
                    "Unknown GitHub config field: {}",
                    field
                )))
            }
            _ => return Err(invalid_key(key)),
        }

        self.github = Some(config);
        Ok(())
    }

    /// Get a configuration value by key path.
    ///
    /// Returns `Ok(None)` when the GitHub section is absent.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.first() {
            Some(&"github") => {}
            Some(provider) if parts.len() >= 2 => {
                return Err(Error::Config(format!("Unknown provider: {}", provider)));
            }
            _ => return Err(invalid_key(key)),
        }

        let Some(config) = &self.github else {
            return Ok(None);
        };

        match parts[1..] {
            ["organization" | "org"] => Ok(Some(config.organization.clone())),
            ["all_pages"] => Ok(Some(config.all_pages.to_string())),
            ["base_url" | "url"] => Ok(config.base_url.clone()),
            ["per_page", endpoint] => config
                .page_sizes
                .field(endpoint)
                .map(|v| Some(v.to_string()))
                .ok_or_else(|| Error::Config(format!("Unknown per_page endpoint: {}", endpoint))),
            [field] => Err(Error::Config(format!(
                "Unknown GitHub config field: {}",
                field
            ))),
            _ => Err(invalid_key(key)),
        }
    }
}

fn invalid_key(key: &str) -> Error {
    Error::Config(format!(
        "Invalid config key '{}'. Expected format: github.field",
        key
    ))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(Error::Config(format!("Expected a boolean, got '{}'", value))),
    }
}

fn parse_page_size(value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(size) if (1..=PageSizes::MAX).contains(&size) => Ok(size),
        _ => Err(Error::Config(format!(
            "per_page must be between 1 and {}, got '{}'",
            PageSizes::MAX,
            value
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================
