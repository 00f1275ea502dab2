//! Configuration management for Lookout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Browser-like user agent sent with every probe.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main application configuration.
///
/// This is loaded from `~/.config/lookout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Username sweep settings
    pub scanning: ScanningConfig,
    /// Email and breach lookup settings
    pub intel: IntelConfig,
    /// Case storage settings
    pub cases: CaseConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    /// - A value fails validation
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LOOKOUT_MAX_CONCURRENCY`: Override the fan-out width
    /// - `LOOKOUT_PROBE_TIMEOUT_SECS`: Override the per-probe timeout
    /// - `LOOKOUT_PLATFORMS_FILE`: Override the probe definition file
    /// - `LOOKOUT_CASES_DIR`: Override the case storage directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("LOOKOUT_MAX_CONCURRENCY") {
            if let Ok(max) = val.parse() {
                self.scanning.max_concurrency = max;
                tracing::debug!("Override scanning.max_concurrency from env: {}", max);
            }
        }

        if let Some(val) = lookup("LOOKOUT_PROBE_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.scanning.probe_timeout_secs = secs;
                tracing::debug!("Override scanning.probe_timeout_secs from env: {}", secs);
            }
        }

        if let Some(val) = lookup("LOOKOUT_PLATFORMS_FILE") {
            tracing::debug!("Override scanning.platforms_file from env: {}", val);
            self.scanning.platforms_file = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup("LOOKOUT_CASES_DIR") {
            tracing::debug!("Override cases.cases_dir from env: {}", val);
            self.cases.cases_dir = Some(PathBuf::from(val));
        }
    }

    /// Check that values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.max_concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let timeouts = [
            ("scanning.probe_timeout_secs", self.scanning.probe_timeout_secs),
            (
                "scanning.connections_timeout_secs",
                self.scanning.connections_timeout_secs,
            ),
            ("scanning.archive_timeout_secs", self.scanning.archive_timeout_secs),
            ("scanning.gravatar_timeout_secs", self.scanning.gravatar_timeout_secs),
            ("intel.lookup_timeout_secs", self.intel.lookup_timeout_secs),
            ("intel.breach_timeout_secs", self.intel.breach_timeout_secs),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "timeout must be non-zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/lookout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "lookout", "lookout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/lookout`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "lookout", "lookout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Directory holding case folders: the configured one, or `<data_dir>/cases`.
    pub fn cases_dir(&self) -> ConfigResult<PathBuf> {
        match &self.cases.cases_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("cases")),
        }
    }
}

/// Username sweep settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Maximum number of in-flight platform probes
    pub max_concurrency: usize,
    /// Timeout for the primary platform fetch
    pub probe_timeout_secs: u64,
    /// Timeout for the deep-scan connections fetch
    pub connections_timeout_secs: u64,
    /// Timeout for the archive snapshot lookup
    pub archive_timeout_secs: u64,
    /// Timeout for each Gravatar guess
    pub gravatar_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Found-count below which alternate usernames are suggested
    pub low_yield_threshold: usize,
    /// Probe definition file (TOML or JSON); defaults to the bundled set
    pub platforms_file: Option<PathBuf>,
}

impl ScanningConfig {
    /// Primary probe timeout.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Deep-scan connections timeout.
    #[must_use]
    pub fn connections_timeout(&self) -> Duration {
        Duration::from_secs(self.connections_timeout_secs)
    }

    /// Archive lookup timeout.
    #[must_use]
    pub fn archive_timeout(&self) -> Duration {
        Duration::from_secs(self.archive_timeout_secs)
    }

    /// Gravatar guess timeout.
    #[must_use]
    pub fn gravatar_timeout(&self) -> Duration {
        Duration::from_secs(self.gravatar_timeout_secs)
    }
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 20,
            probe_timeout_secs: 6,
            connections_timeout_secs: 5,
            archive_timeout_secs: 3,
            gravatar_timeout_secs: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            low_yield_threshold: 2,
            platforms_file: None,
        }
    }
}

/// Email and breach lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    /// Timeout for email-side lookups (Gravatar, commit history)
    pub lookup_timeout_secs: u64,
    /// Timeout for the breach intelligence query
    pub breach_timeout_secs: u64,
}

impl IntelConfig {
    /// Email lookup timeout.
    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Breach query timeout.
    #[must_use]
    pub fn breach_timeout(&self) -> Duration {
        Duration::from_secs(self.breach_timeout_secs)
    }
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_secs: 5,
            breach_timeout_secs: 10,
        }
    }
}

/// Case storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    /// Directory holding `case_<id>` folders
    pub cases_dir: Option<PathBuf>,
}
