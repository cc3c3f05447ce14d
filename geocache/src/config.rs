//! Cache configuration.
//!
//! Settings can be built in code or loaded from an INI file:
//!
//! ```ini
//! [cache]
//! data_capacity = 100
//! summary_capacity = 10
//! max_age_secs = 300
//! cleanup_interval_secs = 300
//! ```
//!
//! Missing keys keep their defaults. The default file location is
//! `~/.geocache/config.ini`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

/// Default capacity of the viewport data cache.
pub const DEFAULT_DATA_CAPACITY: usize = 100;

/// Default capacity of the summary cache.
pub const DEFAULT_SUMMARY_CAPACITY: usize = 10;

/// Default time between expiry sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

const SECTION: &str = "cache";
const DATA_CAPACITY_KEY: &str = "data_capacity";
const SUMMARY_CAPACITY_KEY: &str = "summary_capacity";
const MAX_AGE_KEY: &str = "max_age_secs";
const CLEANUP_INTERVAL_KEY: &str = "cleanup_interval_secs";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] ini::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("Invalid value '{value}' for '{key}': expected a whole number")]
    InvalidValue { key: String, value: String },

    #[error("'{key}' must be greater than zero")]
    Zero { key: String },
}

/// Settings for the data and summary caches and their expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum entries in the viewport data cache.
    pub data_capacity: usize,
    /// Maximum entries in the summary cache.
    pub summary_capacity: usize,
    /// Entries untouched for longer than this are swept.
    pub max_age: Duration,
    /// Time between sweeps.
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_capacity: DEFAULT_DATA_CAPACITY,
            summary_capacity: DEFAULT_SUMMARY_CAPACITY,
            max_age: crate::cache::DEFAULT_MAX_AGE,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl CacheConfig {
    pub fn with_data_capacity(mut self, capacity: usize) -> Self {
        self.data_capacity = capacity;
        self
    }

    pub fn with_summary_capacity(mut self, capacity: usize) -> Self {
        self.summary_capacity = capacity;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Check that capacities and the sweep interval are non-zero.
    ///
    /// A zero `max_age` is allowed and expires everything on each sweep.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (DATA_CAPACITY_KEY, self.data_capacity == 0),
            (SUMMARY_CAPACITY_KEY, self.summary_capacity == 0),
            (CLEANUP_INTERVAL_KEY, self.cleanup_interval.is_zero()),
        ];
        for (key, is_zero) in checks {
            if is_zero {
                return Err(ConfigError::Zero {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Load configuration from an INI file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a value is
    /// not a whole number or fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Load from `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some(SECTION)) {
            if let Some(v) = section.get(DATA_CAPACITY_KEY) {
                config.data_capacity = parse_number(DATA_CAPACITY_KEY, v)? as usize;
            }
            if let Some(v) = section.get(SUMMARY_CAPACITY_KEY) {
                config.summary_capacity = parse_number(SUMMARY_CAPACITY_KEY, v)? as usize;
            }
            if let Some(v) = section.get(MAX_AGE_KEY) {
                config.max_age = Duration::from_secs(parse_number(MAX_AGE_KEY, v)?);
            }
            if let Some(v) = section.get(CLEANUP_INTERVAL_KEY) {
                config.cleanup_interval =
                    Duration::from_secs(parse_number(CLEANUP_INTERVAL_KEY, v)?);
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Default configuration file location, `~/.geocache/config.ini`.
///
/// Falls back to the current directory when no home directory is known.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".geocache")
        .join("config.ini")
}
