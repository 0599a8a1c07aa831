//! Configuration module for yamirror.
//!
//! The daemon is configured entirely through environment variables, with
//! loading split from validation: [`Config::from_env`] fails fast on a
//! missing or unparseable variable, while [`Config::validate`] collects
//! every remaining field error so a misconfigured start reports all
//! problems at once.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the local directory to mirror
pub const ENV_LOCAL_DIR: &str = "YAMIRROR_LOCAL_DIR";
/// Environment variable naming the log file path
pub const ENV_LOG_FILE: &str = "YAMIRROR_LOG_FILE";
/// Environment variable naming the remote folder on the Disk
pub const ENV_REMOTE_DIR: &str = "YAMIRROR_REMOTE_DIR";
/// Environment variable holding the OAuth access token
pub const ENV_TOKEN: &str = "YAMIRROR_TOKEN";
/// Environment variable holding the poll interval in whole seconds
pub const ENV_POLL_INTERVAL: &str = "YAMIRROR_POLL_INTERVAL";

// ============================================================================
// Config
// ============================================================================

/// Runtime configuration for the mirror daemon.
#[derive(Clone)]
pub struct Config {
    /// Local directory whose direct entries are mirrored.
    pub local_dir: PathBuf,
    /// Path of the log file.
    pub log_file: PathBuf,
    /// Remote folder path on the Disk, e.g. `backups` or `app/mirror`.
    pub remote_dir: String,
    /// OAuth access token for the storage API.
    pub token: String,
    /// Seconds between reconciliation passes.
    pub poll_interval: u64,
}

// The token must never end up in logs, so Debug is written by hand.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("local_dir", &self.local_dir)
            .field("log_file", &self.log_file)
            .field("remote_dir", &self.remote_dir)
            .field("token", &"<redacted>")
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing environment variable '{key}'")]
    MissingVar {
        /// Name of the absent variable
        key: String,
    },

    /// The poll interval is not a whole non-negative number of seconds
    #[error("'{ENV_POLL_INTERVAL}' must be a whole number of seconds, got '{value}'")]
    InvalidInterval {
        /// The raw value found in the environment
        value: String,
    },
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Factored out of [`from_env`](Self::from_env) so tests can supply
    /// values without mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| ConfigError::MissingVar {
                key: key.to_string(),
            })
        };

        let local_dir = PathBuf::from(require(ENV_LOCAL_DIR)?);
        let log_file = PathBuf::from(require(ENV_LOG_FILE)?);
        let remote_dir = require(ENV_REMOTE_DIR)?;
        let token = require(ENV_TOKEN)?;

        let raw_interval = require(ENV_POLL_INTERVAL)?;
        let poll_interval =
            raw_interval
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidInterval {
                    value: raw_interval.clone(),
                })?;

        Ok(Self {
            local_dir,
            log_file,
            remote_dir,
            token,
            poll_interval,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The environment variable the offending value came from.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.local_dir.exists() {
            errors.push(ValidationError {
                field: ENV_LOCAL_DIR.into(),
                message: format!("directory does not exist: {}", self.local_dir.display()),
            });
        } else if !self.local_dir.is_dir() {
            errors.push(ValidationError {
                field: ENV_LOCAL_DIR.into(),
                message: format!("not a directory: {}", self.local_dir.display()),
            });
        }

        if self.remote_dir.is_empty() {
            errors.push(ValidationError {
                field: ENV_REMOTE_DIR.into(),
                message: "must not be empty".into(),
            });
        }

        if self.token.is_empty() {
            errors.push(ValidationError {
                field: ENV_TOKEN.into(),
                message: "must not be empty".into(),
            });
        }

        // The poll loop needs a nonzero period.
        if self.poll_interval == 0 {
            errors.push(ValidationError {
                field: ENV_POLL_INTERVAL.into(),
                message: "must be greater than 0".into(),
            });
        }

        errors
    }
}

// ============================================================================
// Unit tests
// ============================================================================
