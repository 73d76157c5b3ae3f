//! Configuration management for the ballot engine
//!
//! Loads limits and logging settings from environment variables with validation.

use crate::{Result, config_error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Limits and background-task settings of a [`crate::ballot::BallotStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest number of alternatives a ballot may declare
    pub max_alternatives: usize,

    /// Largest eligible voter list a ballot may declare
    pub max_voters: usize,

    /// How often the deadline sweeper closes expired ballots
    pub sweep_interval_seconds: u64,
}

impl EngineConfig {
    /// Load engine configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            max_alternatives: env_or("SCRUTIN_MAX_ALTERNATIVES", 64)?,
            max_voters: env_or("SCRUTIN_MAX_VOTERS", 100_000)?,
            sweep_interval_seconds: env_or("SCRUTIN_SWEEP_INTERVAL_SECONDS", 30)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        Self {
            max_alternatives: 16,
            max_voters: 1_000,
            sweep_interval_seconds: 1,
        }
    }

    /// Reject limits no ballot could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.max_alternatives < 2 {
            return Err(config_error!(
                "SCRUTIN_MAX_ALTERNATIVES must be at least 2, got {}",
                self.max_alternatives
            ));
        }
        if self.max_voters == 0 {
            return Err(config_error!("SCRUTIN_MAX_VOTERS must be positive"));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(config_error!("SCRUTIN_SWEEP_INTERVAL_SECONDS must be positive"));
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_alternatives: 64,
            max_voters: 100_000,
            sweep_interval_seconds: 30,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// `full`, `compact` or `pretty`
    pub format: String,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        let engine = EngineConfig::from_env()?;

        let logging = LoggingConfig {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "full".to_string()),
        };

        Ok(Self { engine, logging })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Self {
        let engine = EngineConfig::for_testing();

        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };

        Self { engine, logging }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| config_error!("Invalid {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
