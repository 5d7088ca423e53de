//! Configuration module for the Sagemcom exporter
//!
//! Loads configuration from environment variables. Missing required settings
//! are fatal: the process exits with a diagnostic instead of starting a
//! half-configured exporter.

use crate::error::{AppError, Result};


/// Default configuration values
pub mod defaults {
    pub const ROUTER_USERNAME: &str = "admin";
    pub const COLLECTION_INTERVAL_SECS: u64 = 300;
    pub const SERVER_PORT: u16 = 8000;
    pub const SPEEDTEST_INTERVAL_SECS: u64 = 3600;
    pub const PING_TARGET: &str = "google.com";
}

/// Environment variable names used by the application
pub mod env_vars {
    pub const ROUTER_HOST: &str = "ROUTER_HOST";
    pub const ROUTER_USERNAME: &str = "ROUTER_USERNAME";
    pub const ROUTER_PASSWORD: &str = "ROUTER_PASSWORD";
    pub const COLLECTION_INTERVAL: &str = "COLLECTION_INTERVAL";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const SPEEDTEST_INTERVAL: &str = "SPEEDTEST_INTERVAL";
    pub const PING_TARGET: &str = "PING_TARGET";
}

/// Application-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub router_host: String,
    pub router_username: String,
    pub router_password: String,
    pub collection_interval_secs: u64,
    pub server_port: u16,
    pub speedtest_interval_secs: u64,
    pub ping_target: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when a required variable is missing or a
    /// numeric variable does not parse or is out of range.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from a variable lookup function
    ///
    /// Split out from [`Config::from_env`] so tests can inject variables
    /// without mutating process-wide environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let router_host = lookup(env_vars::ROUTER_HOST)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config(format!("{} is not set", env_vars::ROUTER_HOST)))?;

        let router_username = lookup(env_vars::ROUTER_USERNAME)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::ROUTER_USERNAME.to_string());

        let router_password = lookup(env_vars::ROUTER_PASSWORD)
            .ok_or_else(|| AppError::Config(format!("{} is not set", env_vars::ROUTER_PASSWORD)))?;

        let collection_interval_secs = parse_or_default(
            &lookup,
            env_vars::COLLECTION_INTERVAL,
            defaults::COLLECTION_INTERVAL_SECS,
        )?;
        if collection_interval_secs == 0 {
            return Err(AppError::Config(format!(
                "{} must be greater than zero",
                env_vars::COLLECTION_INTERVAL
            )));
        }

        let server_port = parse_or_default(&lookup, env_vars::SERVER_PORT, defaults::SERVER_PORT)?;

        let speedtest_interval_secs = parse_or_default(
            &lookup,
            env_vars::SPEEDTEST_INTERVAL,
            defaults::SPEEDTEST_INTERVAL_SECS,
        )?;

        let ping_target = lookup(env_vars::PING_TARGET)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| defaults::PING_TARGET.to_string());

        Ok(Config {
            router_host,
            router_username,
            router_password,
            collection_interval_secs,
            server_port,
            speedtest_interval_secs,
            ping_target,
        })
    }

    /// Bind address for the export server
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("0.0.0.0:{}", self.server_port)
    }
}

fn parse_or_default<T: std::str::FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{name} is not a valid number: '{raw}'"))),
        None => Ok(default),
    }
}
