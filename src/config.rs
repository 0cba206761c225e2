use std::path::PathBuf;

use thiserror::Error;

/// Shared secret used when `PANTRY_PASSWORD` is not set.
pub const DEFAULT_PASSWORD: &str = "castellllo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    fn parse(raw: &str) -> Self {
        if raw == "production" { Mode::Production } else { Mode::Development }
    }

    pub fn is_production(self) -> bool { self == Mode::Production }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub port: u16,
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - PANTRY_ENV: `production` or `development` (default: development)
    /// - PORT: listen port (default: 5000)
    /// - PANTRY_DATA_FILE: JSON document path (default: data.json)
    /// - PANTRY_STATIC_DIR: directory holding index.html (default: .)
    /// - PANTRY_PASSWORD: shared secret (default: the built-in password)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = std::env::var("PANTRY_ENV").map(|v| Mode::parse(&v)).unwrap_or(Mode::Development);
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 5000,
        };
        let data_file = std::env::var("PANTRY_DATA_FILE").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("data.json"));
        let static_dir = std::env::var("PANTRY_STATIC_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."));
        let password = std::env::var("PANTRY_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());
        Ok(Self { mode, port, data_file, static_dir, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!(Mode::parse("production"), Mode::Production);
        assert_eq!(Mode::parse("PRODUCTION"), Mode::Development);
        assert_eq!(Mode::parse(" production"), Mode::Development);
        assert_eq!(Mode::parse("development"), Mode::Development);
        assert_eq!(Mode::parse("staging"), Mode::Development);
    }
}
