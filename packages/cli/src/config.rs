// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Port, bind host, database path, set store backend, API credentials, and CORS origin

use std::env;
use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid set store: {0} (expected 'sqlite' or 'memory')")]
    InvalidSetStore(String),
    #[error("API credentials must not be empty")]
    EmptyCredentials,
}

/// Which backend holds the tag sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetStoreKind {
    Sqlite, // Persisted next to the users table
    Memory, // Lost on restart
}

impl FromStr for SetStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(SetStoreKind::Sqlite),
            "memory" => Ok(SetStoreKind::Memory),
            _ => Err(ConfigError::InvalidSetStore(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub db_path: PathBuf,
    pub set_store: SetStoreKind,
    pub api_username: String,
    pub api_password: String,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_str = lookup("PORT").unwrap_or_else(|| "4001".to_string());
        let port = parse_port(&port_str)?;

        let host_str = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let host = parse_host(&host_str)?;

        let db_path = lookup("USERTAGS_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(usertags_core::default_database_path);

        let set_store = lookup("USERTAGS_SET_STORE")
            .unwrap_or_else(|| "sqlite".to_string())
            .parse::<SetStoreKind>()?;

        let api_username =
            lookup("USERTAGS_API_USERNAME").unwrap_or_else(|| "client".to_string());
        let api_password =
            lookup("USERTAGS_API_PASSWORD").unwrap_or_else(|| "authenticate_me".to_string());
        if api_username.is_empty() || api_password.is_empty() {
            return Err(ConfigError::EmptyCredentials);
        }

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        Ok(Config {
            port,
            host,
            db_path,
            set_store,
            api_username,
            api_password,
            cors_origin,
        })
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    let port = value.trim().parse::<u16>()?;

    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }

    Ok(port)
}

pub fn parse_host(value: &str) -> Result<IpAddr, ConfigError> {
    value
        .trim()
        .parse::<IpAddr>()
        .map_err(|_| ConfigError::InvalidHost(value.to_string()))
}
