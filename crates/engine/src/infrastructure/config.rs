//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SERVER_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
    #[error("Invalid bind address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub data_path: PathBuf,
    pub public_path: PathBuf,
    /// Raw `CORS_ALLOWED_ORIGINS`; `None` when unset or blank.
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8081,
        };
        let data_path = lookup("DATA_PATH").unwrap_or_else(|| "./data".into());
        let public_path = lookup("PUBLIC_PATH").unwrap_or_else(|| "./public".into());
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            server_host,
            server_port,
            data_path: data_path.into(),
            public_path: public_path.into(),
            cors_allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.server_host.clone(),
                port: self.server_port,
            })
    }
}
