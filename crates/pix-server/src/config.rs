//! Server Configuration
//!
//! Read from the process environment (after `.env` is loaded).

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR {value:?}: {reason}")]
    BindAddr { value: String, reason: String },

    #[error("Invalid CORS_ALLOW_ANY {0:?}: expected true or false")]
    CorsFlag(String),
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,

    /// Permissive CORS (any origin, method, header)
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_allow_any: true,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::BindAddr {
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        let cors_allow_any = match lookup("CORS_ALLOW_ANY") {
            None => true,
            Some(v) => match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::CorsFlag(v)),
            },
        };

        Ok(Self {
            bind_addr,
            cors_allow_any,
        })
    }
}
