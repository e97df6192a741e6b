//! Server configuration for the usage log service.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::StoreError;

/// Configuration for a usage log service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address (default: 0.0.0.0:8787).
    pub listen: SocketAddr,

    /// SQLite database URL (default: sqlite://dnsauth.db).
    pub database_url: String,

    /// Bearer token required by `GET /stats`. Open when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,

    /// Number of recent checks returned by `GET /stats`.
    pub recent_limit: u32,

    /// Number of top domains returned by `GET /stats`.
    pub top_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            database_url: String::from(DEFAULT_DATABASE_URL),
            admin_token: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }
}

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://dnsauth.db";

/// Default size of the recent checks list.
pub const DEFAULT_RECENT_LIMIT: u32 = 20;

/// Default size of the top domains list.
pub const DEFAULT_TOP_LIMIT: u32 = 10;

impl ServerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text. Missing fields keep their defaults.
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Treat an empty admin token as no token.
    #[must_use]
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref().filter(|t| !t.is_empty())
    }
}
