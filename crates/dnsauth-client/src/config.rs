//! Client configuration types.

use dnsauth_core::SpfProviders;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public DNS-over-HTTPS endpoint used when none is configured
pub const DEFAULT_RESOLVER: &str = "https://cloudflare-dns.com/dns-query";

/// Default per-query timeout; a query never blocks longer than this
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent sent to the resolver and the log service
pub(crate) const USER_AGENT: &str = concat!("dnsauth/", env!("CARGO_PKG_VERSION"));

/// Everything needed to build a checker from a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// DNS-over-HTTPS endpoint
    #[serde(default = "default_resolver")]
    pub resolver: String,

    /// Per-query timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Provider include domains looked for in SPF
    #[serde(default)]
    pub providers: SpfProviders,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            resolver: default_resolver(),
            timeout_secs: default_timeout_secs(),
            providers: SpfProviders::default(),
        }
    }
}

impl CheckConfig {
    /// Set the resolver endpoint
    #[must_use]
    pub fn resolver(mut self, endpoint: impl Into<String>) -> Self {
        self.resolver = endpoint.into();
        self
    }

    /// Set the SPF provider pair
    #[must_use]
    pub fn providers(mut self, providers: SpfProviders) -> Self {
        self.providers = providers;
        self
    }

    /// Set the per-query timeout in seconds
    #[must_use]
    pub const fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Per-query timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_resolver() -> String {
    DEFAULT_RESOLVER.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
