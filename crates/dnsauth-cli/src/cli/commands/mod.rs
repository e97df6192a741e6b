//! Command implementations.

pub mod check;
pub mod config;
pub mod serve;
pub mod stats;

use dnsauth::{AuthChecker, CheckConfig, DohClient, UsageLogClient};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolver, timeout and SPF providers
    pub check: CheckConfig,

    /// Usage log service base URL
    pub log_endpoint: Option<String>,

    /// Admin token from the config file
    pub admin_token: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// Whether to show educational explanations
    pub explain: bool,
}

impl Context {
    /// Get the log endpoint, returning an error if not set.
    pub fn require_log_endpoint(&self) -> anyhow::Result<&str> {
        self.log_endpoint.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Log endpoint required.\n\n\
                 Set it with one of:\n  \
                 1. --log-endpoint <URL>\n  \
                 2. DNSAUTH_LOG_ENDPOINT environment variable\n  \
                 3. dnsauth config set log_endpoint <URL>"
            )
        })
    }

    /// Build a checker against the configured resolver.
    pub fn checker(&self) -> anyhow::Result<AuthChecker<DohClient>> {
        Ok(AuthChecker::from_config(&self.check)?)
    }

    /// Usage log client, authenticating with `token` when given.
    pub fn log_client(&self, token: Option<String>) -> anyhow::Result<UsageLogClient> {
        let endpoint = self.require_log_endpoint()?;
        Ok(UsageLogClient::with_token(endpoint, token)?)
    }
}
