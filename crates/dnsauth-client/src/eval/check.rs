//! Whole-domain check: SPF, DKIM and DMARC run concurrently.

use dnsauth_core::{AuthReport, CheckTarget, Result, SpfProviders};
use tracing::{debug, instrument};

use super::{evaluate_dkim, evaluate_dmarc, evaluate_spf};
use crate::client::DohClient;
use crate::config::CheckConfig;
use crate::resolver::TxtResolver;

/// Runs a complete check against a resolver
#[derive(Debug, Clone)]
pub struct AuthChecker<R> {
    resolver: R,
    providers: SpfProviders,
}

impl<R: TxtResolver> AuthChecker<R> {
    /// Create a checker with the default SPF providers
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            providers: SpfProviders::default(),
        }
    }

    /// Look for a different SPF provider pair
    #[must_use]
    pub fn providers(mut self, providers: SpfProviders) -> Self {
        self.providers = providers;
        self
    }

    /// Check one target.
    ///
    /// The three evaluators are independent and run concurrently. An SPF
    /// transport failure fails the whole check; DKIM and DMARC failures only
    /// degrade their own verdicts. Dropping the future abandons every
    /// in-flight query.
    #[instrument(skip(self), fields(domain = target.domain()))]
    pub async fn check(&self, target: &CheckTarget) -> Result<AuthReport> {
        let domain = target.domain();

        let (spf, dkim, dmarc) = tokio::join!(
            evaluate_spf(&self.resolver, domain, &self.providers),
            evaluate_dkim(&self.resolver, domain),
            evaluate_dmarc(&self.resolver, domain),
        );

        let report = AuthReport::new(target.clone(), spf?, dkim, dmarc);
        debug!(score = report.score, "check complete");
        Ok(report)
    }
}

impl AuthChecker<DohClient> {
    /// DoH checker with the resolver, timeout and providers of `config`
    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        Ok(DohClient::from_config(config)?
            .checker()
            .providers(config.providers.clone()))
    }
}
