//! DNS-over-HTTPS client implementation.

use crate::config::{CheckConfig, DEFAULT_RESOLVER, DEFAULT_TIMEOUT, USER_AGENT};
use crate::eval::AuthChecker;
use crate::resolver::TxtResolver;
use async_trait::async_trait;
use dnsauth_core::{
    AnswerSet, DnsAuthError, DnsJsonResponse, RecordType, Result, TransportError, TransportResult,
};
use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Media type of the JSON flavour of DNS-over-HTTPS
const DNS_JSON: &str = "application/dns-json";

/// DNS-over-HTTPS client speaking the DNS-JSON format
#[derive(Clone)]
pub struct DohClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    endpoint: Url,
}

impl DohClient {
    /// Create a client for the default public resolver
    pub fn new() -> Result<Self> {
        DohClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> DohClientBuilder {
        DohClientBuilder::new()
    }

    /// Create a client from a [`CheckConfig`]. The SPF providers are applied
    /// by [`AuthChecker::from_config`].
    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        DohClientBuilder::new()
            .endpoint(&config.resolver)
            .timeout(config.timeout())
            .build()
    }

    /// The resolver endpoint queries are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint.as_str()
    }

    /// Wrap this client in an [`AuthChecker`] with the default SPF providers
    #[must_use]
    pub fn checker(&self) -> AuthChecker<Self> {
        AuthChecker::new(self.clone())
    }

    /// Build the query URL: `<endpoint>?name=<name>&type=<type>`
    fn build_url(&self, name: &str, record_type: RecordType) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("type", record_type.as_str());
        url
    }
}

#[async_trait]
impl TxtResolver for DohClient {
    async fn query(&self, name: &str, record_type: RecordType) -> TransportResult<AnswerSet> {
        let url = self.build_url(name, record_type);
        debug!(url = %url, "DoH query");

        let response = self
            .inner
            .http
            .get(url)
            .header(ACCEPT, DNS_JSON)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        let answers = serde_json::from_str::<DnsJsonResponse>(&body)?.answers();

        debug!(name, %record_type, answers = answers.len(), "DoH answer");
        Ok(answers)
    }
}

/// Builder for configuring a [`DohClient`]
pub struct DohClientBuilder {
    endpoint: String,
    timeout: Duration,
}

impl Default for DohClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DohClientBuilder {
    /// Create a new builder pointing at the default resolver
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_RESOLVER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the resolver endpoint (useful for testing)
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set the per-query timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DohClient> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| {
            DnsAuthError::Config(format!("invalid resolver URL {}: {e}", self.endpoint))
        })?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| DnsAuthError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(DohClient {
            inner: Arc::new(ClientInner { http, endpoint }),
        })
    }
}
