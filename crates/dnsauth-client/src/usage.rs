//! Client for the usage log backend (`POST /log`, `GET /stats`).

use dnsauth_core::{DnsAuthError, LogRequest, Result, UsageStats};
use reqwest::header::AUTHORIZATION;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::config::USER_AGENT;

/// Timeout for log backend requests
const LOG_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the usage log backend
#[derive(Clone)]
pub struct UsageLogClient {
    inner: Arc<LogInner>,
}

struct LogInner {
    http: HttpClient,
    base_url: Url,
    admin_token: Option<String>,
}

impl UsageLogClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_token(base_url, None)
    }

    /// Create a client that authenticates `GET /stats` with a bearer token
    pub fn with_token(base_url: &str, admin_token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DnsAuthError::Config(format!("invalid log endpoint {base_url}: {e}")))?;

        let http = HttpClient::builder()
            .timeout(LOG_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DnsAuthError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(LogInner {
                http,
                base_url,
                admin_token,
            }),
        })
    }

    /// Send one check to `POST /log` and wait for the answer
    pub async fn submit(&self, request: &LogRequest) -> Result<()> {
        let url = self.build_url("log")?;
        debug!(url = %url, "POST usage log");

        let response = self
            .inner
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| DnsAuthError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Fire-and-forget [`submit`](Self::submit) on a detached task.
    ///
    /// Failures are only logged. The handle may be dropped; awaiting it never
    /// yields an error.
    pub fn dispatch(&self, request: LogRequest) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.submit(&request).await {
                warn!(error = %e, "usage log dispatch failed");
            }
        })
    }

    /// Fetch aggregate statistics from `GET /stats`
    pub async fn stats(&self) -> Result<UsageStats> {
        self.get("stats").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let mut request = self.inner.http.get(url);
        if let Some(token) = &self.inner.admin_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DnsAuthError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| DnsAuthError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(DnsAuthError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let mut base = self.inner.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| DnsAuthError::Config(format!("invalid log path {path}: {e}")))
    }

    /// Convert an error response, preferring the `error` field of a JSON body
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        Err(DnsAuthError::Api {
            code: status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_under_base() {
        let client = UsageLogClient::new("https://logs.test/api").unwrap();
        assert_eq!(client.build_url("log").unwrap().as_str(), "https://logs.test/api/log");

        let client = UsageLogClient::new("https://logs.test/").unwrap();
        assert_eq!(client.build_url("stats").unwrap().as_str(), "https://logs.test/stats");
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            UsageLogClient::new("::nope").err().unwrap(),
            DnsAuthError::Config(_)
        ));
    }
}
