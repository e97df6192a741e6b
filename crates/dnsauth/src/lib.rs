//! Email authentication checks for a domain: SPF, DKIM and DMARC over
//! DNS-over-HTTPS, scored out of 100.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dnsauth::{CheckTarget, DohClient};
//!
//! #[tokio::main]
//! async fn main() -> dnsauth::Result<()> {
//!     let client = DohClient::new()?;
//!     let target = CheckTarget::parse("postmaster@example.com")?;
//!
//!     let report = client.checker().check(&target).await?;
//!     println!("SPF ok: {}", report.spf.has_exactly_one);
//!     println!("DKIM selectors: {}", report.dkim.present_count());
//!     println!("DMARC policy: {:?}", report.dmarc.policy);
//!     println!("Score: {}/100", report.score);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS
//! - `server` - Usage log store and `POST /log` / `GET /stats` service

// Re-export core types
pub use dnsauth_core::*;

// Re-export client
pub use dnsauth_client::{
    eval, AuthChecker, CheckConfig, DohClient, DohClientBuilder, TxtResolver, UsageLogClient,
    DEFAULT_RESOLVER, DEFAULT_TIMEOUT,
};

// Re-export the store if enabled
#[cfg(feature = "server")]
pub use dnsauth_store as store;

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
