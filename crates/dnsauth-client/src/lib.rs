//! DNS-over-HTTPS client and email-authentication evaluators.
//!
//! [`DohClient`] issues single DNS-JSON queries. The [`eval`] functions turn
//! those answers into SPF/DKIM/DMARC verdicts, and [`AuthChecker`] runs all
//! three concurrently into an [`AuthReport`](dnsauth_core::AuthReport).
//! [`UsageLogClient`] talks to the usage log backend.

#![doc(html_root_url = "https://docs.rs/dnsauth-client/0.1.0")]

mod client;
mod config;
pub mod eval;
mod resolver;
mod usage;

pub use client::{DohClient, DohClientBuilder};
pub use config::*;
pub use dnsauth_core::{DnsAuthError, Result, TransportError, TransportResult};
pub use eval::AuthChecker;
pub use resolver::TxtResolver;
pub use usage::UsageLogClient;
