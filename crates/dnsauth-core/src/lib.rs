//! Core types, verdict interpretation and scoring for email-authentication checks.
//!
//! This crate holds everything that can be decided without touching the network:
//!
//! - **Types**: DNS-JSON answers, the SPF/DKIM/DMARC verdicts and the [`AuthReport`]
//! - **Scoring**: the fixed 40/40/20 weighting in [`scoring`]
//! - **Errors**: [`TransportError`] for a failed DNS query, [`DnsAuthError`] for everything else
//!
//! # Example
//!
//! ```rust
//! use dnsauth_core::{AnswerRecord, SpfProviders, SpfVerdict};
//!
//! let answers = vec![AnswerRecord::txt("example.com", "\"v=spf1 include:sendgrid.net ~all\"")];
//! let spf = SpfVerdict::from_answers(&answers, &SpfProviders::default());
//!
//! assert!(spf.has_exactly_one);
//! assert!(spf.has_provider_b);
//! ```

#![doc(html_root_url = "https://docs.rs/dnsauth-core/0.1.0")]

mod error;
pub mod scoring;
pub mod types;

pub use error::{DnsAuthError, Result, TransportError, TransportResult};
pub use types::*;
