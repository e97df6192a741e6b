//! # dnsauth-cli
//!
//! Command-line interface for checking email authentication DNS records.
//!
//! ## Features
//!
//! - **Checks**: SPF, DKIM (five selectors) and DMARC over DNS-over-HTTPS
//! - **Score**: 0-100, weighted 40 / 40 / 20
//! - **Usage log**: optional reporting to a log service, and `stats` to read it
//! - **Educational mode**: `--explain` lists the queried names and the weights
//! - **Multiple output formats**: Pretty, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod education;
pub mod output;

pub use cli::run;
