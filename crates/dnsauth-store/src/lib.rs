//! dnsauth-store: usage log persistence and the HTTP service in front of it.
//!
//! Every finished check can be reported to `POST /log`, which appends one row
//! to an SQLite table. `GET /stats` returns aggregate usage: total checks, the
//! most recent checks and the most checked domains.
//!
//! # Routes
//!
//! - `POST /log` - append a check (`{"success":true}` on success)
//! - `GET /stats` - aggregate usage, optionally behind a bearer token
//! - anything else - `404 {"error":"Not found"}`

pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-exports for convenience.
pub use config::ServerConfig;
pub use error::StoreError;
pub use server::{router, run, AppState};
pub use store::UsageStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
