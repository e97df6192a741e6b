//! The query seam between evaluators and the network.

use async_trait::async_trait;
use dnsauth_core::{AnswerSet, RecordType, TransportResult};

/// Something that can answer a single DNS query.
///
/// One call is one round trip: implementations must not retry or cache.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Query `name` for `record_type`; an empty answer set is a valid result.
    async fn query(&self, name: &str, record_type: RecordType) -> TransportResult<AnswerSet>;
}

