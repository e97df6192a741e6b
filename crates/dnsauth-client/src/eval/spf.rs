//! SPF evaluation: the only stage whose failure aborts a check.

use dnsauth_core::{DnsAuthError, RecordType, Result, SpfProviders, SpfVerdict};
use tracing::debug;

use crate::resolver::TxtResolver;

/// Query the apex TXT records of `domain` and interpret them as SPF.
///
/// A transport failure becomes [`DnsAuthError::Evaluation`].
pub async fn evaluate_spf<R>(
    resolver: &R,
    domain: &str,
    providers: &SpfProviders,
) -> Result<SpfVerdict>
where
    R: TxtResolver + ?Sized,
{
    let answers = resolver
        .query(domain, RecordType::Txt)
        .await
        .map_err(DnsAuthError::Evaluation)?;

    let verdict = SpfVerdict::from_answers(&answers, providers);
    debug!(
        domain,
        exists = verdict.exists,
        exactly_one = verdict.has_exactly_one,
        "SPF evaluated"
    );
    Ok(verdict)
}
