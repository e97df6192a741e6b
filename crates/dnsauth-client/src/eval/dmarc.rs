//! DMARC evaluation: failures collapse to "no record".

use dnsauth_core::{dmarc_subdomain, DmarcVerdict, RecordType};
use tracing::debug;

use crate::resolver::TxtResolver;

/// Query `_dmarc.<domain>` and read the policy of the first answer.
///
/// Any query failure yields [`DmarcVerdict::absent`], indistinguishable from a
/// domain that publishes no DMARC record.
pub async fn evaluate_dmarc<R>(resolver: &R, domain: &str) -> DmarcVerdict
where
    R: TxtResolver + ?Sized,
{
    let name = dmarc_subdomain(domain);
    match resolver.query(&name, RecordType::Txt).await {
        Ok(answers) => DmarcVerdict::from_answers(&answers),
        Err(e) => {
            debug!(name = %name, error = %e, "DMARC lookup failed, treating as absent");
            DmarcVerdict::absent()
        }
    }
}
