//! DKIM evaluation: one concurrent lookup per selector, failures isolated.

use dnsauth_core::{DkimSelector, DkimVerdict, RecordType};
use futures_util::future::join_all;
use tracing::debug;

use crate::resolver::TxtResolver;

/// Check every selector of [`DkimSelector::ALL`] under `domain`.
///
/// A selector is present when its subdomain has at least one answer. A failed
/// lookup counts as absent and never aborts the other selectors.
pub async fn evaluate_dkim<R>(resolver: &R, domain: &str) -> DkimVerdict
where
    R: TxtResolver + ?Sized,
{
    let lookups = DkimSelector::ALL.map(|selector| async move {
        let name = selector.subdomain(domain);
        let present = match resolver.query(&name, RecordType::Txt).await {
            Ok(answers) => !answers.is_empty(),
            Err(e) => {
                debug!(selector = %selector, error = %e, "DKIM lookup failed, treating as absent");
                false
            }
        };
        (selector, present)
    });

    DkimVerdict::from_results(join_all(lookups).await)
}
