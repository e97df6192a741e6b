use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dkim::DkimVerdict;
use super::dmarc::DmarcVerdict;
use super::spf::SpfVerdict;
use super::target::CheckTarget;
use crate::scoring;

/// Combined result of one check. Built once by [`AuthReport::new`] and not mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthReport {
    /// What was checked
    pub target: CheckTarget,

    /// SPF verdict for the apex domain
    pub spf: SpfVerdict,

    /// Per-selector DKIM presence
    pub dkim: DkimVerdict,

    /// DMARC verdict
    pub dmarc: DmarcVerdict,

    /// Authentication score in `[0, 100]`
    pub score: u8,

    /// When the check completed
    pub checked_at: DateTime<Utc>,
}

impl AuthReport {
    /// Assemble a report, deriving the score from the three verdicts
    #[must_use]
    pub fn new(
        target: CheckTarget,
        spf: SpfVerdict,
        dkim: DkimVerdict,
        dmarc: DmarcVerdict,
    ) -> Self {
        let score = scoring::score(&spf, &dkim, &dmarc);
        Self {
            target,
            spf,
            dkim,
            dmarc,
            score,
            checked_at: Utc::now(),
        }
    }

    /// Domain whose records were checked
    #[must_use]
    pub fn domain(&self) -> &str {
        self.target.domain()
    }
}
