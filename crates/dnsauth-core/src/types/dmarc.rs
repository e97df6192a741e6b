use serde::{Deserialize, Serialize};
use std::fmt;

use super::dns::AnswerRecord;

/// Declared DMARC policy (`p=` tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DmarcPolicy {
    /// `p=reject`
    Reject,
    /// `p=quarantine`
    Quarantine,
    /// `p=none`
    None,
}

impl DmarcPolicy {
    /// Policies in detection priority order
    const PRIORITY: [Self; 3] = [Self::Reject, Self::Quarantine, Self::None];

    /// Policy value as written after `p=`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Quarantine => "quarantine",
            Self::None => "none",
        }
    }

    /// First policy token found in the record; substring match, not a tag parse
    #[must_use]
    pub fn detect(record: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|p| record.contains(&format!("p={}", p.as_str())))
    }
}

impl fmt::Display for DmarcPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DMARC verdict for `_dmarc.<domain>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmarcVerdict {
    /// At least one TXT answer exists at `_dmarc.<domain>`
    pub exists: bool,

    /// Policy of the first answer, if a recognised token was found
    pub policy: Option<DmarcPolicy>,
}

impl DmarcVerdict {
    /// Verdict for a domain without a DMARC record
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            exists: false,
            policy: None,
        }
    }

    /// Interpret the `_dmarc` TXT answers; only the first answer is inspected
    #[must_use]
    pub fn from_answers(answers: &[AnswerRecord]) -> Self {
        answers.first().map_or_else(Self::absent, |first| Self {
            exists: true,
            policy: DmarcPolicy::detect(first.unquoted_data()),
        })
    }
}

/// Name queried for the DMARC record
#[must_use]
pub fn dmarc_subdomain(domain: &str) -> String {
    format!("_dmarc.{domain}")
}
