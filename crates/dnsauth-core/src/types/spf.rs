use serde::{Deserialize, Serialize};

use super::dns::AnswerRecord;

/// Literal prefix that marks a TXT answer as an SPF policy
pub const SPF_PREFIX: &str = "v=spf1";

/// The two sending providers whose `include:` is looked for in the SPF record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpfProviders {
    /// Provider A include domain
    pub provider_a: String,

    /// Provider B include domain
    pub provider_b: String,
}

impl Default for SpfProviders {
    fn default() -> Self {
        Self {
            provider_a: String::from("_spf.bullhornmail.com"),
            provider_b: String::from("sendgrid.net"),
        }
    }
}

impl SpfProviders {
    /// Create a provider pair
    #[must_use]
    pub fn new(provider_a: impl Into<String>, provider_b: impl Into<String>) -> Self {
        Self {
            provider_a: provider_a.into(),
            provider_b: provider_b.into(),
        }
    }

    fn includes(record: &str, provider: &str) -> bool {
        record.contains(&format!("include:{provider}"))
    }
}

/// SPF verdict for the apex domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpfVerdict {
    /// At least one TXT answer starts with `v=spf1`
    pub exists: bool,

    /// Exactly one TXT answer starts with `v=spf1`
    pub has_exactly_one: bool,

    /// First SPF record, unquoted. Does not imply it is the only one.
    pub record: Option<String>,

    /// `record` contains `include:<provider A>`
    pub has_provider_a: bool,

    /// `record` contains `include:<provider B>`
    pub has_provider_b: bool,
}

impl SpfVerdict {
    /// Verdict for a domain without any SPF record
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    /// Interpret the apex TXT answers.
    ///
    /// Provider detection is a plain substring test on the first SPF record;
    /// nested includes are not followed.
    #[must_use]
    pub fn from_answers(answers: &[AnswerRecord], providers: &SpfProviders) -> Self {
        let records: Vec<&str> = answers
            .iter()
            .map(AnswerRecord::unquoted_data)
            .filter(|data| data.starts_with(SPF_PREFIX))
            .collect();

        let Some(first) = records.first() else {
            return Self::absent();
        };

        Self {
            exists: true,
            has_exactly_one: records.len() == 1,
            record: Some((*first).to_string()),
            has_provider_a: SpfProviders::includes(first, &providers.provider_a),
            has_provider_b: SpfProviders::includes(first, &providers.provider_b),
        }
    }
}
