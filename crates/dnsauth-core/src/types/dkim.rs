use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// DKIM selectors checked for every domain, in report order.
///
/// The scorer divides the DKIM weight across however many variants exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DkimSelector {
    /// `bh._domainkey`
    Bh,
    /// `ba._domainkey`
    Ba,
    /// `ba2._domainkey`
    Ba2,
    /// `hf._domainkey`
    Hf,
    /// `hf2._domainkey`
    Hf2,
}

impl DkimSelector {
    /// Every selector, in report order
    pub const ALL: [Self; 5] = [Self::Bh, Self::Ba, Self::Ba2, Self::Hf, Self::Hf2];

    /// Selector label as it appears in DNS
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bh => "bh",
            Self::Ba => "ba",
            Self::Ba2 => "ba2",
            Self::Hf => "hf",
            Self::Hf2 => "hf2",
        }
    }

    /// Name queried for this selector: `<selector>._domainkey.<domain>`
    #[must_use]
    pub fn subdomain(self, domain: &str) -> String {
        format!("{}._domainkey.{domain}", self.label())
    }
}

impl fmt::Display for DkimSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-selector presence of a DKIM key record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DkimVerdict(BTreeMap<DkimSelector, bool>);

impl DkimVerdict {
    /// Verdict with every selector absent
    #[must_use]
    pub fn absent() -> Self {
        Self::from_results(DkimSelector::ALL.map(|s| (s, false)))
    }

    /// Merge per-selector results by key; arrival order does not matter.
    ///
    /// Selectors missing from `results` are recorded as absent.
    #[must_use]
    pub fn from_results(results: impl IntoIterator<Item = (DkimSelector, bool)>) -> Self {
        let mut map: BTreeMap<DkimSelector, bool> =
            DkimSelector::ALL.iter().map(|s| (*s, false)).collect();
        for (selector, present) in results {
            map.insert(selector, present);
        }
        Self(map)
    }

    /// Whether the selector has at least one TXT answer
    #[must_use]
    pub fn is_present(&self, selector: DkimSelector) -> bool {
        self.0.get(&selector).copied().unwrap_or(false)
    }

    /// Number of selectors that are present
    #[must_use]
    pub fn present_count(&self) -> usize {
        DkimSelector::ALL
            .iter()
            .filter(|s| self.is_present(**s))
            .count()
    }

    /// Iterate over `(selector, present)` in report order
    pub fn iter(&self) -> impl Iterator<Item = (DkimSelector, bool)> + '_ {
        DkimSelector::ALL.iter().map(|s| (*s, self.is_present(*s)))
    }
}
