//! Authentication scoring.
//!
//! Pure and deterministic: the score depends only on the three verdicts.

pub mod weights;

pub use weights::ScoreWeights;

use crate::types::{DkimSelector, DkimVerdict, DmarcVerdict, SpfVerdict};

/// Score a check with the standard 40/40/20 weights.
#[must_use]
pub fn score(spf: &SpfVerdict, dkim: &DkimVerdict, dmarc: &DmarcVerdict) -> u8 {
    score_with(ScoreWeights::STANDARD, spf, dkim, dmarc)
}

/// Score a check with explicit weights.
#[must_use]
pub fn score_with(
    weights: ScoreWeights,
    spf: &SpfVerdict,
    dkim: &DkimVerdict,
    dmarc: &DmarcVerdict,
) -> u8 {
    let mut total: u16 = 0;
    if spf.has_exactly_one {
        total += u16::from(weights.spf);
    }
    total += dkim_points(weights.dkim, dkim.present_count(), DkimSelector::ALL.len());
    if dmarc.exists {
        total += u16::from(weights.dmarc);
    }
    u8::try_from(total.min(100)).unwrap_or(100)
}

/// DKIM share of the score: `floor(weight * present / selectors)`.
///
/// Never exceeds `weight`, whatever the selector count.
#[must_use]
pub fn dkim_points(weight: u8, present: usize, selectors: usize) -> u16 {
    if selectors == 0 {
        return 0;
    }
    let present = present.min(selectors);
    let points = usize::from(weight) * present / selectors;
    u16::try_from(points).unwrap_or(u16::from(weight))
}
