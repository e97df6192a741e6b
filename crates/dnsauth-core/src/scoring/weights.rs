//! Score weight presets.

/// Points awarded per record family. The three weights sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    /// All-or-nothing, awarded when exactly one SPF record exists
    pub spf: u8,

    /// Split evenly across the DKIM selectors
    pub dkim: u8,

    /// Awarded when a DMARC record exists, whatever its policy
    pub dmarc: u8,
}

impl ScoreWeights {
    /// The product weighting: SPF 40, DKIM 40, DMARC 20.
    pub const STANDARD: Self = Self {
        spf: 40,
        dkim: 40,
        dmarc: 20,
    };

    /// Maximum reachable score
    #[must_use]
    pub const fn total(self) -> u16 {
        self.spf as u16 + self.dkim as u16 + self.dmarc as u16
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}
