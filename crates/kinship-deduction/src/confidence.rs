//! Confidence scoring for composed relationships

use crate::rules::Tier;
use serde::{Deserialize, Serialize};

/// Scores assigned to composed relationships
///
/// The defaults are part of the engine's contract and tests assert them exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidencePolicy {
    /// Score for parent/child/sibling/spouse chains
    pub direct: u8,
    /// Score for grandparent, aunt/uncle, cousin and in-law results
    pub extended: u8,
    /// Deducted when the candidate's gender was unknown
    pub fallback_penalty: u8,
    /// Lower bound after the deduction
    pub floor: u8,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            direct: 90,
            extended: 70,
            fallback_penalty: 15,
            floor: 40,
        }
    }
}

impl ConfidencePolicy {
    /// Score a composition
    pub fn score(&self, tier: Tier, used_fallback: bool) -> u8 {
        let base = match tier {
            Tier::Direct => self.direct,
            Tier::Extended => self.extended,
        };
        let score = if used_fallback {
            base.saturating_sub(self.fallback_penalty).max(self.floor)
        } else {
            base
        };
        score.min(100)
    }
}
