//! Suggestion review policy

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Policy applied when suggestions are regenerated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionPolicy {
    /// How long a dismissal keeps a pair from being suggested again
    ///
    /// `None` makes dismissals permanent.
    pub dismissal_cooldown_secs: Option<u64>,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            dismissal_cooldown_secs: Some(90 * 24 * 60 * 60),
        }
    }
}

impl SuggestionPolicy {
    /// Dismissed pairs are never suggested again
    pub fn permanent_dismissals() -> Self {
        Self {
            dismissal_cooldown_secs: None,
        }
    }

    /// Dismissals expire after `cooldown`
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            dismissal_cooldown_secs: Some(cooldown.as_secs()),
        }
    }

    /// Get the cooldown as a Duration
    pub fn cooldown(&self) -> Option<Duration> {
        self.dismissal_cooldown_secs.map(Duration::from_secs)
    }

    /// Earliest dismissal time that still blocks a suggestion at `now`
    pub fn dismissal_cutoff(&self, now: u64) -> u64 {
        match self.dismissal_cooldown_secs {
            Some(secs) => now.saturating_sub(secs),
            None => 0,
        }
    }
}
