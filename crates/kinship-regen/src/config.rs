//! Configuration for batch regeneration
//!
//! Defines pool size, pass interval and the suggestion policy applied while
//! regenerating.

use kinship_workflow::SuggestionPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the regeneration service
///
/// # Examples
///
/// ```
/// use kinship_regen::RegenConfig;
///
/// // Default configuration (balanced)
/// let config = RegenConfig::default();
/// assert_eq!(config.max_concurrent, 4);
///
/// // Frequent passes with a wider pool
/// let config = RegenConfig::aggressive();
/// assert_eq!(config.max_concurrent, 8);
///
/// // Infrequent passes with a small pool
/// let config = RegenConfig::lenient();
/// assert_eq!(config.max_concurrent, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    /// Subjects regenerated at the same time
    /// Default: 4
    pub max_concurrent: usize,

    /// Time between passes (in seconds)
    /// Default: 3600 (hourly)
    pub interval_secs: u64,

    /// How long a dismissal suppresses a pair (in days); absent means forever
    /// Default: 90 days
    pub dismissal_cooldown_days: Option<u64>,

    /// Run the engine without persisting anything
    /// Default: false
    pub dry_run: bool,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            interval_secs: 3600,
            dismissal_cooldown_days: Some(90),
            dry_run: false,
        }
    }
}

impl RegenConfig {
    /// Frequent passes with a wider pool
    ///
    /// - Pool: 8 subjects
    /// - Interval: 15 minutes
    /// - Dismissal cooldown: 30 days
    pub fn aggressive() -> Self {
        Self {
            max_concurrent: 8,
            interval_secs: 15 * 60,
            dismissal_cooldown_days: Some(30),
            dry_run: false,
        }
    }

    /// Infrequent passes with a small pool
    ///
    /// - Pool: 2 subjects
    /// - Interval: 6 hours
    /// - Dismissals never expire
    pub fn lenient() -> Self {
        Self {
            max_concurrent: 2,
            interval_secs: 6 * 3600,
            dismissal_cooldown_days: None,
            dry_run: false,
        }
    }

    /// Get the pass interval as Duration (at least one second)
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// Suggestion policy derived from this configuration
    pub fn policy(&self) -> SuggestionPolicy {
        match self.dismissal_cooldown_days {
            Some(days) => SuggestionPolicy::with_cooldown(Duration::from_secs(days * 86400)),
            None => SuggestionPolicy::permanent_dismissals(),
        }
    }

    /// Check the configuration for values the worker cannot run with
    pub fn validate(&self) -> Result<(), crate::RegenError> {
        if self.max_concurrent == 0 {
            return Err(crate::RegenError::Config(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegenConfig::default();
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert_eq!(config.dismissal_cooldown_days, Some(90));
        assert!(!config.dry_run);
        assert_eq!(config.policy(), SuggestionPolicy::default());
    }

    #[test]
    fn test_presets() {
        let aggressive = RegenConfig::aggressive();
        let lenient = RegenConfig::lenient();
        assert!(aggressive.interval() < RegenConfig::default().interval());
        assert!(lenient.interval() > RegenConfig::default().interval());
        assert_eq!(lenient.policy(), SuggestionPolicy::permanent_dismissals());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = RegenConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate() {
        assert!(RegenConfig::default().validate().is_ok());
        let config = RegenConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = RegenConfig::aggressive();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: RegenConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_optional_fields() {
        let config: RegenConfig =
            serde_json::from_str(r#"{"max_concurrent": 3}"#).unwrap();
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.interval_secs, 3600);
        assert_eq!(config.dismissal_cooldown_days, Some(90));
        assert!(!config.dry_run);
    }
}
