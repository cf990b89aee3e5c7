//! Bounded-concurrency regeneration over every known person

use crate::{RegenConfig, RegenError, RegenMetrics};
use kinship_domain::traits::KinshipStore;
use kinship_domain::PersonId;
use kinship_workflow::SuggestionStore;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Regenerates pending suggestions for many subjects at once
///
/// Each subject is one blocking task holding a semaphore permit, so at most
/// `max_concurrent` subjects run together. A failing subject is logged and
/// counted without stopping the pass. Cancellation stops new subjects from
/// starting; subjects already running finish, so every subject ends up either
/// fully regenerated or untouched.
pub struct Regenerator<S> {
    store: Arc<S>,
    suggestions: Arc<SuggestionStore<S>>,
    config: RegenConfig,
    metrics: RegenMetrics,
}

impl<S: KinshipStore + 'static> Regenerator<S> {
    /// Create a regenerator with its own suggestion store
    pub fn new(store: Arc<S>, config: RegenConfig) -> Self {
        let suggestions = Arc::new(SuggestionStore::with_policy(
            Arc::clone(&store),
            config.policy(),
        ));
        Self::with_suggestions(store, suggestions, config)
    }

    /// Create a regenerator sharing an existing suggestion store
    pub fn with_suggestions(
        store: Arc<S>,
        suggestions: Arc<SuggestionStore<S>>,
        config: RegenConfig,
    ) -> Self {
        Self {
            store,
            suggestions,
            config,
            metrics: RegenMetrics::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RegenConfig {
        &self.config
    }

    /// Metrics accumulated over every pass
    pub fn metrics(&self) -> &RegenMetrics {
        &self.metrics
    }

    /// Reset accumulated metrics
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Regenerate every person known to the store
    ///
    /// Returns the metrics of this pass.
    pub async fn regenerate_all(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<RegenMetrics, RegenError> {
        let subjects = self.store.person_ids()?;
        self.regenerate(subjects, cancel).await
    }

    /// Regenerate the given subjects
    pub async fn regenerate(
        &mut self,
        subjects: Vec<PersonId>,
        cancel: &CancellationToken,
    ) -> Result<RegenMetrics, RegenError> {
        self.config.validate()?;

        let started = Instant::now();
        let total = subjects.len();
        let dry_run = self.config.dry_run;
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut set = JoinSet::new();
        let mut pass = RegenMetrics::new();
        let mut launched = 0;

        info!(
            subjects = total,
            max_concurrent = self.config.max_concurrent,
            dry_run,
            "Regeneration pass started"
        );

        for subject in subjects {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&semaphore).acquire_owned() => {
                    permit.map_err(|e| RegenError::Worker(e.to_string()))?
                }
            };
            if cancel.is_cancelled() {
                break;
            }

            let suggestions = Arc::clone(&self.suggestions);
            set.spawn_blocking(move || {
                let _permit = permit;
                let result = if dry_run {
                    suggestions
                        .engine()
                        .generate_suggestions(subject)
                        .map(|candidates| candidates.len())
                } else {
                    suggestions.generate_for(subject).map(|stored| stored.len())
                };
                (subject, result)
            });
            launched += 1;
        }

        if launched < total {
            warn!(skipped = total - launched, "Regeneration pass cancelled");
            pass.record_skipped(total - launched);
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((subject, Ok(count))) => {
                    debug!(%subject, suggestions = count, "Subject regenerated");
                    pass.record_success(count);
                }
                Ok((subject, Err(err))) => {
                    warn!(%subject, error = %err, "Subject regeneration failed");
                    pass.record_failure(err.kind());
                }
                Err(err) => {
                    error!(error = %err, "Regeneration task did not complete");
                    pass.record_failure("task");
                }
            }
        }

        pass.record_pass(started.elapsed().as_millis() as u64);
        info!(
            processed = pass.processed,
            failed = pass.failed,
            skipped = pass.skipped,
            elapsed_ms = pass.total_runtime_ms,
            "Regeneration pass finished"
        );

        self.metrics.absorb(&pass);
        Ok(pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::traits::{RelationshipGraphStore, SuggestionRepository};
    use kinship_domain::{EdgePair, Gender, Person};
    use kinship_store::SqliteStore;

    const AHMED: PersonId = PersonId::new(1);
    const FATIMA: PersonId = PersonId::new(2);
    const MOHAMMED: PersonId = PersonId::new(3);

    fn family() -> Arc<SqliteStore> {
        let store = SqliteStore::new(":memory:").unwrap();
        for (id, name, gender) in [
            (AHMED, "Ahmed", Gender::Male),
            (FATIMA, "Fatima", Gender::Female),
            (MOHAMMED, "Mohammed", Gender::Male),
        ] {
            store.upsert_person(&Person::new(id, name, gender)).unwrap();
        }
        store
            .put_pair(&EdgePair::new(AHMED, FATIMA, "husband", "wife", false))
            .unwrap();
        store
            .put_pair(&EdgePair::new(AHMED, MOHAMMED, "father", "son", false))
            .unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_regenerate_all() {
        let store = family();
        let mut regenerator = Regenerator::new(Arc::clone(&store), RegenConfig::default());

        let pass = regenerator
            .regenerate_all(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(pass.processed, 3);
        assert_eq!(pass.failed, 0);
        assert_eq!(pass.skipped, 0);
        assert_eq!(pass.suggestions, 2);

        let pending = store.pending_suggestions(MOHAMMED).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].suggested_person_id, FATIMA);
        assert_eq!(pending[0].suggested_type_code, "mother");
    }

    #[tokio::test]
    async fn test_passes_are_idempotent() {
        let store = family();
        let mut regenerator = Regenerator::new(Arc::clone(&store), RegenConfig::default());
        let cancel = CancellationToken::new();

        regenerator.regenerate_all(&cancel).await.unwrap();
        let first = store.pending_suggestions(FATIMA).unwrap();
        regenerator.regenerate_all(&cancel).await.unwrap();
        let second = store.pending_suggestions(FATIMA).unwrap();

        assert_eq!(first, second);
        assert_eq!(regenerator.metrics().pass_count, 2);
        assert_eq!(regenerator.metrics().processed, 6);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let store = family();
        let mut regenerator = Regenerator::new(Arc::clone(&store), RegenConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let pass = regenerator.regenerate_all(&cancel).await.unwrap();
        assert_eq!(pass.processed, 0);
        assert_eq!(pass.skipped, 3);
        assert!(store.pending_suggestions(MOHAMMED).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_persists_nothing() {
        let store = family();
        let config = RegenConfig {
            dry_run: true,
            ..Default::default()
        };
        let mut regenerator = Regenerator::new(Arc::clone(&store), config);

        let pass = regenerator
            .regenerate_all(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(pass.processed, 3);
        assert_eq!(pass.suggestions, 2);
        assert!(store.pending_suggestions(MOHAMMED).unwrap().is_empty());
        assert!(store.pending_suggestions(FATIMA).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_subset() {
        let store = family();
        let mut regenerator = Regenerator::new(Arc::clone(&store), RegenConfig::default());

        let pass = regenerator
            .regenerate(vec![MOHAMMED], &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(pass.processed, 1);
        assert_eq!(store.pending_suggestions(MOHAMMED).unwrap().len(), 1);
        assert!(store.pending_suggestions(FATIMA).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_pool_size() {
        let config = RegenConfig {
            max_concurrent: 0,
            ..Default::default()
        };
        let mut regenerator = Regenerator::new(family(), config);
        let err = regenerator
            .regenerate_all(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RegenError::Config(_)));
    }
}
