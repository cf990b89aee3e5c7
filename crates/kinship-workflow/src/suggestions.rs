//! Suggestion persistence and review

use crate::config::SuggestionPolicy;
use crate::requests::RequestWorkflow;
use kinship_deduction::DeductionEngine;
use kinship_domain::traits::KinshipStore;
use kinship_domain::{
    current_timestamp, Candidate, KinshipError, PersonId, RelationshipEdge, Suggestion,
    SuggestionId, SuggestionStatus, Result,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Generates, stores and resolves suggestions
pub struct SuggestionStore<S> {
    store: Arc<S>,
    engine: DeductionEngine<S>,
    requests: RequestWorkflow<S>,
    policy: SuggestionPolicy,
}

impl<S: KinshipStore> SuggestionStore<S> {
    /// Create a suggestion store with the default policy
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, SuggestionPolicy::default())
    }

    /// Create a suggestion store with a custom policy
    pub fn with_policy(store: Arc<S>, policy: SuggestionPolicy) -> Self {
        Self {
            engine: DeductionEngine::new(Arc::clone(&store)),
            requests: RequestWorkflow::new(Arc::clone(&store)),
            store,
            policy,
        }
    }

    /// The request workflow used for acceptance
    pub fn requests(&self) -> &RequestWorkflow<S> {
        &self.requests
    }

    /// The deduction engine used for generation
    pub fn engine(&self) -> &DeductionEngine<S> {
        &self.engine
    }

    /// The policy in use
    pub fn policy(&self) -> &SuggestionPolicy {
        &self.policy
    }

    /// Replace the pending suggestions of `subject` with `candidates`
    ///
    /// One transaction. Candidates already confirmed by an accepted edge, or
    /// dismissed inside the cooldown window, are skipped. Unchanged
    /// candidates keep their existing rows.
    pub fn replace_for(&self, subject: PersonId, candidates: Vec<Candidate>) -> Result<Vec<Suggestion>> {
        let now = current_timestamp();
        let fresh = candidates
            .into_iter()
            .map(|candidate| Suggestion::from_candidate(subject, candidate, now))
            .collect();
        self.store
            .replace_pending(subject, fresh, self.policy.dismissal_cutoff(now))
    }

    /// Run the engine for `subject` and persist the result
    pub fn generate_for(&self, subject: PersonId) -> Result<Vec<Suggestion>> {
        let candidates = self.engine.generate_suggestions(subject)?;
        let found = candidates.len();
        let stored = self.replace_for(subject, candidates)?;
        debug!(%subject, found, stored = stored.len(), "Suggestions regenerated");
        Ok(stored)
    }

    /// Accept a suggestion, confirming the relationship
    ///
    /// The suggestion is claimed with a compare-and-set first, so only one of
    /// two racing calls proceeds; the loser gets `AlreadyResolved`. If the
    /// relationship cannot be written the suggestion returns to pending,
    /// replacing any pending row a regeneration wrote for the pair meanwhile,
    /// and the workflow error is returned unchanged.
    pub fn accept(&self, id: SuggestionId) -> Result<RelationshipEdge> {
        let suggestion = self.store.transition_suggestion(
            id,
            SuggestionStatus::Pending,
            SuggestionStatus::Accepted,
            Some(current_timestamp()),
        )?;

        match self.confirm(&suggestion) {
            Ok(edge) => {
                info!(
                    suggestion = %id,
                    subject = %suggestion.subject_person_id,
                    suggested = %suggestion.suggested_person_id,
                    code = %suggestion.suggested_type_code,
                    "Suggestion accepted"
                );
                Ok(edge)
            }
            Err(err) => {
                if let Err(revert) = self.store.release_suggestion(id) {
                    warn!(suggestion = %id, error = %revert, "Failed to release suggestion");
                }
                Err(err)
            }
        }
    }

    /// Confirm the relationship through a request, reusing an identical pending one
    fn confirm(&self, suggestion: &Suggestion) -> Result<RelationshipEdge> {
        let requester = suggestion.subject_person_id;
        let target = suggestion.suggested_person_id;

        let (request, created) = match self.requests.pending_between(requester, target)? {
            Some(existing) if existing.proposed_type_code == suggestion.suggested_type_code => {
                (existing, false)
            }
            _ => {
                let message = format!("Accepted suggestion: {}", suggestion.reason);
                let request = self.requests.create(
                    requester,
                    target,
                    &suggestion.suggested_type_code,
                    &message,
                )?;
                (request, true)
            }
        };

        match self.requests.accept(request.id) {
            Ok(edge) => Ok(edge),
            Err(err) => {
                if created {
                    if let Err(cleanup) = self.requests.reject(request.id) {
                        warn!(request = %request.id, error = %cleanup, "Failed to withdraw request");
                    }
                }
                Err(err)
            }
        }
    }

    /// Dismiss a pending suggestion
    pub fn dismiss(&self, id: SuggestionId) -> Result<Suggestion> {
        let dismissed = self.store.transition_suggestion(
            id,
            SuggestionStatus::Pending,
            SuggestionStatus::Dismissed,
            Some(current_timestamp()),
        )?;
        info!(suggestion = %id, "Suggestion dismissed");
        Ok(dismissed)
    }

    /// Pending suggestions of `subject`, highest confidence first
    pub fn pending_for(&self, subject: PersonId) -> Result<Vec<Suggestion>> {
        self.store.pending_suggestions(subject)
    }

    /// Get a suggestion by ID
    pub fn get(&self, id: SuggestionId) -> Result<Suggestion> {
        self.store
            .get_suggestion(id)?
            .ok_or_else(|| KinshipError::NotFound(format!("suggestion {}", id)))
    }
}
