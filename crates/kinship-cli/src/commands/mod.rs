//! Command implementations.

pub mod graph;
pub mod people;
pub mod regenerate;
pub mod requests;
pub mod suggestions;
pub mod types;

pub use self::graph::{execute_relate, execute_relationships, execute_revoke};
pub use self::people::execute_person;
pub use self::regenerate::execute_regenerate_all;
pub use self::requests::execute_request;
pub use self::suggestions::{
    execute_accept_suggestion, execute_dismiss, execute_suggest, execute_suggestions,
};
pub use self::types::execute_types;

use crate::error::{CliError, Result};
use kinship_domain::{PersonId, RelationshipEdge, RequestId, SuggestionId};
use kinship_regen::RegenConfig;
use kinship_store::SqliteStore;
use kinship_workflow::SuggestionStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Opened store plus the services commands run against.
pub struct Services {
    /// Backing store
    pub store: Arc<SqliteStore>,
    /// Suggestion service, which also owns the request workflow
    pub suggestions: Arc<SuggestionStore<SqliteStore>>,
    /// Regeneration settings
    pub regen: RegenConfig,
}

impl Services {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path, regen: RegenConfig) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Arc::new(SqliteStore::new(path)?);
        Ok(Self::from_store(store, regen))
    }

    /// Wrap an already opened store.
    pub fn from_store(store: Arc<SqliteStore>, regen: RegenConfig) -> Self {
        let suggestions = Arc::new(SuggestionStore::with_policy(
            Arc::clone(&store),
            regen.policy(),
        ));
        Self {
            store,
            suggestions,
            regen,
        }
    }

    /// Refresh suggestions for both ends of a newly confirmed edge.
    pub(crate) fn regenerate_parties(&self, edge: &RelationshipEdge) {
        self.regenerate_pair(edge.from_person_id, edge.to_person_id);
    }

    /// Refresh suggestions for both people; failures are logged only.
    pub(crate) fn regenerate_pair(&self, a: PersonId, b: PersonId) {
        for person in [a, b] {
            if let Err(e) = self.suggestions.generate_for(person) {
                warn!(%person, error = %e, "Failed to regenerate suggestions");
            }
        }
    }
}

pub(crate) fn parse_suggestion_id(raw: &str) -> Result<SuggestionId> {
    SuggestionId::from_string(raw).map_err(CliError::InvalidInput)
}

pub(crate) fn parse_request_id(raw: &str) -> Result<RequestId> {
    RequestId::from_string(raw).map_err(CliError::InvalidInput)
}
