//! Relationship request workflow
//!
//! `pending -> accepted | rejected`, exactly once.

use kinship_domain::traits::{PersonDirectory, RequestRepository};
use kinship_domain::{
    current_timestamp, EdgePair, KinshipError, Person, PersonId, RelationshipEdge,
    RelationshipRequest, RelationshipTypeCatalog, RequestId, Result,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and resolves relationship requests
pub struct RequestWorkflow<S> {
    store: Arc<S>,
    catalog: &'static RelationshipTypeCatalog,
}

impl<S> Clone for RequestWorkflow<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: self.catalog,
        }
    }
}

impl<S> RequestWorkflow<S>
where
    S: PersonDirectory + RequestRepository,
{
    /// Create a workflow over `store` with the standard catalog
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            catalog: RelationshipTypeCatalog::standard(),
        }
    }

    /// Propose that `target` is `requester`'s `type_code`
    ///
    /// # Errors
    ///
    /// - `InvalidType` for an unknown code
    /// - `InvalidInput` when requester and target are the same person
    /// - `NotFound` when either person does not exist
    /// - `Duplicate` when a pending request already exists for the pair
    pub fn create(
        &self,
        requester: PersonId,
        target: PersonId,
        type_code: &str,
        message: &str,
    ) -> Result<RelationshipRequest> {
        let code = self.catalog.require(type_code)?.code;
        if requester == target {
            return Err(KinshipError::InvalidInput(format!(
                "person {} cannot send a request to themselves",
                requester
            )));
        }
        self.require_person(requester)?;
        self.require_person(target)?;

        let request =
            RelationshipRequest::new(requester, target, code, message, current_timestamp());
        self.store.insert_request(&request)?;

        info!(request = %request.id, %requester, %target, code, "Relationship request created");
        Ok(request)
    }

    /// Accept a pending request and write the edge pair
    ///
    /// The target receives the proposed code and the requester its inverse,
    /// gendered by the requester. The pair and the status change are one
    /// transaction: a `Conflict` leaves the request pending and the graph unchanged.
    pub fn accept(&self, id: RequestId) -> Result<RelationshipEdge> {
        let request = self.get(id)?;
        if !request.is_pending() {
            return Err(already_resolved(&request));
        }

        let requester = self.require_person(request.requester_id)?;
        let inverse = self
            .catalog
            .inverse_of(&request.proposed_type_code, requester.gender)?;
        let pair = EdgePair::new(
            request.target_id,
            request.requester_id,
            request.proposed_type_code.as_str(),
            inverse,
            false,
        );

        let edge = self.store.accept_request(id, &pair, current_timestamp())?;
        info!(
            request = %id,
            from = %pair.a,
            to = %pair.b,
            code = %pair.code_a_to_b,
            inverse,
            "Relationship request accepted"
        );
        Ok(edge)
    }

    /// Reject a pending request without touching the graph
    pub fn reject(&self, id: RequestId) -> Result<RelationshipRequest> {
        let request = self.get(id)?;
        if !request.is_pending() {
            return Err(already_resolved(&request));
        }

        let rejected = self.store.reject_request(id, current_timestamp())?;
        info!(request = %id, "Relationship request rejected");
        Ok(rejected)
    }

    /// Get a request by ID
    pub fn get(&self, id: RequestId) -> Result<RelationshipRequest> {
        self.store
            .get_request(id)?
            .ok_or_else(|| KinshipError::NotFound(format!("request {}", id)))
    }

    /// Incoming pending requests for `target`
    pub fn pending_for(&self, target: PersonId) -> Result<Vec<RelationshipRequest>> {
        self.store.pending_requests_for(target)
    }

    /// The pending request from `requester` to `target`, if any
    pub fn pending_between(
        &self,
        requester: PersonId,
        target: PersonId,
    ) -> Result<Option<RelationshipRequest>> {
        self.store.pending_request_between(requester, target)
    }

    fn require_person(&self, id: PersonId) -> Result<Person> {
        let person = self.store.get_person(id)?;
        debug!(%id, found = person.is_some(), "Person lookup");
        person.ok_or_else(|| KinshipError::NotFound(format!("person {}", id)))
    }
}

fn already_resolved(request: &RelationshipRequest) -> KinshipError {
    KinshipError::AlreadyResolved(format!(
        "request {} is already {}",
        request.id,
        request.status.as_str()
    ))
}
