//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! The SQLite implementation lives in `kinship-store`; services in
//! `kinship-deduction` and `kinship-workflow` are generic over them.
//!
//! All methods take `&self`: implementations are shared across threads and
//! serialize writes internally.

use crate::{
    EdgePair, EdgeStatus, Person, PersonId, RelationshipEdge, RelationshipRequest, RequestId,
    Result, Suggestion, SuggestionId, SuggestionStatus,
};

/// Read access to person records owned by user management
pub trait PersonDirectory: Send + Sync {
    /// Get a person by ID
    fn get_person(&self, id: PersonId) -> Result<Option<Person>>;

    /// All known person IDs in ascending order
    fn person_ids(&self) -> Result<Vec<PersonId>>;
}

/// Storage of directed relationship edges
pub trait RelationshipGraphStore: Send + Sync {
    /// Edges where `person` is source or target, optionally filtered by status
    ///
    /// Ordered by `created_at`, then insertion id.
    fn edges_of(&self, person: PersonId, status: Option<EdgeStatus>) -> Result<Vec<RelationshipEdge>>;

    /// The accepted `a -> b` edge, if any
    fn edge_between(&self, a: PersonId, b: PersonId) -> Result<Option<RelationshipEdge>>;

    /// Write both directions of a relationship in one transaction
    ///
    /// Fails with `NotFound` for an unknown code, `InvalidType` when the codes
    /// are not mutual inverses and `Conflict` when an accepted edge in either
    /// direction carries a different code. An identical pair is a no-op.
    /// Returns the `a -> b` edge.
    fn put_pair(&self, pair: &EdgePair) -> Result<RelationshipEdge>;

    /// Mark both accepted directions between `a` and `b` as rejected
    fn revoke_pair(&self, a: PersonId, b: PersonId) -> Result<()>;
}

/// Storage of relationship requests
pub trait RequestRepository: Send + Sync {
    /// Insert a new pending request
    ///
    /// Fails with `Duplicate` if a pending request exists for the same ordered pair.
    fn insert_request(&self, request: &RelationshipRequest) -> Result<()>;

    /// Get a request by ID
    fn get_request(&self, id: RequestId) -> Result<Option<RelationshipRequest>>;

    /// The pending request from `requester` to `target`, if any
    fn pending_request_between(
        &self,
        requester: PersonId,
        target: PersonId,
    ) -> Result<Option<RelationshipRequest>>;

    /// Pending requests addressed to `target`, oldest first
    fn pending_requests_for(&self, target: PersonId) -> Result<Vec<RelationshipRequest>>;

    /// Write `pair` and mark the request accepted in one transaction
    ///
    /// Fails with `AlreadyResolved` if the request is no longer pending. Any
    /// error from writing the pair leaves both the request and the graph unchanged.
    fn accept_request(&self, id: RequestId, pair: &EdgePair, at: u64) -> Result<RelationshipEdge>;

    /// Mark a pending request rejected
    fn reject_request(&self, id: RequestId, at: u64) -> Result<RelationshipRequest>;
}

/// Storage of suggestions
pub trait SuggestionRepository: Send + Sync {
    /// Replace the pending suggestions of `subject` in one transaction
    ///
    /// Pending rows identical to a fresh suggestion are kept as they are.
    /// Suggestions for pairs that already have an accepted edge, or that were
    /// dismissed at or after `dismissal_cutoff`, are dropped. Returns the
    /// resulting pending set.
    fn replace_pending(
        &self,
        subject: PersonId,
        fresh: Vec<Suggestion>,
        dismissal_cutoff: u64,
    ) -> Result<Vec<Suggestion>>;

    /// Get a suggestion by ID
    fn get_suggestion(&self, id: SuggestionId) -> Result<Option<Suggestion>>;

    /// Pending suggestions of `subject`, highest confidence first
    fn pending_suggestions(&self, subject: PersonId) -> Result<Vec<Suggestion>>;

    /// Compare-and-set a suggestion's status
    ///
    /// Fails with `NotFound` for an unknown ID and `AlreadyResolved` when the
    /// current status is not `from`.
    fn transition_suggestion(
        &self,
        id: SuggestionId,
        from: SuggestionStatus,
        to: SuggestionStatus,
        resolved_at: Option<u64>,
    ) -> Result<Suggestion>;

    /// Return an accepted suggestion to pending in one transaction
    ///
    /// A pending row for the same pair, inserted by a regeneration while the
    /// suggestion was claimed, is removed first. Fails with `NotFound` for an
    /// unknown ID and `AlreadyResolved` when the suggestion is not accepted.
    fn release_suggestion(&self, id: SuggestionId) -> Result<Suggestion>;
}

/// Everything the services need from one backend
///
/// Blanket-implemented for any type providing all four storage traits.
pub trait KinshipStore:
    PersonDirectory + RelationshipGraphStore + RequestRepository + SuggestionRepository
{
}

impl<T> KinshipStore for T where
    T: PersonDirectory + RelationshipGraphStore + RequestRepository + SuggestionRepository
{
}
