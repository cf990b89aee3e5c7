//! Relationship requests - proposed edges awaiting a single decision

use crate::{PersonId, RequestId};
use serde::Serialize;

/// Lifecycle state of a request
///
/// `Pending` moves exactly once to `Accepted` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision
    Pending,
    /// Accepted; the edge pair exists
    Accepted,
    /// Rejected; no edge was written
    Rejected,
}

impl RequestStatus {
    /// Get the status name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored status
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "accepted" => Some(RequestStatus::Accepted),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    /// Whether no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A proposed relationship between two people
///
/// `proposed_type_code` reads "target is requester's `code`": a request from
/// Mohammed to Fatima with code `mother` asks Fatima to confirm she is his mother.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipRequest {
    /// Identifier
    pub id: RequestId,
    /// Person asking
    pub requester_id: PersonId,
    /// Person asked to confirm
    pub target_id: PersonId,
    /// Proposed code for the target
    pub proposed_type_code: String,
    /// Free-text message from the requester
    pub message: String,
    /// Current status
    pub status: RequestStatus,
    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,
    /// When the request was resolved
    pub responded_at: Option<u64>,
}

impl RelationshipRequest {
    /// Create a new pending request
    pub fn new(
        requester_id: PersonId,
        target_id: PersonId,
        proposed_type_code: impl Into<String>,
        message: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: RequestId::new(),
            requester_id,
            target_id,
            proposed_type_code: proposed_type_code.into(),
            message: message.into(),
            status: RequestStatus::Pending,
            created_at,
            responded_at: None,
        }
    }

    /// Whether the request still awaits a decision
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending() {
        let req = RelationshipRequest::new(PersonId::new(3), PersonId::new(2), "mother", "hi", 10);
        assert!(req.is_pending());
        assert!(req.responded_at.is_none());
        assert!(!req.status.is_terminal());
    }

    #[test]
    fn test_status_terminal() {
        assert!(RequestStatus::Accepted.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert_eq!(RequestStatus::parse("ACCEPTED"), Some(RequestStatus::Accepted));
    }
}
