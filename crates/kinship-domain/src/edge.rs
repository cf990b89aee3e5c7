//! Relationship edges - directed, typed links between people
//!
//! An edge `(A -> B, code)` reads "A is B's `code`": `Ahmed -> Mohammed (father)`
//! is stored together with `Mohammed -> Ahmed (son)`.

use crate::PersonId;
use serde::Serialize;

/// Status of a stored edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    /// Imported or proposed, not yet confirmed
    Pending,
    /// Confirmed by both sides (or trusted seeding)
    Accepted,
    /// Declined or revoked
    Rejected,
}

impl EdgeStatus {
    /// Get the status name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStatus::Pending => "pending",
            EdgeStatus::Accepted => "accepted",
            EdgeStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored status
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(EdgeStatus::Pending),
            "accepted" => Some(EdgeStatus::Accepted),
            "rejected" => Some(EdgeStatus::Rejected),
            _ => None,
        }
    }
}

/// A directed typed edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipEdge {
    /// Store-assigned sequence number (insertion order)
    pub id: i64,
    /// Person the code describes
    pub from_person_id: PersonId,
    /// Person the code is relative to
    pub to_person_id: PersonId,
    /// Catalog code
    pub type_code: String,
    /// Current status
    pub status: EdgeStatus,
    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,
    /// When the edge became accepted
    pub accepted_at: Option<u64>,
    /// Written by the engine rather than by a person
    pub created_automatically: bool,
}

impl RelationshipEdge {
    /// Whether the edge is accepted
    pub fn is_accepted(&self) -> bool {
        self.status == EdgeStatus::Accepted
    }

    /// The endpoint that is not `person`, if `person` is on this edge
    pub fn other_end(&self, person: PersonId) -> Option<PersonId> {
        if self.from_person_id == person {
            Some(self.to_person_id)
        } else if self.to_person_id == person {
            Some(self.from_person_id)
        } else {
            None
        }
    }
}

/// Both directions of a relationship, written together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgePair {
    /// First person
    pub a: PersonId,
    /// Second person
    pub b: PersonId,
    /// Code stored on `a -> b` ("a is b's ...")
    pub code_a_to_b: String,
    /// Code stored on `b -> a` ("b is a's ...")
    pub code_b_to_a: String,
    /// Written by the engine rather than by a person
    pub automatic: bool,
}

impl EdgePair {
    /// Create a pair
    pub fn new(
        a: PersonId,
        b: PersonId,
        code_a_to_b: impl Into<String>,
        code_b_to_a: impl Into<String>,
        automatic: bool,
    ) -> Self {
        Self {
            a,
            b,
            code_a_to_b: code_a_to_b.into(),
            code_b_to_a: code_b_to_a.into(),
            automatic,
        }
    }
}
