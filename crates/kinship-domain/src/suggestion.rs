//! Suggestions - system-deduced relationships awaiting review

use crate::{PersonId, SuggestionId};
use serde::Serialize;

/// Lifecycle state of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Awaiting review
    Pending,
    /// Accepted; the relationship was confirmed
    Accepted,
    /// Dismissed by the subject
    Dismissed,
}

impl SuggestionStatus {
    /// Get the status name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Accepted => "accepted",
            SuggestionStatus::Dismissed => "dismissed",
        }
    }

    /// Parse a stored status
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(SuggestionStatus::Pending),
            "accepted" => Some(SuggestionStatus::Accepted),
            "dismissed" => Some(SuggestionStatus::Dismissed),
            _ => None,
        }
    }
}

/// A deduced relationship produced by the engine, before persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Person the relationship points at
    pub suggested_person_id: PersonId,
    /// Code for the suggested person ("suggested is subject's `code`")
    pub type_code: String,
    /// Human-readable derivation trace
    pub reason: String,
    /// Confidence score in [0, 100]
    pub confidence: u8,
}

/// A persisted suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Identifier
    pub id: SuggestionId,
    /// Person the suggestion was generated for
    pub subject_person_id: PersonId,
    /// Person the relationship points at
    pub suggested_person_id: PersonId,
    /// Code for the suggested person
    pub suggested_type_code: String,
    /// Human-readable derivation trace
    pub reason: String,
    /// Confidence score in [0, 100]
    pub confidence_score: u8,
    /// Current status
    pub status: SuggestionStatus,
    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,
    /// When the suggestion was accepted or dismissed
    pub resolved_at: Option<u64>,
}

impl Suggestion {
    /// Build a pending suggestion from engine output
    pub fn from_candidate(subject: PersonId, candidate: Candidate, created_at: u64) -> Self {
        Self {
            id: SuggestionId::new(),
            subject_person_id: subject,
            suggested_person_id: candidate.suggested_person_id,
            suggested_type_code: candidate.type_code,
            reason: candidate.reason,
            confidence_score: candidate.confidence,
            status: SuggestionStatus::Pending,
            created_at,
            resolved_at: None,
        }
    }

    /// Whether the suggestion still awaits review
    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::Pending
    }

    /// Whether this suggestion carries the same content as a fresh candidate
    pub fn matches_candidate(&self, candidate: &Candidate) -> bool {
        self.suggested_person_id == candidate.suggested_person_id
            && self.suggested_type_code == candidate.type_code
            && self.confidence_score == candidate.confidence
            && self.reason == candidate.reason
    }
}
