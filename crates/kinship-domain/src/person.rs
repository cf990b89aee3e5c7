//! Person module - the externally owned people the graph connects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a person, assigned by the user-management layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(u64);

impl PersonId {
    /// Wrap a raw identifier
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw identifier
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Known gender of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Not recorded
    #[default]
    Unknown,
}

impl Gender {
    /// Get the gender name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }

    /// Parse a stored gender value
    ///
    /// Accepts `male`/`m` and `female`/`f` in any case. Anything else is
    /// `Unknown`; no heuristics are applied.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// The slice of a person record the engine reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Identifier
    pub id: PersonId,
    /// Display name, used in suggestion reasons
    pub display_name: String,
    /// Gender, used to pick gendered relationship codes
    pub gender: Gender,
}

impl Person {
    /// Create a new person record
    pub fn new(id: PersonId, display_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            gender,
        }
    }
}
