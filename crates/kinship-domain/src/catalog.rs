//! Relationship type catalog
//!
//! A closed set of semantic [`Family`] values, each with a male, female and
//! neutral code, plus the inverse mapping between families. The catalog is
//! built once from a fixed definition list and is read-only afterwards.
//!
//! ## Gender fallback
//!
//! When the person a code describes has an unknown gender, the family-neutral
//! code is used (`parent`, `aunt_or_uncle`, ...) and [`GenderedCode::used_fallback`]
//! is set. Families without gendered variants (`cousin`) never fall back.

use crate::person::Gender;
use crate::{KinshipError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Semantic relationship family, independent of gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// father / mother
    Parent,
    /// son / daughter
    Child,
    /// brother / sister
    Sibling,
    /// husband / wife
    Spouse,
    /// grandfather / grandmother
    Grandparent,
    /// grandson / granddaughter
    Grandchild,
    /// uncle / aunt
    AuntUncle,
    /// nephew / niece
    NephewNiece,
    /// cousin
    Cousin,
    /// father-in-law / mother-in-law
    ParentInLaw,
    /// son-in-law / daughter-in-law
    ChildInLaw,
    /// brother-in-law / sister-in-law
    SiblingInLaw,
    /// adoptive father / adoptive mother
    AdoptiveParent,
    /// adopted son / adopted daughter
    AdoptedChild,
}

impl Family {
    /// Every family, in catalog order
    pub const ALL: [Family; 14] = [
        Family::Parent,
        Family::Child,
        Family::Sibling,
        Family::Spouse,
        Family::Grandparent,
        Family::Grandchild,
        Family::AuntUncle,
        Family::NephewNiece,
        Family::Cousin,
        Family::ParentInLaw,
        Family::ChildInLaw,
        Family::SiblingInLaw,
        Family::AdoptiveParent,
        Family::AdoptedChild,
    ];

    /// The family describing the relationship from the other side
    pub fn inverse(self) -> Family {
        match self {
            Family::Parent => Family::Child,
            Family::Child => Family::Parent,
            Family::Sibling => Family::Sibling,
            Family::Spouse => Family::Spouse,
            Family::Grandparent => Family::Grandchild,
            Family::Grandchild => Family::Grandparent,
            Family::AuntUncle => Family::NephewNiece,
            Family::NephewNiece => Family::AuntUncle,
            Family::Cousin => Family::Cousin,
            Family::ParentInLaw => Family::ChildInLaw,
            Family::ChildInLaw => Family::ParentInLaw,
            Family::SiblingInLaw => Family::SiblingInLaw,
            Family::AdoptiveParent => Family::AdoptedChild,
            Family::AdoptedChild => Family::AdoptiveParent,
        }
    }

    /// Whether the family is its own inverse
    pub fn is_self_inverse(self) -> bool {
        self.inverse() == self
    }

    /// Catalog category
    pub fn category(self) -> Category {
        match self {
            Family::Parent | Family::Child | Family::Sibling => Category::Direct,
            Family::Spouse | Family::ParentInLaw | Family::ChildInLaw | Family::SiblingInLaw => {
                Category::Marriage
            }
            Family::Grandparent
            | Family::Grandchild
            | Family::AuntUncle
            | Family::NephewNiece
            | Family::Cousin => Category::Extended,
            Family::AdoptiveParent | Family::AdoptedChild => Category::Adoption,
        }
    }

    /// Generation of the described person relative to the other
    /// (-2 grandparent ... +2 grandchild)
    pub fn generation_offset(self) -> i8 {
        match self {
            Family::Grandparent => -2,
            Family::Parent | Family::AuntUncle | Family::ParentInLaw | Family::AdoptiveParent => -1,
            Family::Sibling | Family::Spouse | Family::Cousin | Family::SiblingInLaw => 0,
            Family::Child | Family::NephewNiece | Family::ChildInLaw | Family::AdoptedChild => 1,
            Family::Grandchild => 2,
        }
    }

    /// Family name as used in logs and reasons
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Parent => "parent",
            Family::Child => "child",
            Family::Sibling => "sibling",
            Family::Spouse => "spouse",
            Family::Grandparent => "grandparent",
            Family::Grandchild => "grandchild",
            Family::AuntUncle => "aunt_uncle",
            Family::NephewNiece => "nephew_niece",
            Family::Cousin => "cousin",
            Family::ParentInLaw => "parent_in_law",
            Family::ChildInLaw => "child_in_law",
            Family::SiblingInLaw => "sibling_in_law",
            Family::AdoptiveParent => "adoptive_parent",
            Family::AdoptedChild => "adopted_child",
        }
    }

    /// (male, female, neutral) codes
    fn codes(self) -> (Option<&'static str>, Option<&'static str>, &'static str) {
        match self {
            Family::Parent => (Some("father"), Some("mother"), "parent"),
            Family::Child => (Some("son"), Some("daughter"), "child"),
            Family::Sibling => (Some("brother"), Some("sister"), "sibling"),
            Family::Spouse => (Some("husband"), Some("wife"), "spouse"),
            Family::Grandparent => (Some("grandfather"), Some("grandmother"), "grandparent"),
            Family::Grandchild => (Some("grandson"), Some("granddaughter"), "grandchild"),
            Family::AuntUncle => (Some("uncle"), Some("aunt"), "aunt_or_uncle"),
            Family::NephewNiece => (Some("nephew"), Some("niece"), "nephew_or_niece"),
            Family::Cousin => (None, None, "cousin"),
            Family::ParentInLaw => (Some("father_in_law"), Some("mother_in_law"), "parent_in_law"),
            Family::ChildInLaw => (Some("son_in_law"), Some("daughter_in_law"), "child_in_law"),
            Family::SiblingInLaw => (Some("brother_in_law"), Some("sister_in_law"), "sibling_in_law"),
            Family::AdoptiveParent => (Some("adoptive_father"), Some("adoptive_mother"), "adoptive_parent"),
            Family::AdoptedChild => (Some("adopted_son"), Some("adopted_daughter"), "adopted_child"),
        }
    }

    /// The family-neutral code
    pub fn neutral_code(self) -> &'static str {
        self.codes().2
    }

    /// Whether the family distinguishes male and female codes
    pub fn has_gendered_variants(self) -> bool {
        let (male, female, _) = self.codes();
        male.is_some() && female.is_some()
    }
}

/// Catalog category of a relationship type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Blood relationships one generation apart or siblings
    Direct,
    /// Spouse and in-law relationships
    Marriage,
    /// Grandparents, aunts/uncles, cousins and their inverses
    Extended,
    /// Adoptive relationships
    Adoption,
}

/// Gender carried by a relationship code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionGender {
    /// Male variant, e.g. `father`
    Male,
    /// Female variant, e.g. `mother`
    Female,
    /// Gender-neutral code, e.g. `parent`
    Neutral,
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipTypeDefinition {
    /// Unique code, e.g. `father`
    pub code: &'static str,
    /// Gender the code carries
    pub gender: DefinitionGender,
    /// Semantic family
    pub family: Family,
    /// Catalog category
    pub category: Category,
    /// Generation offset of the described person
    pub generation_offset: i8,
    /// Neutral code of the inverse family (gendered at use time)
    pub inverse_code: &'static str,
}

/// Result of resolving a family to a code for a given gender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenderedCode {
    /// Resolved code
    pub code: &'static str,
    /// True when the neutral code was used because the gender is unknown
    pub used_fallback: bool,
}

/// Registry of relationship types
#[derive(Debug)]
pub struct RelationshipTypeCatalog {
    definitions: Vec<RelationshipTypeDefinition>,
    by_code: HashMap<&'static str, usize>,
}

impl RelationshipTypeCatalog {
    /// Build a catalog from the fixed family table
    pub fn new() -> Self {
        let mut definitions = Vec::with_capacity(Family::ALL.len() * 3);

        for family in Family::ALL {
            let (male, female, neutral) = family.codes();
            let inverse_code = family.inverse().neutral_code();
            let variants = [
                (male, DefinitionGender::Male),
                (female, DefinitionGender::Female),
                (Some(neutral), DefinitionGender::Neutral),
            ];
            for (code, gender) in variants {
                if let Some(code) = code {
                    definitions.push(RelationshipTypeDefinition {
                        code,
                        gender,
                        family,
                        category: family.category(),
                        generation_offset: family.generation_offset(),
                        inverse_code,
                    });
                }
            }
        }

        let by_code = definitions
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.code, idx))
            .collect();

        Self { definitions, by_code }
    }

    /// The process-wide catalog, built on first use
    pub fn standard() -> &'static RelationshipTypeCatalog {
        static CATALOG: OnceLock<RelationshipTypeCatalog> = OnceLock::new();
        CATALOG.get_or_init(RelationshipTypeCatalog::new)
    }

    /// Look up a definition by code
    ///
    /// Lookup is case-insensitive and treats `-` and spaces as `_`, so
    /// `Son-In-Law` resolves to `son_in_law`.
    pub fn get(&self, code: &str) -> Option<&RelationshipTypeDefinition> {
        if let Some(&idx) = self.by_code.get(code) {
            return Some(&self.definitions[idx]);
        }
        let normalized = normalize_code(code);
        self.by_code
            .get(normalized.as_str())
            .map(|&idx| &self.definitions[idx])
    }

    /// Look up a definition, failing with `InvalidType` for unknown codes
    pub fn require(&self, code: &str) -> Result<&RelationshipTypeDefinition> {
        self.get(code)
            .ok_or_else(|| KinshipError::InvalidType(code.to_string()))
    }

    /// Family of a code, if known
    pub fn family_of(&self, code: &str) -> Option<Family> {
        self.get(code).map(|def| def.family)
    }

    /// Whether the code exists in the catalog
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Code describing the relationship from the other side
    ///
    /// `target_gender` is the gender of the person the inverse code
    /// describes. `inverse_of("father", Female)` is `daughter`.
    pub fn inverse_of(&self, code: &str, target_gender: Gender) -> Result<&'static str> {
        let def = self.require(code)?;
        Ok(self.gendered_variant(def.family.inverse(), target_gender).code)
    }

    /// Whether two codes describe the same relationship from opposite sides
    pub fn are_inverses(&self, code_a: &str, code_b: &str) -> bool {
        match (self.family_of(code_a), self.family_of(code_b)) {
            (Some(a), Some(b)) => a.inverse() == b,
            _ => false,
        }
    }

    /// Gendered code for a family
    pub fn gendered_variant(&self, family: Family, gender: Gender) -> GenderedCode {
        let (male, female, neutral) = family.codes();
        let picked = match gender {
            Gender::Male => male,
            Gender::Female => female,
            Gender::Unknown => None,
        };

        match picked {
            Some(code) => GenderedCode {
                code,
                used_fallback: false,
            },
            None => GenderedCode {
                code: neutral,
                used_fallback: family.has_gendered_variants(),
            },
        }
    }

    /// All definitions in catalog order
    pub fn definitions(&self) -> impl Iterator<Item = &RelationshipTypeDefinition> {
        self.definitions.iter()
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for RelationshipTypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}
