//! Composition rule table
//!
//! Each rule is keyed by the families of two accepted edges:
//!
//! - `first`: the code on `subject -> connector` (subject's role toward connector)
//! - `second`: the code on `connector -> candidate` (connector's role toward candidate)
//!
//! and yields the candidate's role toward the subject. Rules are evaluated in
//! table order and the first match wins.

use kinship_domain::Family;

/// Confidence tier of a composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Parent, child, sibling and spouse chains
    Direct,
    /// Grandparents, aunts and uncles, cousins and in-laws
    Extended,
}

/// What a matching rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Emit a candidate in `family`
    Suggest {
        /// Resulting family (candidate's role toward subject)
        family: Family,
        /// Confidence tier
        tier: Tier,
    },
    /// Known composition that must never produce a candidate
    Suppress,
}

/// One row of the table
#[derive(Debug, Clone, Copy)]
pub struct CompositionRule {
    /// Family of `subject -> connector`
    pub first: Family,
    /// Family of `connector -> candidate`
    pub second: Family,
    /// Result
    pub outcome: Outcome,
    /// Candidate must also hold an accepted spouse edge toward the connector
    pub requires_spouse_link: bool,
}

const fn suggest(first: Family, second: Family, family: Family, tier: Tier) -> CompositionRule {
    CompositionRule {
        first,
        second,
        outcome: Outcome::Suggest { family, tier },
        requires_spouse_link: false,
    }
}

const fn suppress(first: Family, second: Family) -> CompositionRule {
    CompositionRule {
        first,
        second,
        outcome: Outcome::Suppress,
        requires_spouse_link: false,
    }
}

use Family::*;

/// The composition table, in evaluation order
pub static RULES: &[CompositionRule] = &[
    // Parent's spouse is the other parent
    suggest(Child, Spouse, Parent, Tier::Direct),
    // Parent's other child
    suggest(Child, Parent, Sibling, Tier::Direct),
    // Spouse's child
    suggest(Spouse, Parent, Child, Tier::Direct),
    // Child's spouse, confirmed from the spouse's side
    CompositionRule {
        first: Parent,
        second: Spouse,
        outcome: Outcome::Suggest {
            family: ChildInLaw,
            tier: Tier::Extended,
        },
        requires_spouse_link: true,
    },
    // Parent's sibling
    suggest(Child, Sibling, AuntUncle, Tier::Extended),
    // Sibling's parent is either a shared parent or unrelated
    suppress(Sibling, Child),
    // Parent's parent
    suggest(Child, Child, Grandparent, Tier::Extended),
    // Child's child
    suggest(Parent, Parent, Grandchild, Tier::Extended),
    // Sibling's spouse
    suggest(Sibling, Spouse, SiblingInLaw, Tier::Extended),
    // Spouse's sibling
    suggest(Spouse, Sibling, SiblingInLaw, Tier::Extended),
    // Parent's aunt or uncle is a great-generation chain
    suppress(Child, NephewNiece),
    // Aunt's or uncle's child
    suggest(NephewNiece, Parent, Cousin, Tier::Extended),
    // Sibling's sibling
    suggest(Sibling, Sibling, Sibling, Tier::Direct),
    // Sibling's child
    suggest(Sibling, Parent, NephewNiece, Tier::Extended),
    // Spouse's parent
    suggest(Spouse, Child, ParentInLaw, Tier::Extended),
    // Child's other parent is not necessarily a spouse
    suppress(Parent, Child),
];

/// First rule matching the two families
pub fn lookup(first: Family, second: Family) -> Option<&'static CompositionRule> {
    RULES
        .iter()
        .find(|rule| rule.first == first && rule.second == second)
}
