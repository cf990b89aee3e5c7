//! One-hop relationship deduction

use crate::confidence::ConfidencePolicy;
use crate::rules::{self, Outcome};
use kinship_domain::traits::{PersonDirectory, RelationshipGraphStore};
use kinship_domain::{
    Candidate, EdgeStatus, Family, Person, PersonId, RelationshipEdge, RelationshipTypeCatalog,
    Result,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A composed relationship before de-duplication
#[derive(Debug)]
struct Path {
    candidate: PersonId,
    code: &'static str,
    confidence: u8,
    reason: String,
    connector_name: String,
}

/// Person lookups memoized for one run
struct People<'a, S> {
    directory: &'a S,
    cache: HashMap<PersonId, Option<Person>>,
}

impl<'a, S: PersonDirectory> People<'a, S> {
    fn new(directory: &'a S) -> Self {
        Self {
            directory,
            cache: HashMap::new(),
        }
    }

    fn get(&mut self, id: PersonId) -> Result<Option<Person>> {
        if let Some(cached) = self.cache.get(&id) {
            return Ok(cached.clone());
        }
        let person = self.directory.get_person(id)?;
        self.cache.insert(id, person.clone());
        Ok(person)
    }

    fn name(&mut self, id: PersonId) -> Result<String> {
        Ok(self
            .get(id)?
            .map(|p| p.display_name)
            .unwrap_or_else(|| format!("person #{}", id)))
    }
}

fn humanize(code: &str) -> String {
    code.replace('_', " ")
}

/// Note describing the path that lost to `kept`
fn annotation(discarded: &Path, kept: &Path) -> String {
    if discarded.code == kept.code {
        format!("; corroborated via {}", discarded.connector_name)
    } else {
        format!(
            "; alternative {} via {} discarded",
            humanize(discarded.code),
            discarded.connector_name
        )
    }
}

/// Keep one path per candidate: higher confidence wins, ties keep the first
fn merge(found: &mut Vec<Path>, index: &mut HashMap<PersonId, usize>, path: Path) {
    let Some(&slot) = index.get(&path.candidate) else {
        index.insert(path.candidate, found.len());
        found.push(path);
        return;
    };

    let kept = &mut found[slot];
    if path.confidence > kept.confidence {
        let note = annotation(kept, &path);
        let mut winner = path;
        winner.reason.push_str(&note);
        *kept = winner;
    } else {
        let note = annotation(&path, kept);
        kept.reason.push_str(&note);
    }
}

/// Deduces relationships by composing two accepted edges through a connector
///
/// The engine is stateless: every call reads the graph afresh, so it can run
/// on any thread and concurrently for different subjects.
pub struct DeductionEngine<S> {
    store: Arc<S>,
    catalog: &'static RelationshipTypeCatalog,
    policy: ConfidencePolicy,
}

impl<S> DeductionEngine<S>
where
    S: RelationshipGraphStore + PersonDirectory,
{
    /// Create an engine with the standard catalog and default scores
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, ConfidencePolicy::default())
    }

    /// Create an engine with custom scores
    pub fn with_policy(store: Arc<S>, policy: ConfidencePolicy) -> Self {
        Self {
            store,
            catalog: RelationshipTypeCatalog::standard(),
            policy,
        }
    }

    /// The scoring policy in use
    pub fn policy(&self) -> &ConfidencePolicy {
        &self.policy
    }

    /// Deduce candidate relationships for `subject`
    ///
    /// Candidates never include the subject or anyone already linked to the
    /// subject by an accepted edge, and carry at most one code per person.
    /// Output is sorted by confidence (descending), then person id.
    ///
    /// Only store failures are returned as errors; a composition that cannot
    /// be completed is skipped and logged.
    pub fn generate_suggestions(&self, subject: PersonId) -> Result<Vec<Candidate>> {
        let direct = self.store.edges_of(subject, Some(EdgeStatus::Accepted))?;
        if direct.is_empty() {
            debug!(%subject, "No accepted edges, nothing to deduce");
            return Ok(Vec::new());
        }

        let linked: HashSet<PersonId> = direct
            .iter()
            .filter_map(|edge| edge.other_end(subject))
            .collect();

        let mut people = People::new(self.store.as_ref());
        let subject_name = people.name(subject)?;
        let mut found = Vec::new();
        let mut index = HashMap::new();

        for first in direct.iter().filter(|e| e.from_person_id == subject) {
            let connector = first.to_person_id;
            let Some(first_family) = self.catalog.family_of(&first.type_code) else {
                warn!(%subject, %connector, code = %first.type_code, "Skipping edge with unknown type code");
                continue;
            };
            let connector_name = people.name(connector)?;

            let onward = self.store.edges_of(connector, Some(EdgeStatus::Accepted))?;
            for second in onward.iter().filter(|e| e.from_person_id == connector) {
                let candidate = second.to_person_id;
                if candidate == subject || linked.contains(&candidate) {
                    continue;
                }

                if let Some(path) = self.compose(
                    &mut people,
                    &subject_name,
                    first,
                    first_family,
                    &connector_name,
                    second,
                )? {
                    merge(&mut found, &mut index, path);
                }
            }
        }

        let mut candidates: Vec<Candidate> = found
            .into_iter()
            .map(|path| Candidate {
                suggested_person_id: path.candidate,
                type_code: path.code.to_string(),
                reason: path.reason,
                confidence: path.confidence,
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then(a.suggested_person_id.cmp(&b.suggested_person_id))
        });

        debug!(%subject, count = candidates.len(), "Deduction complete");
        Ok(candidates)
    }

    /// Compose `subject -> connector` with `connector -> candidate`
    fn compose(
        &self,
        people: &mut People<'_, S>,
        subject_name: &str,
        first: &RelationshipEdge,
        first_family: Family,
        connector_name: &str,
        second: &RelationshipEdge,
    ) -> Result<Option<Path>> {
        let connector = second.from_person_id;
        let candidate = second.to_person_id;

        let Some(second_family) = self.catalog.family_of(&second.type_code) else {
            warn!(%connector, %candidate, code = %second.type_code, "Skipping edge with unknown type code");
            return Ok(None);
        };
        let Some(rule) = rules::lookup(first_family, second_family) else {
            trace!(first = first_family.as_str(), second = second_family.as_str(), "No composition rule");
            return Ok(None);
        };
        let (family, tier) = match rule.outcome {
            Outcome::Suggest { family, tier } => (family, tier),
            Outcome::Suppress => {
                trace!(first = first_family.as_str(), second = second_family.as_str(), "Composition suppressed");
                return Ok(None);
            }
        };

        if rule.requires_spouse_link && !self.is_spouse_of(candidate, connector)? {
            debug!(%candidate, %connector, "Spouse link not confirmed, skipping");
            return Ok(None);
        }

        let Some(person) = people.get(candidate)? else {
            warn!(%candidate, "Candidate has no person record, skipping");
            return Ok(None);
        };

        let gendered = self.catalog.gendered_variant(family, person.gender);
        let confidence = self.policy.score(tier, gendered.used_fallback);
        let reason = format!(
            "{} is the {} of {}, and {} is the {} of {}",
            subject_name,
            humanize(&first.type_code),
            connector_name,
            connector_name,
            humanize(&second.type_code),
            person.display_name,
        );

        trace!(%candidate, code = gendered.code, confidence, "Composed candidate");
        Ok(Some(Path {
            candidate,
            code: gendered.code,
            confidence,
            reason,
            connector_name: connector_name.to_string(),
        }))
    }

    /// Whether `a -> b` is an accepted spouse edge
    ///
    /// Holds for every spouse `b -> a` in a graph written through `put_pair`;
    /// only graphs holding one direction of a relationship can fail it.
    fn is_spouse_of(&self, a: PersonId, b: PersonId) -> Result<bool> {
        Ok(self
            .store
            .edge_between(a, b)?
            .and_then(|edge| self.catalog.family_of(&edge.type_code))
            == Some(Family::Spouse))
    }
}
