//! End-to-end deduction tests over a SQLite-backed graph

use kinship_deduction::DeductionEngine;
use kinship_domain::traits::RelationshipGraphStore;
use kinship_domain::{Candidate, EdgePair, Gender, Person, PersonId};
use kinship_store::SqliteStore;
use std::sync::Arc;

const AHMED: PersonId = PersonId::new(1);
const FATIMA: PersonId = PersonId::new(2);
const MOHAMMED: PersonId = PersonId::new(3);
const AMINA: PersonId = PersonId::new(4);
const YOUSSEF: PersonId = PersonId::new(5);
const OMAR: PersonId = PersonId::new(6);
const KHADIJA: PersonId = PersonId::new(7);
const KARIM: PersonId = PersonId::new(8);
const LAYLA: PersonId = PersonId::new(9);
const SAMI: PersonId = PersonId::new(10);

fn store() -> Arc<SqliteStore> {
    let store = SqliteStore::new(":memory:").unwrap();
    for (id, name, gender) in [
        (AHMED, "Ahmed", Gender::Male),
        (FATIMA, "Fatima", Gender::Female),
        (MOHAMMED, "Mohammed", Gender::Male),
        (AMINA, "Amina", Gender::Female),
        (YOUSSEF, "Youssef", Gender::Male),
        (OMAR, "Omar", Gender::Male),
        (KHADIJA, "Khadija", Gender::Female),
        (KARIM, "Karim", Gender::Male),
        (LAYLA, "Layla", Gender::Female),
        (SAMI, "Sami", Gender::Unknown),
    ] {
        store.upsert_person(&Person::new(id, name, gender)).unwrap();
    }
    Arc::new(store)
}

fn relate(store: &SqliteStore, a: PersonId, b: PersonId, a_is: &str, b_is: &str) {
    store.put_pair(&EdgePair::new(a, b, a_is, b_is, false)).unwrap();
}

/// Ahmed and Fatima married, Ahmed father of Mohammed
fn scenario_one() -> Arc<SqliteStore> {
    let store = store();
    relate(&store, AHMED, FATIMA, "husband", "wife");
    relate(&store, AHMED, MOHAMMED, "father", "son");
    store
}

/// Scenario one plus Amina and Youssef as Ahmed's children
fn scenario_three() -> Arc<SqliteStore> {
    let store = scenario_one();
    relate(&store, AHMED, AMINA, "father", "daughter");
    relate(&store, AHMED, YOUSSEF, "father", "son");
    store
}

fn summary(candidates: &[Candidate]) -> Vec<(PersonId, &str, u8)> {
    candidates
        .iter()
        .map(|c| (c.suggested_person_id, c.type_code.as_str(), c.confidence))
        .collect()
}

#[test]
fn test_father_spouse_gives_mother() {
    let engine = DeductionEngine::new(scenario_one());
    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();

    assert_eq!(summary(&candidates), vec![(FATIMA, "mother", 90)]);
    assert_eq!(
        candidates[0].reason,
        "Mohammed is the son of Ahmed, and Ahmed is the husband of Fatima"
    );
}

#[test]
fn test_sister_added_and_confirmed_parent_skipped() {
    let store = scenario_one();
    relate(&store, AHMED, AMINA, "father", "daughter");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(
        summary(&candidates),
        vec![(FATIMA, "mother", 90), (AMINA, "sister", 90)]
    );
    assert!(candidates.iter().all(|c| c.suggested_person_id != AHMED));
}

#[test]
fn test_siblings_for_daughter() {
    let engine = DeductionEngine::new(scenario_three());
    let candidates = engine.generate_suggestions(AMINA).unwrap();

    assert_eq!(
        summary(&candidates),
        vec![
            (FATIMA, "mother", 90),
            (MOHAMMED, "brother", 90),
            (YOUSSEF, "brother", 90),
        ]
    );
}

#[test]
fn test_spouse_children_become_children() {
    let engine = DeductionEngine::new(scenario_three());
    let candidates = engine.generate_suggestions(FATIMA).unwrap();

    assert_eq!(
        summary(&candidates),
        vec![
            (MOHAMMED, "son", 90),
            (AMINA, "daughter", 90),
            (YOUSSEF, "son", 90),
        ]
    );
}

#[test]
fn test_zero_edges_yields_nothing() {
    let engine = DeductionEngine::new(store());
    assert!(engine.generate_suggestions(OMAR).unwrap().is_empty());
}

#[test]
fn test_never_suggests_subject_or_linked() {
    let store = scenario_three();
    relate(&store, FATIMA, MOHAMMED, "mother", "son");
    let engine = DeductionEngine::new(store);

    for subject in [AHMED, FATIMA, MOHAMMED, AMINA, YOUSSEF] {
        for candidate in engine.generate_suggestions(subject).unwrap() {
            assert_ne!(candidate.suggested_person_id, subject);
        }
    }
    let for_mohammed = engine.generate_suggestions(MOHAMMED).unwrap();
    assert!(for_mohammed.iter().all(|c| c.suggested_person_id != FATIMA));
}

#[test]
fn test_deterministic_output() {
    let engine = DeductionEngine::new(scenario_three());
    let first = engine.generate_suggestions(AMINA).unwrap();
    let second = engine.generate_suggestions(AMINA).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_grandparent_and_aunt() {
    let store = scenario_one();
    relate(&store, OMAR, AHMED, "father", "son");
    relate(&store, AHMED, KHADIJA, "brother", "sister");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(
        summary(&candidates),
        vec![
            (FATIMA, "mother", 90),
            (OMAR, "grandfather", 70),
            (KHADIJA, "aunt", 70),
        ]
    );
}

#[test]
fn test_grandchild_and_nephew() {
    let store = scenario_one();
    relate(&store, OMAR, AHMED, "father", "son");
    relate(&store, AHMED, KHADIJA, "brother", "sister");

    let engine = DeductionEngine::new(store);
    // Omar: son's confirmed wife, son's son
    assert_eq!(
        summary(&engine.generate_suggestions(OMAR).unwrap()),
        vec![(FATIMA, "daughter_in_law", 70), (MOHAMMED, "grandson", 70)]
    );
    // Khadija: sibling's spouse, sibling's child, sibling's parent
    assert_eq!(
        summary(&engine.generate_suggestions(KHADIJA).unwrap()),
        vec![(FATIMA, "sister_in_law", 70), (MOHAMMED, "nephew", 70)]
    );
}

#[test]
fn test_cousin() {
    let store = store();
    relate(&store, KHADIJA, MOHAMMED, "aunt", "nephew");
    relate(&store, KHADIJA, KARIM, "mother", "son");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(summary(&candidates), vec![(KARIM, "cousin", 70)]);
}

#[test]
fn test_in_laws() {
    let store = scenario_three();
    relate(&store, FATIMA, MOHAMMED, "mother", "son");
    relate(&store, MOHAMMED, AMINA, "brother", "sister");
    relate(&store, MOHAMMED, LAYLA, "husband", "wife");
    let engine = DeductionEngine::new(store);

    let for_ahmed = engine.generate_suggestions(AHMED).unwrap();
    assert!(summary(&for_ahmed).contains(&(LAYLA, "daughter_in_law", 70)));

    let for_layla = engine.generate_suggestions(LAYLA).unwrap();
    assert_eq!(
        summary(&for_layla),
        vec![
            (AHMED, "father_in_law", 70),
            (FATIMA, "mother_in_law", 70),
            (AMINA, "sister_in_law", 70),
        ]
    );
}

#[test]
fn test_co_parent_is_not_suggested() {
    let store = store();
    relate(&store, AHMED, MOHAMMED, "father", "son");
    relate(&store, FATIMA, MOHAMMED, "mother", "son");
    let engine = DeductionEngine::new(store);

    assert!(engine.generate_suggestions(AHMED).unwrap().is_empty());
    assert!(engine.generate_suggestions(FATIMA).unwrap().is_empty());
    // The child still sees nothing new: both parents are linked already
    assert!(engine.generate_suggestions(MOHAMMED).unwrap().is_empty());
}

#[test]
fn test_unknown_gender_falls_back() {
    let store = scenario_one();
    relate(&store, AHMED, SAMI, "father", "child");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(
        summary(&candidates),
        vec![(FATIMA, "mother", 90), (SAMI, "sibling", 75)]
    );
}

#[test]
fn test_missing_candidate_record_is_skipped() {
    let store = scenario_one();
    let ghost = PersonId::new(99);
    relate(&store, AHMED, ghost, "father", "son");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(summary(&candidates), vec![(FATIMA, "mother", 90)]);
}

#[test]
fn test_second_path_corroborates() {
    let store = store();
    relate(&store, AMINA, AHMED, "daughter", "father");
    relate(&store, AMINA, FATIMA, "daughter", "mother");
    relate(&store, AHMED, MOHAMMED, "father", "son");
    relate(&store, FATIMA, MOHAMMED, "mother", "son");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(AMINA).unwrap();
    assert_eq!(summary(&candidates), vec![(MOHAMMED, "brother", 90)]);
    assert_eq!(
        candidates[0].reason,
        "Amina is the daughter of Ahmed, and Ahmed is the father of Mohammed; corroborated via Fatima"
    );
}

#[test]
fn test_higher_confidence_path_wins() {
    // Khadija is Mohammed's aunt via Ahmed (70) and his sister via Fatima (90)
    let store = store();
    relate(&store, MOHAMMED, AHMED, "son", "father");
    relate(&store, MOHAMMED, FATIMA, "son", "mother");
    relate(&store, AHMED, KHADIJA, "brother", "sister");
    relate(&store, FATIMA, KHADIJA, "mother", "daughter");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(summary(&candidates), vec![(KHADIJA, "sister", 90)]);
    assert!(candidates[0]
        .reason
        .ends_with("; alternative aunt via Ahmed discarded"));
}

#[test]
fn test_parent_as_nephew_is_not_composed() {
    // Omar is Ahmed's uncle, which would make him Mohammed's great-uncle
    let store = store();
    relate(&store, MOHAMMED, AHMED, "son", "father");
    relate(&store, AHMED, OMAR, "nephew", "uncle");
    let engine = DeductionEngine::new(store);

    assert!(engine.generate_suggestions(MOHAMMED).unwrap().is_empty());
}

#[test]
fn test_equal_confidence_keeps_first_path() {
    // Khadija is Mohammed's aunt via Ahmed and his sister-in-law via Layla, both 70
    let store = store();
    relate(&store, MOHAMMED, AHMED, "son", "father");
    relate(&store, MOHAMMED, LAYLA, "husband", "wife");
    relate(&store, AHMED, KHADIJA, "brother", "sister");
    relate(&store, LAYLA, KHADIJA, "sister", "sister");
    let engine = DeductionEngine::new(store);

    let candidates = engine.generate_suggestions(MOHAMMED).unwrap();
    assert_eq!(summary(&candidates), vec![(KHADIJA, "aunt", 70)]);
    assert!(candidates[0]
        .reason
        .starts_with("Mohammed is the son of Ahmed, and Ahmed is the brother of Khadija"));
    assert!(candidates[0]
        .reason
        .ends_with("; alternative sister in law via Layla discarded"));
}
