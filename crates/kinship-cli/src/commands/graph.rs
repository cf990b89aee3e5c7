//! Direct graph commands: relate, revoke, relationships.

use super::Services;
use crate::cli::{PairArgs, RelateArgs, RelationshipsArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use kinship_domain::traits::{PersonDirectory, RelationshipGraphStore};
use kinship_domain::{EdgePair, EdgeStatus, KinshipError, PersonId, RelationshipTypeCatalog};

/// Execute the relate command.
///
/// Writes `a -> b` with `code` and `b -> a` with its inverse, gendered by `b`.
pub fn execute_relate(args: RelateArgs, services: &Services, formatter: &Formatter) -> Result<()> {
    let catalog = RelationshipTypeCatalog::standard();
    let (a, b) = (PersonId::new(args.a), PersonId::new(args.b));

    let code = catalog.require(&args.code)?.code;
    let other = services
        .store
        .get_person(b)?
        .ok_or_else(|| KinshipError::NotFound(format!("person {}", b)))?;
    if services.store.get_person(a)?.is_none() {
        return Err(KinshipError::NotFound(format!("person {}", a)).into());
    }
    let inverse = catalog.inverse_of(code, other.gender)?;

    let edge = services
        .store
        .put_pair(&EdgePair::new(a, b, code, inverse, false))?;
    services.regenerate_parties(&edge);

    println!(
        "{}",
        formatter.success(&format!("{} is {}'s {} ({} -> {}: {})", a, b, code, b, a, inverse))
    );
    Ok(())
}

/// Execute the revoke command.
pub fn execute_revoke(args: PairArgs, services: &Services, formatter: &Formatter) -> Result<()> {
    let (a, b) = (PersonId::new(args.a), PersonId::new(args.b));
    services.store.revoke_pair(a, b)?;
    services.regenerate_pair(a, b);
    println!("{}", formatter.success(&format!("Revoked relationship between {} and {}", a, b)));
    Ok(())
}

/// Execute the relationships command.
pub fn execute_relationships(
    args: RelationshipsArgs,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let status = match args.status.as_deref() {
        Some(raw) => Some(EdgeStatus::parse(raw).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "unknown status '{}', expected pending, accepted or rejected",
                raw
            ))
        })?),
        None => None,
    };
    let edges = services
        .store
        .edges_of(PersonId::new(args.person), status)?;
    println!("{}", formatter.format_edges(&edges)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::services;
    use crate::config::OutputFormat;
    use kinship_domain::traits::SuggestionRepository;

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    fn relate(services: &Services, a: u64, b: u64, code: &str) -> Result<()> {
        execute_relate(
            RelateArgs {
                a,
                b,
                code: code.to_string(),
            },
            services,
            &quiet(),
        )
    }

    #[test]
    fn test_relate_writes_gendered_inverse() {
        let services = services();
        relate(&services, 1, 3, "Father").unwrap();

        let store = &services.store;
        let forward = store.edge_between(PersonId::new(1), PersonId::new(3)).unwrap().unwrap();
        let backward = store.edge_between(PersonId::new(3), PersonId::new(1)).unwrap().unwrap();
        assert_eq!(forward.type_code, "father");
        assert_eq!(backward.type_code, "son");
    }

    #[test]
    fn test_relate_regenerates_suggestions() {
        let services = services();
        relate(&services, 1, 2, "husband").unwrap();
        relate(&services, 1, 3, "father").unwrap();

        let pending = services.store.pending_suggestions(PersonId::new(3)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].suggested_type_code, "mother");
    }

    #[test]
    fn test_relate_errors() {
        let services = services();
        assert!(matches!(
            relate(&services, 1, 3, "godfather"),
            Err(CliError::Domain(KinshipError::InvalidType(_)))
        ));
        assert!(matches!(
            relate(&services, 1, 99, "father"),
            Err(CliError::Domain(KinshipError::NotFound(_)))
        ));

        relate(&services, 1, 2, "husband").unwrap();
        assert!(matches!(
            relate(&services, 1, 2, "brother"),
            Err(CliError::Domain(KinshipError::Conflict { .. }))
        ));
    }

    #[test]
    fn test_revoke_and_filter() {
        let services = services();
        relate(&services, 1, 3, "father").unwrap();
        execute_revoke(PairArgs { a: 3, b: 1 }, &services, &quiet()).unwrap();

        assert!(services
            .store
            .edge_between(PersonId::new(1), PersonId::new(3))
            .unwrap()
            .is_none());

        let args = RelationshipsArgs {
            person: 1,
            status: Some("sideways".to_string()),
        };
        assert!(matches!(
            execute_relationships(args, &services, &quiet()),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_revoke_survives_regeneration_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinship.db");
        let services = Services::open(&path, kinship_regen::RegenConfig::default()).unwrap();
        for (id, name) in [(1, "Ahmed"), (3, "Mohammed")] {
            services
                .store
                .upsert_person(&kinship_domain::Person::new(
                    PersonId::new(id),
                    name,
                    kinship_domain::Gender::Male,
                ))
                .unwrap();
        }
        relate(&services, 1, 3, "father").unwrap();

        // Suggestions can no longer be written, edges still can
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE suggestions;")
            .unwrap();

        execute_revoke(PairArgs { a: 1, b: 3 }, &services, &quiet()).unwrap();
        assert!(services
            .store
            .edge_between(PersonId::new(1), PersonId::new(3))
            .unwrap()
            .is_none());
    }
}
