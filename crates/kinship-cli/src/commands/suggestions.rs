//! Suggestion command implementations.

use super::{parse_suggestion_id, Services};
use crate::cli::{IdArg, PersonRef};
use crate::error::Result;
use crate::output::Formatter;
use kinship_domain::traits::PersonDirectory;
use kinship_domain::{KinshipError, PersonId};

/// Execute the suggest command: regenerate, then show.
pub fn execute_suggest(args: PersonRef, services: &Services, formatter: &Formatter) -> Result<()> {
    let subject = PersonId::new(args.person);
    if services.store.get_person(subject)?.is_none() {
        return Err(KinshipError::NotFound(format!("person {}", subject)).into());
    }
    let stored = services.suggestions.generate_for(subject)?;
    println!("{}", formatter.format_suggestions(&stored)?);
    Ok(())
}

/// Execute the suggestions command.
pub fn execute_suggestions(
    args: PersonRef,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let pending = services
        .suggestions
        .pending_for(PersonId::new(args.person))?;
    println!("{}", formatter.format_suggestions(&pending)?);
    Ok(())
}

/// Execute the accept-suggestion command.
pub fn execute_accept_suggestion(
    args: IdArg,
    services: &Services,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_suggestion_id(&args.id)?;
    let edge = services.suggestions.accept(id)?;
    services.regenerate_parties(&edge);
    println!("{}", formatter.format_edge(&edge)?);
    Ok(())
}

/// Execute the dismiss command.
pub fn execute_dismiss(args: IdArg, services: &Services, formatter: &Formatter) -> Result<()> {
    let id = parse_suggestion_id(&args.id)?;
    let dismissed = services.suggestions.dismiss(id)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Dismissed: {} as {}",
            dismissed.suggested_person_id, dismissed.suggested_type_code
        ))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::services;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use kinship_domain::traits::RelationshipGraphStore;
    use kinship_domain::{EdgePair, SuggestionStatus};

    fn family() -> Services {
        let services = services();
        services
            .store
            .put_pair(&EdgePair::new(PersonId::new(1), PersonId::new(2), "husband", "wife", false))
            .unwrap();
        services
            .store
            .put_pair(&EdgePair::new(PersonId::new(1), PersonId::new(3), "father", "son", false))
            .unwrap();
        services
    }

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    #[test]
    fn test_suggest_then_accept() {
        let services = family();
        execute_suggest(PersonRef { person: 2 }, &services, &quiet()).unwrap();
        execute_suggest(PersonRef { person: 3 }, &services, &quiet()).unwrap();

        let pending = services.suggestions.pending_for(PersonId::new(3)).unwrap();
        let id = pending[0].id;
        execute_accept_suggestion(IdArg { id: id.to_string() }, &services, &quiet()).unwrap();

        assert_eq!(
            services.suggestions.get(id).unwrap().status,
            SuggestionStatus::Accepted
        );
        let edge = services
            .store
            .edge_between(PersonId::new(2), PersonId::new(3))
            .unwrap()
            .unwrap();
        assert_eq!(edge.type_code, "mother");
        // Fatima's mirror suggestion was cleared by the follow-up regeneration
        assert!(services.suggestions.pending_for(PersonId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn test_dismiss() {
        let services = family();
        execute_suggest(PersonRef { person: 3 }, &services, &quiet()).unwrap();
        let id = services.suggestions.pending_for(PersonId::new(3)).unwrap()[0].id;

        execute_dismiss(IdArg { id: id.to_string() }, &services, &quiet()).unwrap();
        assert!(services.suggestions.pending_for(PersonId::new(3)).unwrap().is_empty());

        let again = execute_dismiss(IdArg { id: id.to_string() }, &services, &quiet());
        assert!(matches!(
            again,
            Err(CliError::Domain(KinshipError::AlreadyResolved(_)))
        ));
    }

    #[test]
    fn test_bad_inputs() {
        let services = family();
        assert!(matches!(
            execute_suggest(PersonRef { person: 99 }, &services, &quiet()),
            Err(CliError::Domain(KinshipError::NotFound(_)))
        ));
        assert!(matches!(
            execute_dismiss(IdArg { id: "nope".to_string() }, &services, &quiet()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
