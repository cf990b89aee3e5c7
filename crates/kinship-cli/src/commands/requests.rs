//! Request command implementation.

use super::{parse_request_id, Services};
use crate::cli::{RequestAction, RequestArgs};
use crate::error::Result;
use crate::output::Formatter;
use kinship_domain::PersonId;

/// Execute the request command.
pub fn execute_request(args: RequestArgs, services: &Services, formatter: &Formatter) -> Result<()> {
    let workflow = services.suggestions.requests();

    match args.action {
        RequestAction::Create {
            requester,
            target,
            code,
            message,
        } => {
            let request = workflow.create(
                PersonId::new(requester),
                PersonId::new(target),
                &code,
                &message,
            )?;
            println!("{}", formatter.format_request(&request)?);
        }
        RequestAction::Accept { id } => {
            let edge = workflow.accept(parse_request_id(&id)?)?;
            services.regenerate_parties(&edge);
            println!("{}", formatter.format_edge(&edge)?);
        }
        RequestAction::Reject { id } => {
            let request = workflow.reject(parse_request_id(&id)?)?;
            println!("{}", formatter.format_request(&request)?);
        }
        RequestAction::List { person } => {
            let pending = workflow.pending_for(PersonId::new(person))?;
            println!("{}", formatter.format_requests(&pending)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::services;
    use crate::config::OutputFormat;
    use kinship_domain::traits::RelationshipGraphStore;
    use kinship_domain::RequestStatus;

    #[test]
    fn test_create_and_accept() {
        let services = services();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let create = RequestArgs {
            action: RequestAction::Create {
                requester: 3,
                target: 4,
                code: "sister".to_string(),
                message: String::new(),
            },
        };
        execute_request(create, &services, &formatter).unwrap();

        let workflow = services.suggestions.requests();
        let pending = workflow.pending_for(PersonId::new(4)).unwrap();
        assert_eq!(pending.len(), 1);
        let id = pending[0].id;

        let accept = RequestArgs {
            action: RequestAction::Accept { id: id.to_string() },
        };
        execute_request(accept, &services, &formatter).unwrap();

        assert_eq!(workflow.get(id).unwrap().status, RequestStatus::Accepted);
        let edge = services
            .store
            .edge_between(PersonId::new(3), PersonId::new(4))
            .unwrap()
            .unwrap();
        assert_eq!(edge.type_code, "brother");
    }

    #[test]
    fn test_reject() {
        let services = services();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let request = services
            .suggestions
            .requests()
            .create(PersonId::new(4), PersonId::new(1), "father", "")
            .unwrap();

        let reject = RequestArgs {
            action: RequestAction::Reject {
                id: request.id.to_string(),
            },
        };
        execute_request(reject, &services, &formatter).unwrap();
        assert!(services
            .store
            .edge_between(PersonId::new(1), PersonId::new(4))
            .unwrap()
            .is_none());
    }
}
