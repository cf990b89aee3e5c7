//! Person command implementation.

use super::Services;
use crate::cli::{PersonAction, PersonArgs};
use crate::error::Result;
use crate::output::Formatter;
use kinship_domain::{Person, PersonId};

/// Execute the person command.
pub fn execute_person(args: PersonArgs, services: &Services, formatter: &Formatter) -> Result<()> {
    match args.action {
        PersonAction::Add { id, name, gender } => {
            let person = Person::new(PersonId::new(id), name, gender.into());
            services.store.upsert_person(&person)?;
            println!(
                "{}",
                formatter.success(&format!("Saved person {} ({})", person.id, person.display_name))
            );
        }
        PersonAction::List => {
            let people = services.store.list_people()?;
            println!("{}", formatter.format_people(&people)?);
        }
    }
    Ok(())
}
