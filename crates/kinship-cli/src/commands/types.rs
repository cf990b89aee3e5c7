//! Types command implementation.

use crate::error::Result;
use crate::output::Formatter;
use kinship_domain::RelationshipTypeCatalog;

/// Execute the types command.
pub fn execute_types(formatter: &Formatter) -> Result<()> {
    let types: Vec<_> = RelationshipTypeCatalog::standard()
        .definitions()
        .cloned()
        .collect();
    println!("{}", formatter.format_types(&types)?);
    Ok(())
}
