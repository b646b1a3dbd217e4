//! Show command implementation.

use super::EXIT_SUCCESS;
use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use catalogue_domain::traits::ModelStore;
use catalogue_domain::ModelId;
use catalogue_store::SqliteStore;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, store: &SqliteStore, formatter: &Formatter) -> Result<i32> {
    let record = match (args.id, &args.name) {
        (Some(id), _) => store
            .get(ModelId::from_value(id))?
            .ok_or_else(|| CliError::NotFound(format!("Model with ID {} not found", id)))?,
        (None, Some(name)) => store
            .find_by_name(name)?
            .ok_or_else(|| CliError::NotFound(format!("Model '{}' not found", name)))?,
        (None, None) => {
            return Err(CliError::InvalidInput(
                "Must specify a name or --id".to_string(),
            ))
        }
    };

    println!("{}", formatter.format_record(&record)?);
    Ok(EXIT_SUCCESS)
}
