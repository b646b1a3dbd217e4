//! Extract command implementation.

use super::EXIT_SUCCESS;
use crate::cli::{ExtractArgs, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use catalogue_domain::traits::ModelStore;
use catalogue_extractor::{ExtractionRequest, Extractor, PipelineOutcome};
use std::fs;
use std::io::{self, Read};
use tracing::debug;

/// Execute the extract command.
///
/// Returns the process exit code: success, or the exit code of the
/// rejection's error kind.
pub async fn execute_extract<S: ModelStore>(
    args: ExtractArgs,
    extractor: &Extractor<S>,
    formatter: &Formatter,
) -> Result<i32> {
    let text = read_input(&args, io::stdin())?;
    debug!("Read {} bytes of input", text.len());

    match extractor.extract(&ExtractionRequest::new(text)).await {
        PipelineOutcome::Created { record, provenance } => {
            println!("{}", formatter.format_created(&record, &provenance)?);
            Ok(EXIT_SUCCESS)
        }
        PipelineOutcome::Rejected(rejection) => {
            let output = formatter.format_rejection(&rejection)?;
            match formatter.format() {
                OutputFormat::Json => println!("{}", output),
                OutputFormat::Text => eprintln!("{}", output),
            }
            Ok(rejection.kind.exit_code())
        }
    }
}

/// Resolve the input text from the argument, a file or stdin.
fn read_input<R: Read>(args: &ExtractArgs, mut stdin: R) -> Result<String> {
    if args.stdin {
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(file_path) = &args.file {
        Ok(fs::read_to_string(file_path)?)
    } else if let Some(text) = &args.text {
        Ok(text.clone())
    } else {
        Err(CliError::InvalidInput(
            "Must specify text, --file or --stdin".to_string(),
        ))
    }
}
