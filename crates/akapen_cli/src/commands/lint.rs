//! Lint command implementation

use std::path::Path;

use akapen_core::{Configuration, DocumentCollection, DocumentFormat, Linter};
use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::cli::Cli;
use crate::output::output_results;

/// Lints the inputs and prints the errors.
///
/// Returns `true` when the number of errors exceeds the limit or a file
/// could not be linted.
pub fn run_lint(cli: &Cli) -> Result<bool> {
    let mut config = load_config(cli)?;
    if cli.timings {
        config.timings = true;
    }
    let timings_enabled = config.timings;

    let linter = Linter::new(config).into_diagnostic()?;

    let (documents, failures) = match &cli.sentence {
        Some(text) => {
            let format = cli.format.unwrap_or(DocumentFormat::Plain);
            let document = linter.parse_source(text, format, None).into_diagnostic()?;
            (DocumentCollection::from(vec![document]), Vec::new())
        }
        None => linter
            .lint_patterns(&cli.inputs, cli.format)
            .into_diagnostic()?,
    };

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    let errors = linter.check(&documents);
    let timings = if timings_enabled {
        linter.timings()
    } else {
        None
    };
    output_results(&documents, &errors, cli.result_format, timings.as_ref())?;

    Ok(errors.len() > cli.limit || !failures.is_empty())
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    if let Some(ref path) = cli.conf {
        return Configuration::from_file(path).into_diagnostic();
    }

    if let Some(config) = Configuration::discover(Path::new(".")).into_diagnostic()? {
        return Ok(config);
    }

    let lang = cli.lang.as_deref().unwrap_or("en");
    info!("No config file found, using defaults for '{}'", lang);
    Ok(Configuration::default_for(lang))
}
