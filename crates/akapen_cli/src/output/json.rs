//! JSON output formatter

use akapen_core::{DocumentCollection, ValidationError};
use miette::{IntoDiagnostic, Result};

use super::{document_name, errors_of};

pub fn output_json(documents: &DocumentCollection, errors: &[ValidationError<'_>]) -> Result<()> {
    let output: Vec<_> = documents
        .iter()
        .map(|document| {
            serde_json::json!({
                "document": document_name(document),
                "errors": errors_of(document, errors),
            })
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
