//! Output formatting module

mod json;
mod text;

use std::collections::HashMap;
use std::time::Duration;

use akapen_core::{Document, DocumentCollection, ValidationError};
use miette::Result;

use crate::cli::ResultFormat;

pub fn output_results(
    documents: &DocumentCollection,
    errors: &[ValidationError<'_>],
    format: ResultFormat,
    timings: Option<&HashMap<String, Duration>>,
) -> Result<()> {
    match format {
        ResultFormat::Json => json::output_json(documents, errors)?,
        ResultFormat::Plain => text::output_text(documents, errors, timings),
    }
    Ok(())
}

/// Errors reported for one document, in pipeline order.
fn errors_of<'e, 'a>(
    document: &Document,
    errors: &'e [ValidationError<'a>],
) -> Vec<&'e ValidationError<'a>> {
    errors
        .iter()
        .filter(|e| e.file_name.as_deref() == document.file_name())
        .collect()
}

/// Display name of a document.
fn document_name(document: &Document) -> &str {
    document.file_name().unwrap_or("<input>")
}
