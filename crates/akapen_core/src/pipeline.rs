//! Validator dispatch.
//!
//! The pipeline walks every document of a collection and hands each
//! validator the nodes of its scope: every sentence (header, paragraphs,
//! then list elements of each section), every section, or the document
//! itself. Errors come back ordered by validator, then document, then
//! position in the document, whether documents are checked serially or
//! in parallel.
//!
//! Errors covered by a `//@Suppress@` rule of their document are dropped.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use akapen_model::{Document, DocumentCollection};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::validator::{ValidationError, ValidationResult, Validator, ValidatorKind};

/// An ordered list of configured validators.
pub struct Pipeline {
    validators: Vec<Validator>,
    /// Accumulated time per validator name, when enabled.
    timings: Option<Mutex<HashMap<String, Duration>>>,
}

impl Pipeline {
    /// Creates a pipeline running `validators` in the given order.
    pub fn new(validators: Vec<Validator>) -> Self {
        Self {
            validators,
            timings: None,
        }
    }

    /// Enables or disables per-validator timings.
    pub fn with_timings(mut self, enabled: bool) -> Self {
        self.timings = enabled.then(|| Mutex::new(HashMap::new()));
        self
    }

    /// Returns the validators in registration order.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Returns the time spent in each validator so far, if timings are on.
    pub fn timings(&self) -> Option<HashMap<String, Duration>> {
        self.timings.as_ref().map(|timings| {
            timings
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    /// Checks every document of the collection on the current thread.
    pub fn check<'a>(&self, documents: &'a DocumentCollection) -> Vec<ValidationError<'a>> {
        let per_document = documents
            .iter()
            .map(|document| self.check_by_validator(document))
            .collect();
        self.interleave(per_document)
    }

    /// Checks documents in parallel.
    ///
    /// The result is identical to [`Pipeline::check`].
    pub fn check_parallel<'a>(&self, documents: &'a DocumentCollection) -> Vec<ValidationError<'a>> {
        let per_document = documents
            .documents()
            .par_iter()
            .map(|document| self.check_by_validator(document))
            .collect();
        self.interleave(per_document)
    }

    /// Checks a single document with every validator, in registration order.
    pub fn check_document<'a>(&self, document: &'a Document) -> Vec<ValidationError<'a>> {
        self.check_by_validator(document)
            .into_iter()
            .flatten()
            .collect()
    }

    // Reorders `[document][validator]` results into validator-major order.
    fn interleave<'a>(
        &self,
        per_document: Vec<Vec<Vec<ValidationError<'a>>>>,
    ) -> Vec<ValidationError<'a>> {
        let mut columns: Vec<_> = per_document.into_iter().map(Vec::into_iter).collect();
        let mut errors = Vec::new();
        for _ in &self.validators {
            for column in &mut columns {
                if let Some(batch) = column.next() {
                    errors.extend(batch);
                }
            }
        }
        errors
    }

    fn check_by_validator<'a>(&self, document: &'a Document) -> Vec<Vec<ValidationError<'a>>> {
        self.validators
            .iter()
            .map(|validator| self.run(validator, document))
            .collect()
    }

    fn run<'a>(&self, validator: &Validator, document: &'a Document) -> Vec<ValidationError<'a>> {
        let name = validator.name();
        let start = Instant::now();
        let mut errors = Vec::new();

        match validator.kind() {
            ValidatorKind::Sentence(rule) => {
                for sentence in document.sections().iter().flat_map(|s| s.sentences()) {
                    errors.extend(invoke(name, || rule.validate(sentence)));
                }
            }
            ValidatorKind::Section(rule) => {
                for section in document.sections() {
                    errors.extend(invoke(name, || rule.validate(section)));
                }
            }
            ValidatorKind::Document(rule) => {
                errors.extend(invoke(name, || rule.validate(document)));
            }
        }

        if !document.suppress_rules().is_empty() {
            errors.retain(|error| !document.is_suppressed(name, error.line_number));
        }

        let file_name = document.file_name();
        for error in &mut errors {
            error.validator_name = name.to_string();
            error.severity = validator.severity();
            error.file_name = file_name.map(str::to_string);
        }

        let elapsed = start.elapsed();
        if let Some(timings) = &self.timings {
            *timings
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(name.to_string())
                .or_default() += elapsed;
            debug!("{} took {:?} on {}", name, elapsed, file_name.unwrap_or("<input>"));
        }
        errors
    }
}

// A failed or panicking invocation contributes no errors.
fn invoke<'a, F>(name: &str, f: F) -> Vec<ValidationError<'a>>
where
    F: FnOnce() -> ValidationResult<'a>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(errors)) => errors,
        Ok(Err(e)) => {
            warn!("Validator '{}' failed: {}", name, e);
            Vec::new()
        }
        Err(payload) => {
            warn!("Validator '{}' panicked: {}", name, panic_message(&*payload));
            Vec::new()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
