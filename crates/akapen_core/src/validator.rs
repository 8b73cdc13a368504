//! Validator contracts and validation errors.
//!
//! Validators come in three scopes. A [`SentenceValidator`] is invoked once
//! per sentence, a [`SectionValidator`] once per section and a
//! [`DocumentValidator`] once per document. The [`Validator`] value pairs
//! one of them with its configured name and severity; the pipeline matches
//! on the scope to pick the traversal granularity.

use std::fmt;

use akapen_model::{Document, LineOffset, Section, Sentence};
use akapen_text::TextError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity level of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
    /// Info - informational message.
    Info,
}

impl Severity {
    /// Returns the lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found by a validator.
///
/// Validators fill in the message and location. The validator name,
/// severity and file name are stamped by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError<'a> {
    /// Name of the validator that produced the error.
    pub validator_name: String,
    /// Human readable message.
    pub message: String,
    /// Line number in the original source (1-indexed).
    pub line_number: usize,
    /// Character offset in the original line (0-indexed).
    pub offset: usize,
    /// Severity configured for the validator.
    pub severity: Severity,
    /// Name of the file the document was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// The offending sentence, borrowed from the document tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<&'a Sentence>,
}

impl<'a> ValidationError<'a> {
    /// Creates an error at a source position.
    pub fn new(message: impl Into<String>, position: LineOffset) -> Self {
        Self {
            validator_name: String::new(),
            message: message.into(),
            line_number: position.line,
            offset: position.offset,
            severity: Severity::default(),
            file_name: None,
            sentence: None,
        }
    }

    /// Creates an error pointing at the start of a sentence.
    pub fn at_sentence(message: impl Into<String>, sentence: &'a Sentence) -> Self {
        Self {
            sentence: Some(sentence),
            ..Self::new(message, sentence.position())
        }
    }

    /// Creates an error pointing at one character of a sentence.
    ///
    /// `index` counts characters of the sentence content. Falls back to the
    /// sentence start when the sentence has no offset for it.
    pub fn at_char(message: impl Into<String>, sentence: &'a Sentence, index: usize) -> Self {
        let position = sentence.offset_at(index).unwrap_or_else(|| sentence.position());
        Self {
            sentence: Some(sentence),
            ..Self::new(message, position)
        }
    }

    /// Creates an error for a whole section, located at its first sentence.
    pub fn at_section(message: impl Into<String>, section: &'a Section) -> Self {
        match section.sentences().next() {
            Some(sentence) => Self::at_sentence(message, sentence),
            None => Self::new(message, LineOffset::new(1, 0)),
        }
    }

    /// Returns the source position of the error.
    pub fn position(&self) -> LineOffset {
        LineOffset::new(self.line_number, self.offset)
    }
}

/// Failure of a single validator invocation.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The validator could not check its input.
    #[error("{0}")]
    Failed(String),

    /// Tokenization of the input failed.
    #[error(transparent)]
    Tokenizer(#[from] TextError),
}

impl ValidatorError {
    /// Creates a failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result of one validator invocation.
pub type ValidationResult<'a> = Result<Vec<ValidationError<'a>>, ValidatorError>;

/// A validator invoked once per sentence.
pub trait SentenceValidator: Send + Sync {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a>;
}

/// A validator invoked once per section.
pub trait SectionValidator: Send + Sync {
    fn validate<'a>(&self, section: &'a Section) -> ValidationResult<'a>;
}

/// A validator invoked once per document.
pub trait DocumentValidator: Send + Sync {
    fn validate<'a>(&self, document: &'a Document) -> ValidationResult<'a>;
}

/// The granularity a validator works at.
pub enum ValidatorKind {
    Sentence(Box<dyn SentenceValidator>),
    Section(Box<dyn SectionValidator>),
    Document(Box<dyn DocumentValidator>),
}

impl ValidatorKind {
    /// Returns the scope name.
    pub fn scope(&self) -> &'static str {
        match self {
            ValidatorKind::Sentence(_) => "sentence",
            ValidatorKind::Section(_) => "section",
            ValidatorKind::Document(_) => "document",
        }
    }
}

/// A configured validator.
///
/// # Example
///
/// ```rust,ignore
/// use akapen_core::{ValidationError, Validator};
///
/// let validator = Validator::sentence_fn("NoTodo", |sentence| {
///     Ok(sentence
///         .content
///         .find("TODO")
///         .map(|_| ValidationError::at_sentence("Found TODO", sentence))
///         .into_iter()
///         .collect())
/// });
/// ```
pub struct Validator {
    name: String,
    severity: Severity,
    kind: ValidatorKind,
}

impl Validator {
    /// Creates a validator of the given kind.
    pub fn new(name: impl Into<String>, kind: ValidatorKind) -> Self {
        Self {
            name: name.into(),
            severity: Severity::default(),
            kind,
        }
    }

    /// Wraps a sentence validator.
    pub fn sentence(name: impl Into<String>, validator: impl SentenceValidator + 'static) -> Self {
        Self::new(name, ValidatorKind::Sentence(Box::new(validator)))
    }

    /// Wraps a section validator.
    pub fn section(name: impl Into<String>, validator: impl SectionValidator + 'static) -> Self {
        Self::new(name, ValidatorKind::Section(Box::new(validator)))
    }

    /// Wraps a document validator.
    pub fn document(name: impl Into<String>, validator: impl DocumentValidator + 'static) -> Self {
        Self::new(name, ValidatorKind::Document(Box::new(validator)))
    }

    /// Creates a sentence validator from a closure.
    pub fn sentence_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a Sentence) -> ValidationResult<'a> + Send + Sync + 'static,
    {
        Self::sentence(name, SentenceFn(f))
    }

    /// Creates a section validator from a closure.
    pub fn section_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a Section) -> ValidationResult<'a> + Send + Sync + 'static,
    {
        Self::section(name, SectionFn(f))
    }

    /// Creates a document validator from a closure.
    pub fn document_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a Document) -> ValidationResult<'a> + Send + Sync + 'static,
    {
        Self::document(name, DocumentFn(f))
    }

    /// Sets the severity of every error this validator reports.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn kind(&self) -> &ValidatorKind {
        &self.kind
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("scope", &self.kind.scope())
            .finish()
    }
}

struct SentenceFn<F>(F);

impl<F> SentenceValidator for SentenceFn<F>
where
    F: for<'a> Fn(&'a Sentence) -> ValidationResult<'a> + Send + Sync,
{
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        (self.0)(sentence)
    }
}

struct SectionFn<F>(F);

impl<F> SectionValidator for SectionFn<F>
where
    F: for<'a> Fn(&'a Section) -> ValidationResult<'a> + Send + Sync,
{
    fn validate<'a>(&self, section: &'a Section) -> ValidationResult<'a> {
        (self.0)(section)
    }
}

struct DocumentFn<F>(F);

impl<F> DocumentValidator for DocumentFn<F>
where
    F: for<'a> Fn(&'a Document) -> ValidationResult<'a> + Send + Sync,
{
    fn validate<'a>(&self, document: &'a Document) -> ValidationResult<'a> {
        (self.0)(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_at_char_uses_offset_map() {
        let sentence = Sentence::with_offsets(
            "ab",
            vec![LineOffset::new(3, 4), LineOffset::new(3, 7)],
            LineOffset::new(3, 0),
        );

        let error = ValidationError::at_char("bad", &sentence, 1);
        assert_eq!(error.position(), LineOffset::new(3, 7));
        assert_eq!(error.sentence, Some(&sentence));

        let fallback = ValidationError::at_char("bad", &sentence, 10);
        assert_eq!(fallback.position(), LineOffset::new(3, 4));
    }

    #[test]
    fn test_at_section_without_sentences() {
        let section = Section::new(0, Vec::new());
        let error = ValidationError::at_section("empty", &section);
        assert_eq!(error.line_number, 1);
        assert!(error.sentence.is_none());
    }

    #[test]
    fn test_sentence_fn_dispatch() {
        let validator = Validator::sentence_fn("Shout", |sentence| {
            Ok(sentence
                .content
                .contains('!')
                .then(|| ValidationError::at_sentence("Do not shout", sentence))
                .into_iter()
                .collect())
        })
        .with_severity(Severity::Warning);

        assert_eq!(validator.name(), "Shout");
        assert_eq!(validator.severity(), Severity::Warning);

        let ValidatorKind::Sentence(inner) = validator.kind() else {
            panic!("expected a sentence validator");
        };
        let sentence = Sentence::new("Stop!", 1);
        assert_eq!(inner.validate(&sentence).unwrap().len(), 1);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        let parsed: Severity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(parsed, Severity::Info);
        assert_eq!(Severity::default(), Severity::Error);
    }

    #[test]
    fn test_validation_error_serializes_sentence() {
        let sentence = Sentence::new("Hello.", 2);
        let mut error = ValidationError::at_sentence("Too short", &sentence);
        error.validator_name = "SentenceLength".to_string();

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["validator_name"], "SentenceLength");
        assert_eq!(json["line_number"], 2);
        assert_eq!(json["sentence"]["content"], "Hello.");
        assert!(json.get("file_name").is_none());
    }
}
