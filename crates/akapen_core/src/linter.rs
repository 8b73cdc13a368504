//! Linter orchestrator.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use akapen_model::{Document, DocumentCollection};
use akapen_parser::DocumentFormat;
use akapen_text::{JapaneseTokenizer, SentenceExtractor, Tokenizer, WhitespaceTokenizer};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::file_finder::FileFinder;
use crate::{Configuration, LinterError, Pipeline, ValidationError, ValidatorFactory};

/// Result of parsing several files.
///
/// Contains a tuple of:
/// - The documents that were parsed, in input order
/// - Failed files with their errors (path and error)
pub type ParseFilesResult = (DocumentCollection, Vec<(PathBuf, LinterError)>);

/// The core linter engine.
///
/// Orchestrates file discovery, parsing and validation.
pub struct Linter {
    config: Configuration,
    extractor: SentenceExtractor,
    pipeline: Pipeline,
    finder: FileFinder,
}

impl Linter {
    /// Creates a new linter with the given configuration.
    ///
    /// Fails when a validator is unknown or misconfigured, or when the
    /// symbols or file patterns are invalid.
    pub fn new(config: Configuration) -> Result<Self, LinterError> {
        let symbols = config.symbol_table()?;
        let tokenizer: Arc<dyn Tokenizer> = if config.lang == "ja" {
            Arc::new(JapaneseTokenizer::new()?)
        } else {
            Arc::new(WhitespaceTokenizer)
        };

        let extractor = config.sentence_extractor()?;
        let validators = ValidatorFactory::new(symbols, tokenizer).create_all(&config.validators)?;
        let pipeline = Pipeline::new(validators).with_timings(config.timings);
        let finder = FileFinder::new(&config.include, &config.exclude)?;

        info!("Linter ready for language '{}'", config.lang);
        Ok(Self {
            config,
            extractor,
            pipeline,
            finder,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns per-validator timings, when enabled in the configuration.
    pub fn timings(&self) -> Option<HashMap<String, Duration>> {
        self.pipeline.timings()
    }

    /// Parses text in the given format.
    pub fn parse_source(
        &self,
        source: &str,
        format: DocumentFormat,
        file_name: Option<&str>,
    ) -> Result<Document, LinterError> {
        Ok(format.parser().parse(source, file_name, &self.extractor)?)
    }

    /// Reads and parses one file.
    ///
    /// Without an explicit format it is inferred from the extension, falling
    /// back to plain text.
    pub fn parse_file(
        &self,
        path: &Path,
        format: Option<DocumentFormat>,
    ) -> Result<Document, LinterError> {
        let source = fs::read_to_string(path).map_err(|e| {
            LinterError::file(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let format = format
            .or_else(|| DocumentFormat::from_path(path))
            .unwrap_or(DocumentFormat::Plain);

        debug!("Parsing {} as {}", path.display(), format);
        self.parse_source(&source, format, Some(&path.display().to_string()))
    }

    /// Parses files in parallel using rayon.
    ///
    /// A file that cannot be read or parsed is reported in the failures and
    /// does not affect the others.
    pub fn parse_files(&self, paths: &[PathBuf], format: Option<DocumentFormat>) -> ParseFilesResult {
        let results: Vec<Result<Document, (PathBuf, LinterError)>> = paths
            .par_iter()
            .map(|path| {
                self.parse_file(path, format)
                    .map_err(|e| (path.clone(), e))
            })
            .collect();

        let mut documents = DocumentCollection::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(document) => documents.push(document),
                Err((path, error)) => {
                    warn!("Failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }
        (documents, failures)
    }

    /// Discovers files matching the given inputs and parses them.
    ///
    /// Globs are matched below the configuration's directory, or the
    /// current directory when the configuration was not loaded from a file.
    pub fn lint_patterns(
        &self,
        patterns: &[String],
        format: Option<DocumentFormat>,
    ) -> Result<ParseFilesResult, LinterError> {
        let base_dir = self
            .config
            .base_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        let files = self.finder.discover(patterns, &base_dir)?;
        Ok(self.parse_files(&files, format))
    }

    /// Runs every configured validator over the documents.
    pub fn check<'a>(&self, documents: &'a DocumentCollection) -> Vec<ValidationError<'a>> {
        self.pipeline.check_parallel(documents)
    }
}
