//! Plain text parser.

use akapen_model::Document;
use akapen_text::{Line, SentenceExtractor};

use crate::lines::{build_document, split_lines};
use crate::{ParseError, Parser};

/// Parser for plain text.
///
/// No markup is recognized. Paragraphs are separated by blank lines and
/// everything lands in a single untitled section.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    /// Creates a new plain text parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for PlainTextParser {
    fn name(&self) -> &str {
        "plain"
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn parse(
        &self,
        source: &str,
        file_name: Option<&str>,
        extractor: &SentenceExtractor,
    ) -> Result<Document, ParseError> {
        let (lines, suppress_rules) = split_lines(source, Line::raw);
        Ok(build_document(&lines, suppress_rules, extractor, file_name))
    }
}
