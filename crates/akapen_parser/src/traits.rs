//! Parser trait definition.

use akapen_model::Document;
use akapen_text::SentenceExtractor;

use crate::ParseError;

/// Trait for parsing source text into a [`Document`].
///
/// Implementations recognize the markup of one format, erase it, and feed
/// the surviving text through the [`SentenceExtractor`] so every sentence
/// keeps its original line and offset.
///
/// # Example
///
/// ```rust,ignore
/// use akapen_model::{Document, DocumentBuilder};
/// use akapen_parser::{ParseError, Parser};
/// use akapen_text::SentenceExtractor;
///
/// struct MyParser;
///
/// impl Parser for MyParser {
///     fn name(&self) -> &str {
///         "my-parser"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["myext"]
///     }
///
///     fn parse(
///         &self,
///         source: &str,
///         file_name: Option<&str>,
///         extractor: &SentenceExtractor,
///     ) -> Result<Document, ParseError> {
///         // Parse implementation
///         todo!()
///     }
/// }
/// ```
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles.
    ///
    /// Extensions should not include the leading dot (e.g., `["md", "markdown"]`).
    fn extensions(&self) -> &[&str];

    /// Parses the source text into a document.
    ///
    /// # Arguments
    ///
    /// * `source` - The source text to parse
    /// * `file_name` - Name recorded on the document
    /// * `extractor` - Sentence boundary rules for the document language
    fn parse(
        &self,
        source: &str,
        file_name: Option<&str>,
        extractor: &SentenceExtractor,
    ) -> Result<Document, ParseError>;

    /// Returns true if this parser can handle the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
