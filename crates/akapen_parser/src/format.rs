//! Input format selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    MarkdownParser, ParseError, Parser, PlainTextParser, ReStructuredTextParser, ReviewParser,
    WikiParser,
};

/// A supported input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Plain text.
    Plain,
    /// Wiki markup.
    Wiki,
    /// Markdown (CommonMark with GFM extensions).
    Markdown,
    /// reStructuredText.
    Rest,
    /// Re:VIEW.
    Review,
}

impl DocumentFormat {
    /// Every supported format.
    pub const ALL: [DocumentFormat; 5] = [
        DocumentFormat::Plain,
        DocumentFormat::Wiki,
        DocumentFormat::Markdown,
        DocumentFormat::Rest,
        DocumentFormat::Review,
    ];

    /// Returns the parser for this format.
    pub fn parser(self) -> Box<dyn Parser + Send + Sync> {
        match self {
            DocumentFormat::Plain => Box::new(PlainTextParser::new()),
            DocumentFormat::Wiki => Box::new(WikiParser::new()),
            DocumentFormat::Markdown => Box::new(MarkdownParser::new()),
            DocumentFormat::Rest => Box::new(ReStructuredTextParser::new()),
            DocumentFormat::Review => Box::new(ReviewParser::new()),
        }
    }

    /// Returns the format handling the given file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.parser().can_parse(extension))
    }

    /// Returns the format for a path, based on its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the lowercase name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Plain => "plain",
            DocumentFormat::Wiki => "wiki",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Rest => "rest",
            DocumentFormat::Review => "review",
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::unsupported(s))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
