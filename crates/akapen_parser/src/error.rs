//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
///
/// Markup that is not recognized is never an error; it is treated as plain
/// text. These variants cover conditions the parsers cannot recover from.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The requested format is not supported.
    #[error("Unsupported format: {0}")]
    Unsupported(String),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource(message.into())
    }

    /// Creates a new unsupported format error.
    pub fn unsupported(format: impl Into<String>) -> Self {
        Self::Unsupported(format.into())
    }
}
