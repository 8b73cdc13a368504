//! Built-in validators.
//!
//! Each rule is a small value holding its settings; the factory wires them
//! to names and severities.

mod document;
mod section;
mod sentence;

pub use document::FrequentSentenceStart;
pub use section::{ParagraphNumber, ParagraphStartWith, SectionLength};
pub use sentence::{
    CommaNumber, DoubledWord, InvalidExpression, InvalidSymbol, SentenceLength, WordNumber,
};

/// Converts a byte offset into `text` to a character index.
pub(crate) fn char_index(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or(0, |prefix| prefix.chars().count())
}
