//! # akapen_text
//!
//! Text handling shared by every Akapen parser and validator:
//!
//! - [`Line`]: a source line whose markup can be erased without losing the
//!   original character offsets
//! - [`EndOfSentenceDetector`] and [`SentenceExtractor`]: sentence boundaries
//!   driven by configurable end symbols and an abbreviation whitelist
//! - [`Tokenizer`]: pluggable word segmentation ([`WhitespaceTokenizer`],
//!   [`JapaneseTokenizer`])

mod extractor;
mod line;
mod sentence_end;
mod tokenizer;

pub use extractor::{DEFAULT_ABBREVIATIONS, SentenceExtractor};
pub use line::{EraseStyle, Line};
pub use sentence_end::EndOfSentenceDetector;
pub use tokenizer::{JapaneseTokenizer, TextError, Token, Tokenizer, WhitespaceTokenizer};
