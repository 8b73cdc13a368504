//! # akapen_parser
//!
//! Format parsers for Akapen.
//!
//! This crate provides:
//! - A `Parser` trait turning source text into an [`akapen_model::Document`]
//! - Line-based parsers for plain text, wiki markup, reStructuredText and Re:VIEW
//! - A Markdown parser using `markdown-rs`
//! - [`DocumentFormat`] to pick a parser by name or file extension
//!
//! ## Architecture
//!
//! Line-based parsers erase markup in place on each [`akapen_text::Line`],
//! so the surviving text still knows its original column. The lines are
//! then grouped into sections, paragraphs and list elements, and the
//! sentence extractor splits their text. The Markdown parser walks the
//! mdast tree instead and maps text nodes back to the source.
//!
//! ## Example
//!
//! ```rust,ignore
//! use akapen_parser::{DocumentFormat, Parser};
//! use akapen_text::SentenceExtractor;
//!
//! let parser = DocumentFormat::Markdown.parser();
//! let source = "# Hello\n\nThis is a paragraph.";
//!
//! let document = parser
//!     .parse(source, Some("hello.md"), &SentenceExtractor::default())
//!     .unwrap();
//! assert_eq!(document.len(), 2);
//! ```

mod error;
mod format;
mod lines;
mod markdown;
mod plain;
mod rest;
mod review;
mod traits;
mod wiki;

pub use error::ParseError;
pub use format::DocumentFormat;
pub use markdown::MarkdownParser;
pub use plain::PlainTextParser;
pub use rest::ReStructuredTextParser;
pub use review::ReviewParser;
pub use traits::Parser;
pub use wiki::WikiParser;
