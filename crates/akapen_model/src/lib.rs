//! # akapen_model
//!
//! Document model for Akapen.
//!
//! A parsed input becomes a [`Document`]: an ordered set of [`Section`]s,
//! each holding header sentences, [`Paragraph`]s and [`ListBlock`]s.
//! Sections nest by level; the nesting is resolved while the document is
//! built with [`DocumentBuilder`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use akapen_model::{DocumentBuilder, Sentence};
//!
//! let mut builder = DocumentBuilder::new(Some("README.md".into()));
//! builder.add_section(1, vec![Sentence::new("Install", 1)]);
//! builder.add_sentence(Sentence::new("Run the installer.", 3));
//!
//! let document = builder.build();
//! assert_eq!(document.sentences().count(), 2);
//! ```

mod builder;
mod document;
mod section;
mod sentence;
mod suppress;

pub use builder::DocumentBuilder;
pub use document::{Document, DocumentCollection, SectionId};
pub use section::{ListBlock, ListElement, Paragraph, Section};
pub use sentence::{LineOffset, Sentence};
pub use suppress::{SUPPRESS_PREFIX, SuppressRule};
