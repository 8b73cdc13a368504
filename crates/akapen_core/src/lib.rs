//! # akapen_core
//!
//! Core linter engine for Akapen.
//!
//! This crate provides:
//! - The main `Linter` orchestrator
//! - Configuration loading and the symbol table
//! - Validator contracts, the validator factory and the built-in rules
//! - The validator dispatch `Pipeline`
//! - File discovery and filtering
//!
//! ## Example
//!
//! ```rust,ignore
//! use akapen_core::{Configuration, Linter};
//!
//! let config = Configuration::from_file(".akapen.jsonc")?;
//! let linter = Linter::new(config)?;
//!
//! let (documents, _failures) = linter.lint_patterns(&["docs/**/*.md".into()], None)?;
//! for error in linter.check(&documents) {
//!     println!("{}:{} {}", error.line_number, error.offset, error.message);
//! }
//! ```

mod config;
mod error;
mod factory;
pub mod file_finder;
mod linter;
mod pipeline;
pub mod rules;
mod symbols;
mod validator;

pub use config::{CONFIG_FILE_NAMES, Configuration, ValidatorConfig};
pub use error::LinterError;
pub use factory::{BUILTIN_VALIDATORS, ValidatorFactory};
pub use linter::{Linter, ParseFilesResult};
pub use pipeline::Pipeline;
pub use symbols::{Symbol, SymbolOverride, SymbolTable, SymbolType};
pub use validator::{
    DocumentValidator, SectionValidator, SentenceValidator, Severity, ValidationError,
    ValidationResult, Validator, ValidatorError, ValidatorKind,
};

pub use akapen_model::{Document, DocumentCollection, LineOffset, Section, Sentence, SuppressRule};
pub use akapen_parser::DocumentFormat;
