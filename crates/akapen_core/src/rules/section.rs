//! Section scoped rules.

use akapen_model::Section;

use crate::validator::{SectionValidator, ValidationError, ValidationResult};

/// Reports sections whose body exceeds `max_num` characters.
#[derive(Debug, Clone)]
pub struct SectionLength {
    max_num: usize,
}

impl SectionLength {
    /// Creates the rule with a limit of `max_num` characters.
    pub fn new(max_num: usize) -> Self {
        Self { max_num }
    }
}

impl SectionValidator for SectionLength {
    fn validate<'a>(&self, section: &'a Section) -> ValidationResult<'a> {
        let count = section.body_char_count();
        if count <= self.max_num {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::at_section(
            format!(
                "The number of characters in the section ({}) exceeds the maximum of {}.",
                count, self.max_num
            ),
            section,
        )])
    }
}

/// Reports sections with more than `max_num` paragraphs.
#[derive(Debug, Clone)]
pub struct ParagraphNumber {
    max_num: usize,
}

impl ParagraphNumber {
    /// Creates the rule allowing at most `max_num` paragraphs per section.
    pub fn new(max_num: usize) -> Self {
        Self { max_num }
    }
}

impl SectionValidator for ParagraphNumber {
    fn validate<'a>(&self, section: &'a Section) -> ValidationResult<'a> {
        let count = section.paragraphs.len();
        if count <= self.max_num {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::at_section(
            format!(
                "The number of paragraphs ({}) exceeds the maximum of {}.",
                count, self.max_num
            ),
            section,
        )])
    }
}

/// Reports paragraphs that do not begin with `start_from`.
///
/// Parsers strip the indentation of paragraph lines, so a whitespace-only
/// prefix is checked against the source offset of the first sentence.
#[derive(Debug, Clone)]
pub struct ParagraphStartWith {
    start_from: String,
}

impl ParagraphStartWith {
    /// Creates the rule; an empty `start_from` disables it.
    pub fn new(start_from: impl Into<String>) -> Self {
        Self {
            start_from: start_from.into(),
        }
    }
}

impl SectionValidator for ParagraphStartWith {
    fn validate<'a>(&self, section: &'a Section) -> ValidationResult<'a> {
        if self.start_from.is_empty() {
            return Ok(Vec::new());
        }
        let indentation = self
            .start_from
            .chars()
            .all(char::is_whitespace)
            .then(|| self.start_from.chars().count());

        let errors = section
            .paragraphs
            .iter()
            .filter_map(|paragraph| paragraph.sentences.first())
            .filter(|first| match indentation {
                Some(width) => {
                    first.start_offset < width && !first.content.starts_with(&self.start_from)
                }
                None => !first.content.starts_with(&self.start_from),
            })
            .map(|first| {
                ValidationError::at_sentence(
                    format!(
                        "The paragraph does not start with \"{}\".",
                        self.start_from
                    ),
                    first,
                )
            })
            .collect();
        Ok(errors)
    }
}
