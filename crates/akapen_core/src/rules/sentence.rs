//! Sentence scoped rules.

use std::collections::HashSet;
use std::sync::Arc;

use akapen_model::Sentence;
use akapen_text::Tokenizer;

use super::char_index;
use crate::symbols::SymbolTable;
use crate::validator::{SentenceValidator, ValidationError, ValidationResult};

/// Reports sentences longer than `max_len` characters.
///
/// Leading and trailing whitespace is not counted.
#[derive(Debug, Clone)]
pub struct SentenceLength {
    max_len: usize,
}

impl SentenceLength {
    /// Creates the rule with a limit of `max_len` characters.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl SentenceValidator for SentenceLength {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        let length = sentence.content.trim().chars().count();
        if length <= self.max_len {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::at_sentence(
            format!(
                "The length of the sentence ({}) exceeds the maximum of {}.",
                length, self.max_len
            ),
            sentence,
        )])
    }
}

/// Reports sentences with more than `max_num` commas.
#[derive(Debug, Clone)]
pub struct CommaNumber {
    comma: String,
    max_num: usize,
}

impl CommaNumber {
    /// Creates the rule; an empty `comma` disables it.
    pub fn new(comma: impl Into<String>, max_num: usize) -> Self {
        Self {
            comma: comma.into(),
            max_num,
        }
    }
}

impl SentenceValidator for CommaNumber {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        if self.comma.is_empty() {
            return Ok(Vec::new());
        }
        let count = sentence.content.matches(self.comma.as_str()).count();
        if count <= self.max_num {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::at_sentence(
            format!(
                "The number of commas ({}) exceeds the maximum of {}.",
                count, self.max_num
            ),
            sentence,
        )])
    }
}

/// Reports characters configured as invalid replacements of a symbol.
///
/// At most one error per symbol, at the first offending character.
#[derive(Debug, Clone)]
pub struct InvalidSymbol {
    symbols: Arc<SymbolTable>,
}

impl InvalidSymbol {
    /// Creates the rule checking against `symbols`.
    pub fn new(symbols: Arc<SymbolTable>) -> Self {
        Self { symbols }
    }
}

impl SentenceValidator for InvalidSymbol {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        let errors = self
            .symbols
            .iter()
            .filter_map(|symbol| {
                sentence
                    .content
                    .chars()
                    .enumerate()
                    .find(|(_, c)| symbol.invalid_chars.contains(c))
                    .map(|(index, c)| {
                        ValidationError::at_char(
                            format!(
                                "Found invalid symbol \"{}\", use \"{}\" instead.",
                                c, symbol.value
                            ),
                            sentence,
                            index,
                        )
                    })
            })
            .collect();
        Ok(errors)
    }
}

/// Reports expressions from a configured list.
#[derive(Debug, Clone)]
pub struct InvalidExpression {
    expressions: Vec<String>,
}

impl InvalidExpression {
    /// Creates the rule reporting each of `expressions`.
    pub fn new(expressions: Vec<String>) -> Self {
        Self { expressions }
    }
}

impl SentenceValidator for InvalidExpression {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        let content = &sentence.content;
        let errors = self
            .expressions
            .iter()
            .filter_map(|expression| {
                content.find(expression.as_str()).map(|byte| {
                    ValidationError::at_char(
                        format!("Found invalid expression \"{}\".", expression),
                        sentence,
                        char_index(content, byte),
                    )
                })
            })
            .collect();
        Ok(errors)
    }
}

/// Reports sentences with more than `max_num` words.
pub struct WordNumber {
    tokenizer: Arc<dyn Tokenizer>,
    max_num: usize,
}

impl WordNumber {
    /// Creates the rule allowing at most `max_num` words.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, max_num: usize) -> Self {
        Self { tokenizer, max_num }
    }
}

impl SentenceValidator for WordNumber {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        let count = self
            .tokenizer
            .tokenize(&sentence.content)?
            .iter()
            .filter(|token| is_word(&token.surface))
            .count();
        if count <= self.max_num {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::at_sentence(
            format!(
                "The number of words ({}) exceeds the maximum of {}.",
                count, self.max_num
            ),
            sentence,
        )])
    }
}

const ENGLISH_SKIP_LIST: &[&str] = &[
    "a", "an", "the", "of", "to", "in", "on", "at", "by", "for", "with", "as", "and", "or",
    "but", "is", "are", "was", "were", "be", "been", "it", "its", "that", "this", "which", "i",
    "you", "he", "she", "we", "they", "not", "so", "if", "than", "then", "from", "has", "have",
    "had", "do", "does", "did",
];

const JAPANESE_SKIP_LIST: &[&str] = &[
    "は", "が", "の", "に", "を", "で", "と", "て", "た", "だ", "も", "な", "い", "し", "する",
    "ある", "いる", "こと", "です", "ます", "から", "まで", "より", "や", "か", "よう", "れ",
    "られ", "ない", "ん",
];

/// Reports words used more than once in a sentence.
///
/// Common function words of the document language are skipped, along with
/// any configured extra words. Matching of the skip list ignores case.
pub struct DoubledWord {
    tokenizer: Arc<dyn Tokenizer>,
    skip_list: HashSet<String>,
}

impl DoubledWord {
    /// Creates the rule, skipping the function words of `lang` and `extra`.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, lang: &str, extra: Vec<String>) -> Self {
        let defaults = if lang == "ja" {
            JAPANESE_SKIP_LIST
        } else {
            ENGLISH_SKIP_LIST
        };
        let skip_list = defaults
            .iter()
            .map(|s| s.to_string())
            .chain(extra)
            .map(|s| s.to_lowercase())
            .collect();
        Self {
            tokenizer,
            skip_list,
        }
    }
}

impl SentenceValidator for DoubledWord {
    fn validate<'a>(&self, sentence: &'a Sentence) -> ValidationResult<'a> {
        let content = &sentence.content;
        let mut seen = HashSet::new();
        let mut errors = Vec::new();

        for token in self.tokenizer.tokenize(content)? {
            if !is_word(&token.surface) || self.skip_list.contains(&token.surface.to_lowercase()) {
                continue;
            }
            if !seen.insert(token.surface.clone()) {
                errors.push(ValidationError::at_char(
                    format!("Found repeated word \"{}\".", token.surface),
                    sentence,
                    char_index(content, token.offset),
                ));
            }
        }
        Ok(errors)
    }
}

fn is_word(surface: &str) -> bool {
    surface.chars().any(char::is_alphanumeric)
}
