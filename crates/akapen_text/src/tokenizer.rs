//! Pluggable word tokenizers.

use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer as LinderaTokenizer;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TextError {
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

/// A word-level unit of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The surface form of the token (the text itself).
    pub surface: String,
    /// Part of speech tags (e.g., "名詞", "動詞").
    pub tags: Vec<String>,
    /// Byte offset of the token in the tokenized text.
    pub offset: usize,
    /// Reading, when the tokenizer provides one.
    pub reading: Option<String>,
    /// Dictionary form, when the tokenizer provides one.
    pub base_form: Option<String>,
}

/// Splits text into tokens.
///
/// Implementations must be usable from several threads at once, since
/// validators run against documents in parallel.
pub trait Tokenizer: Send + Sync {
    /// Tokenizes the given text.
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TextError>;
}

/// Tokenizer for languages that separate words with spaces.
///
/// Words follow the Unicode word boundary rules (UAX #29); punctuation and
/// whitespace are not returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TextError> {
        Ok(text
            .unicode_word_indices()
            .map(|(offset, word)| Token {
                surface: word.to_string(),
                tags: Vec::new(),
                offset,
                reading: None,
                base_form: None,
            })
            .collect())
    }
}

/// Tokenizer for Japanese text using Lindera.
pub struct JapaneseTokenizer {
    inner: LinderaTokenizer,
}

impl std::fmt::Debug for JapaneseTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JapaneseTokenizer").finish_non_exhaustive()
    }
}

impl JapaneseTokenizer {
    /// Creates a new tokenizer with the embedded IPADIC dictionary.
    pub fn new() -> Result<Self, TextError> {
        let dictionary = load_dictionary("embedded://ipadic")
            .map_err(|e| TextError::Tokenizer(e.to_string()))?;

        let segmenter = Segmenter::new(
            Mode::Normal,
            dictionary,
            None, // user dictionary
        );

        let inner = LinderaTokenizer::new(segmenter);

        Ok(Self { inner })
    }
}

impl Tokenizer for JapaneseTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TextError> {
        let lindera_tokens = self
            .inner
            .tokenize(text)
            .map_err(|e| TextError::Tokenizer(e.to_string()))?;

        let mut tokens = Vec::with_capacity(lindera_tokens.len());

        for mut lindera_token in lindera_tokens {
            let surface = lindera_token.surface.as_ref().to_string();
            let offset = lindera_token.byte_start;
            let details = lindera_token.details();

            let tags: Vec<String> = details
                .iter()
                .take(4)
                .filter(|s| **s != "*")
                .map(|s| s.to_string())
                .collect();

            // IPADIC layout: 4 POS fields, conjugation type and form, base form, reading.
            let field = |index: usize| {
                details
                    .get(index)
                    .filter(|s| **s != "*")
                    .map(|s| s.to_string())
            };

            tokens.push(Token {
                surface,
                tags,
                offset,
                base_form: field(6),
                reading: field(7),
            });
        }

        Ok(tokens)
    }
}
