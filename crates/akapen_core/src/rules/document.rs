//! Document scoped rules.

use std::collections::BTreeMap;
use std::sync::Arc;

use akapen_model::Document;
use akapen_text::Tokenizer;

use crate::validator::{DocumentValidator, ValidationError, ValidationResult};

/// Reports leading phrases shared by too many sentences.
///
/// Every paragraph sentence with more than `leading_word_limit` words
/// contributes its first one, two, ... `leading_word_limit` words to a
/// histogram. A phrase used by more than `percentage_threshold` percent of
/// the sentences is reported at the last sentence of the document. Nothing
/// is reported for documents with fewer than `min_sentence_count` sentences.
pub struct FrequentSentenceStart {
    tokenizer: Arc<dyn Tokenizer>,
    leading_word_limit: usize,
    percentage_threshold: usize,
    min_sentence_count: usize,
}

impl FrequentSentenceStart {
    /// Creates the rule; documents with fewer than `min_sentence_count` sentences are skipped.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        leading_word_limit: usize,
        percentage_threshold: usize,
        min_sentence_count: usize,
    ) -> Self {
        Self {
            tokenizer,
            leading_word_limit,
            percentage_threshold,
            min_sentence_count,
        }
    }
}

impl DocumentValidator for FrequentSentenceStart {
    fn validate<'a>(&self, document: &'a Document) -> ValidationResult<'a> {
        let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
        let mut sentence_count = 0;
        let mut last_sentence = None;

        let sentences = document
            .sections()
            .iter()
            .flat_map(|section| section.paragraphs.iter())
            .flat_map(|paragraph| paragraph.sentences.iter());

        for sentence in sentences {
            sentence_count += 1;
            last_sentence = Some(sentence);

            let tokens = self.tokenizer.tokenize(&sentence.content)?;
            if tokens.len() <= self.leading_word_limit {
                continue;
            }
            let mut phrase = String::new();
            for token in tokens.iter().take(self.leading_word_limit) {
                if !phrase.is_empty() {
                    phrase.push(' ');
                }
                phrase.push_str(&token.surface);
                *histogram.entry(phrase.clone()).or_default() += 1;
            }
        }

        let Some(last_sentence) = last_sentence else {
            return Ok(Vec::new());
        };
        if sentence_count < self.min_sentence_count {
            return Ok(Vec::new());
        }

        let errors = histogram
            .into_iter()
            .filter_map(|(phrase, count)| {
                let percentage = count * 100 / sentence_count;
                (percentage > self.percentage_threshold).then(|| {
                    ValidationError::at_sentence(
                        format!(
                            "{}% of the sentences start with \"{}\".",
                            percentage, phrase
                        ),
                        last_sentence,
                    )
                })
            })
            .collect();
        Ok(errors)
    }
}
