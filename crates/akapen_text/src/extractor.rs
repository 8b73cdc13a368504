//! Sentence extraction on top of [`EndOfSentenceDetector`].

use std::ops::Range;

use crate::EndOfSentenceDetector;

/// Abbreviations that never end a sentence unless configured otherwise.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Miss.", "Dr.", "genn.ai", "Co., Ltd.", "a.m.", "p.m.", "U.S.A.", "Jan.",
    "Feb.", "Mar.", "Apr.", "Jun.", "Jul.", "Aug.", "Sep.", "Sept.", "Oct.", "Nov.", "Dec.",
    "B.C.", "A.D.", "e.g.", "i.e.", "etc.",
];

/// Splits buffers into sentence ranges.
///
/// Lines that belong to the same paragraph are joined with the broken-line
/// separator before extraction: a space for languages that separate words,
/// nothing for Japanese.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceExtractor {
    detector: EndOfSentenceDetector,
    broken_line_separator: String,
}

impl SentenceExtractor {
    /// Creates an extractor.
    pub fn new(detector: EndOfSentenceDetector, broken_line_separator: impl Into<String>) -> Self {
        Self {
            detector,
            broken_line_separator: broken_line_separator.into(),
        }
    }

    /// Returns the underlying detector.
    pub fn detector(&self) -> &EndOfSentenceDetector {
        &self.detector
    }

    /// Returns the string inserted where a sentence continues on the next line.
    pub fn broken_line_separator(&self) -> &str {
        &self.broken_line_separator
    }

    /// Returns the character ranges of the complete sentences in `text`
    /// and the index where the unterminated remainder starts.
    pub fn extract(&self, text: &str) -> (Vec<Range<usize>>, usize) {
        let mut ranges = Vec::new();
        let mut start = 0;
        for end in self.detector.find_all_sentence_ends(text) {
            ranges.push(start..end + 1);
            start = end + 1;
        }
        (ranges, start)
    }

    /// Returns the character ranges of every sentence in `text`.
    ///
    /// A non-blank remainder without a terminator becomes the last sentence.
    pub fn split(&self, text: &str) -> Vec<Range<usize>> {
        let (mut ranges, remainder) = self.extract(text);
        let length = text.chars().count();
        let has_content = text.chars().skip(remainder).any(|c| !c.is_whitespace());
        if has_content {
            ranges.push(remainder..length);
        }
        ranges
    }
}

impl Default for SentenceExtractor {
    /// English symbols with the default abbreviation list.
    fn default() -> Self {
        let detector = EndOfSentenceDetector::new([".", "?", "!"], DEFAULT_ABBREVIATIONS)
            .with_right_quotations(['"', '\'']);
        Self::new(detector, " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slice(text: &str, range: &Range<usize>) -> String {
        text.chars().skip(range.start).take(range.len()).collect()
    }

    #[test]
    fn test_extract_returns_remainder() {
        let extractor = SentenceExtractor::default();
        let text = "First one. Second one. Third";
        let (ranges, remainder) = extractor.extract(text);

        let sentences: Vec<String> = ranges.iter().map(|r| slice(text, r)).collect();
        assert_eq!(sentences, vec!["First one.", " Second one."]);
        assert_eq!(remainder, 22);
    }

    #[test]
    fn test_split_keeps_unterminated_tail() {
        let extractor = SentenceExtractor::default();
        let text = "Done. Not done";
        let ranges = extractor.split(text);
        assert_eq!(ranges, vec![0..5, 5..14]);
    }

    #[test]
    fn test_split_drops_blank_tail() {
        let extractor = SentenceExtractor::default();
        assert_eq!(extractor.split("Done.   "), vec![0..5]);
        assert!(extractor.split("   ").is_empty());
    }

    #[test]
    fn test_default_abbreviations_apply() {
        let extractor = SentenceExtractor::default();
        let text = "Meet Dr. Smith at 10 a.m. tomorrow.";
        assert_eq!(extractor.split(text), vec![0..35]);
    }

    #[test]
    fn test_concatenated_output_splits_identically() {
        let extractor = SentenceExtractor::default();
        let text = "One here. Two there! Three?";
        let ranges = extractor.split(text);
        let joined: String = ranges.iter().map(|r| slice(text, r)).collect();
        assert_eq!(extractor.split(&joined), ranges);
    }
}
