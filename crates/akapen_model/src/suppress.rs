//! Inline suppression of validators.

use serde::{Deserialize, Serialize};

use crate::Section;

/// Prefix of a line that suppresses validators.
pub const SUPPRESS_PREFIX: &str = "//@Suppress@";

/// A `//@Suppress@ [Validator ...]` line found in the source.
///
/// The rule starts at the line after the directive and covers the rest of
/// the section holding that line. Without names every validator is
/// suppressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressRule {
    /// First line covered by the rule.
    pub line_number: usize,
    /// Lowercased validator names, without a `Validator` suffix.
    pub validators: Vec<String>,
}

impl SuppressRule {
    /// Parses a suppression line found at `line_number`.
    ///
    /// Returns `None` when the line is not a suppression directive.
    pub fn parse(text: &str, line_number: usize) -> Option<Self> {
        let rest = text.strip_prefix(SUPPRESS_PREFIX)?;
        if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
            return None;
        }

        Some(Self {
            line_number: line_number + 1,
            validators: rest.split_whitespace().map(normalize).collect(),
        })
    }

    /// Returns true if the rule names `validator`, or names nothing.
    pub fn applies_to(&self, validator: &str) -> bool {
        let validator = normalize(validator);
        self.validators.is_empty() || self.validators.contains(&validator)
    }

    /// Returns true if an error of `validator` at `line` is suppressed.
    ///
    /// The line must follow the rule and share a section with it, judged
    /// by the line span of the section's sentences.
    pub fn suppresses(&self, sections: &[Section], validator: &str, line: usize) -> bool {
        if line < self.line_number || !self.applies_to(validator) {
            return false;
        }

        sections.iter().any(|section| {
            let mut lines = section.sentences().map(|s| s.line_number);
            let Some(first) = lines.next() else {
                return false;
            };
            let (start, end) = lines.fold((first, first), |(lo, hi), n| (lo.min(n), hi.max(n)));
            (start..=end).contains(&self.line_number) && (start..=end).contains(&line)
        })
    }
}

fn normalize(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_suffix("validator") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sentence;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::all("//@Suppress@", Some(vec![]))]
    #[case::named("//@Suppress@ SentenceLength  CommaNumberValidator", Some(vec!["sentencelength", "commanumber"]))]
    #[case::glued("//@Suppress@Foo", None)]
    #[case::plain_comment("// Suppress this", None)]
    fn test_parse(#[case] text: &str, #[case] expected: Option<Vec<&str>>) {
        let expected = expected.map(|names| SuppressRule {
            line_number: 4,
            validators: names.into_iter().map(String::from).collect(),
        });
        assert_eq!(SuppressRule::parse(text, 3), expected);
    }

    #[test]
    fn test_applies_to_is_case_insensitive() {
        let rule = SuppressRule::parse("//@Suppress@ sentencelength", 1).unwrap();

        assert!(rule.applies_to("SentenceLength"));
        assert!(rule.applies_to("SentenceLengthValidator"));
        assert!(!rule.applies_to("CommaNumber"));
    }

    #[test]
    fn test_suppresses_within_section_only() {
        let mut first = Section::new(0, Vec::new());
        first.paragraphs.push(crate::Paragraph::new());
        first.paragraphs[0].sentences.push(Sentence::new("Before.", 1));
        first.paragraphs[0].sentences.push(Sentence::new("After.", 3));
        let mut second = Section::new(1, vec![Sentence::new("Next", 5)]);
        second.paragraphs.push(crate::Paragraph::new());
        second.paragraphs[0].sentences.push(Sentence::new("Later.", 6));
        let sections = vec![first, second];

        let rule = SuppressRule::parse("//@Suppress@", 2).unwrap();

        assert!(!rule.suppresses(&sections, "Any", 1));
        assert!(rule.suppresses(&sections, "Any", 3));
        assert!(!rule.suppresses(&sections, "Any", 6));
    }
}
