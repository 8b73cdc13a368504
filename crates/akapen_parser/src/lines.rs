//! Conversion of classified lines into a [`Document`].
//!
//! Line-based parsers (plain, wiki, reST, Re:VIEW) first erase markup and
//! tag each [`Line`] with its header level, list level and list start flag.
//! This module then groups the lines into sections, paragraphs and list
//! elements and extracts their sentences.

use akapen_model::{Document, DocumentBuilder, LineOffset, Sentence, SuppressRule};
use akapen_text::{Line, SentenceExtractor};
use regex::Regex;
use tracing::debug;

/// Splits source text into lines.
///
/// `//@Suppress@` lines are returned as rules and replaced by blank lines,
/// so line numbers stay intact and no parser sees the directive.
pub(crate) fn split_lines(
    source: &str,
    make: fn(&str, usize) -> Line,
) -> (Vec<Line>, Vec<SuppressRule>) {
    let mut rules = Vec::new();
    let lines = source
        .lines()
        .enumerate()
        .map(|(index, text)| match SuppressRule::parse(text, index + 1) {
            Some(rule) => {
                debug!("Suppression at line {}: {:?}", index + 1, rule.validators);
                rules.push(rule);
                make("", index + 1)
            }
            None => make(text, index + 1),
        })
        .collect();
    (lines, rules)
}

/// Matches `regex` against the start of the line.
///
/// Returns the match length in characters and the capture groups, or
/// `None` when the match would cover erased or escaped characters.
pub(crate) fn prefix_match(line: &Line, regex: &Regex) -> Option<(usize, Vec<String>)> {
    let text = line.text();
    let captures = regex.captures(&text)?;
    let whole = captures.get(0)?;
    if whole.start() != 0 {
        return None;
    }

    let length = whole.as_str().chars().count();
    if (0..length).any(|i| line.char_at(i).is_none()) {
        return None;
    }

    let groups = captures
        .iter()
        .skip(1)
        .map(|group| group.map_or_else(String::new, |g| g.as_str().to_string()))
        .collect();
    Some((length, groups))
}

/// Builds a document from classified lines.
///
/// The document always starts with a level 0 section. Blank (or fully
/// erased) lines end paragraphs; list elements share one list block until
/// a paragraph or header intervenes.
pub(crate) fn build_document(
    lines: &[Line],
    suppress_rules: Vec<SuppressRule>,
    extractor: &SentenceExtractor,
    file_name: Option<&str>,
) -> Document {
    for line in lines {
        debug!("{}", line);
    }

    let mut builder = DocumentBuilder::new(file_name.map(str::to_string));
    builder.add_section(0, Vec::new());
    for rule in suppress_rules {
        builder.add_suppress_rule(rule);
    }

    let mut in_list = false;
    let mut index = 0;
    while index < lines.len() {
        let line = &lines[index];

        if line.is_empty() {
            index += 1;
            continue;
        }

        if line.section_level() > 0 {
            builder.add_section(line.section_level(), sentences_from_lines(&[line], extractor));
            in_list = false;
            index += 1;
            continue;
        }

        if line.is_list_start() {
            let level = line.list_level();
            let mut group = vec![line];
            index += 1;
            while let Some(next) = lines.get(index)
                && !next.is_empty()
                && !next.is_list_start()
                && next.section_level() == 0
                && (next.list_level() == 0 || next.list_level() == level)
            {
                group.push(next);
                index += 1;
            }

            if !in_list {
                builder.add_list_block();
                in_list = true;
            }
            builder.add_list_element(level, sentences_from_lines(&group, extractor));
            continue;
        }

        let mut group = vec![line];
        index += 1;
        while let Some(next) = lines.get(index)
            && !next.is_empty()
            && !next.is_list_start()
            && next.section_level() == 0
        {
            group.push(next);
            index += 1;
        }

        builder.add_paragraph();
        builder.add_sentences(sentences_from_lines(&group, extractor));
        in_list = false;
    }

    builder.build()
}

/// Extracts the sentences of consecutive lines.
///
/// The surviving text of the lines is joined with the broken-line
/// separator, leading whitespace of each line dropped, and split with the
/// extractor. Separator characters point just past the end of the line
/// they follow.
pub(crate) fn sentences_from_lines(lines: &[&Line], extractor: &SentenceExtractor) -> Vec<Sentence> {
    let mut run = TextRun::default();
    let mut previous: Option<&Line> = None;

    for line in lines {
        if let Some(prev) = previous
            && !run.is_empty()
        {
            run.push_separator(extractor, LineOffset::new(prev.line_no(), prev.offset(prev.len())));
        }

        let base = run.len();
        let mut skipped = 0;
        for (value, offset) in line.surviving_chars() {
            if run.len() == base && value.is_whitespace() {
                skipped += 1;
                continue;
            }
            run.push(value, LineOffset::new(line.line_no(), offset));
        }

        for (anchor, url) in line.links() {
            let position = (base + line.surviving_before(*anchor)).saturating_sub(skipped);
            run.add_link_at(position.max(base), url);
        }

        previous = Some(line);
    }

    let fallback = lines
        .first()
        .map_or(LineOffset::new(1, 0), |line| LineOffset::new(line.line_no(), 0));
    run.into_sentences(extractor, fallback)
}

/// A run of text with the original position of every character.
///
/// Collected from one paragraph, list element or header, then split into
/// sentences.
#[derive(Debug, Default)]
pub(crate) struct TextRun {
    chars: Vec<char>,
    offsets: Vec<LineOffset>,
    links: Vec<(usize, String)>,
}

impl TextRun {
    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(crate) fn push(&mut self, value: char, at: LineOffset) {
        self.chars.push(value);
        self.offsets.push(at);
    }

    /// Appends the broken-line separator, every character mapped to `at`.
    pub(crate) fn push_separator(&mut self, extractor: &SentenceExtractor, at: LineOffset) {
        for value in extractor.broken_line_separator().chars() {
            self.push(value, at);
        }
    }

    /// Records a link anchored at the current end of the run.
    pub(crate) fn add_link(&mut self, url: &str) {
        self.add_link_at(self.len(), url);
    }

    pub(crate) fn add_link_at(&mut self, position: usize, url: &str) {
        self.links.push((position, url.to_string()));
    }

    /// Splits the run into sentences.
    ///
    /// `fallback` positions a sentence that has no characters.
    pub(crate) fn into_sentences(
        self,
        extractor: &SentenceExtractor,
        fallback: LineOffset,
    ) -> Vec<Sentence> {
        let text: String = self.chars.iter().collect();
        let ranges = extractor.split(&text);
        let last = ranges.len().saturating_sub(1);

        ranges
            .iter()
            .enumerate()
            .map(|(i, range)| {
                let content: String = self.chars[range.clone()].iter().collect();
                let links = self
                    .links
                    .iter()
                    .filter(|(position, _)| {
                        range.contains(position) || (i == last && *position >= range.end)
                    })
                    .map(|(_, url)| url.clone())
                    .collect();
                Sentence::with_offsets(content, self.offsets[range.clone()].to_vec(), fallback)
                    .with_links(links)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(source: &str) -> Vec<Line> {
        split_lines(source, Line::raw).0
    }

    #[test]
    fn test_sentences_span_lines() {
        let lines = lines("This is the first\nline. Second one.");
        let refs: Vec<&Line> = lines.iter().collect();
        let sentences = sentences_from_lines(&refs, &SentenceExtractor::default());

        let contents: Vec<&str> = sentences.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["This is the first line.", " Second one."]);
        assert_eq!(sentences[1].position(), LineOffset::new(2, 6));
        assert_eq!(sentences[0].offset_at(17), Some(LineOffset::new(1, 17)));
        assert_eq!(sentences[0].offset_at(18), Some(LineOffset::new(2, 0)));
    }

    #[test]
    fn test_sentences_keep_original_offsets_after_erase() {
        let mut lines = lines("**Bold** text. More.");
        lines[0].erase(0, 2);
        lines[0].erase(6, 2);
        let refs: Vec<&Line> = lines.iter().collect();
        let sentences = sentences_from_lines(&refs, &SentenceExtractor::default());

        assert_eq!(sentences[0].content, "Bold text.");
        assert_eq!(sentences[0].start_offset, 2);
        assert_eq!(sentences[1].start_offset, 15);
    }

    #[test]
    fn test_links_follow_their_sentence() {
        let mut lines = lines("One. Two here.");
        lines[0].add_link(5, "https://example.com");
        let refs: Vec<&Line> = lines.iter().collect();
        let sentences = sentences_from_lines(&refs, &SentenceExtractor::default());

        assert!(sentences[0].links.is_empty());
        assert_eq!(sentences[1].links, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn test_build_document_groups_paragraphs() {
        let lines = lines("First para.\nStill first.\n\nSecond para.\n");
        let doc = build_document(&lines, Vec::new(), &SentenceExtractor::default(), Some("a.txt"));

        assert_eq!(doc.file_name(), Some("a.txt"));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.sections()[0].paragraphs.len(), 2);
        assert_eq!(doc.sections()[0].paragraphs[0].len(), 2);
    }

    #[test]
    fn test_build_document_list_continuation() {
        let mut lines = lines("item one\ncontinued.\nitem two\n");
        for index in [0, 2] {
            lines[index].set_list_start(true);
            lines[index].set_list_level(1);
        }
        let doc = build_document(&lines, Vec::new(), &SentenceExtractor::default(), None);

        let block = &doc.sections()[0].list_blocks[0];
        assert_eq!(block.elements.len(), 2);
        assert_eq!(block.elements[0].sentences[0].content, "item one continued.");
    }

    #[test]
    fn test_split_lines_blanks_suppress_directive() {
        let (lines, rules) = split_lines("One.\n//@Suppress@ SentenceLength\nTwo.\n", Line::raw);

        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
        assert_eq!(lines[2].line_no(), 3);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].line_number, 3);
        assert_eq!(rules[0].validators, vec!["sentencelength".to_string()]);
    }

    #[test]
    fn test_build_document_records_suppress_rules() {
        let (lines, rules) = split_lines("//@Suppress@\nQuiet.\n", Line::raw);
        let doc = build_document(&lines, rules, &SentenceExtractor::default(), None);

        assert_eq!(doc.suppress_rules().len(), 1);
        assert_eq!(doc.sentences().next().unwrap().line_number, 2);
        assert!(doc.is_suppressed("Anything", 2));
    }

    #[test]
    fn test_prefix_match_rejects_erased() {
        let regex = Regex::new(r"^(-+) ").unwrap();
        let mut line = Line::raw("-- item", 1);
        assert_eq!(prefix_match(&line, &regex), Some((3, vec!["--".to_string()])));
        line.erase(0, 1);
        assert_eq!(prefix_match(&line, &regex), None);
    }
}
