//! Re:VIEW parser.

use std::sync::LazyLock;

use akapen_model::Document;
use akapen_text::{EraseStyle, Line, SentenceExtractor};
use regex::Regex;
use tracing::{debug, warn};

use crate::lines::{build_document, prefix_match, split_lines};
use crate::{ParseError, Parser};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(=+)(\[[^\]]*\])?(\{[^}]*\})?\s+").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+(\*+)\s+").unwrap());
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+[0-9]+\.\s+").unwrap());
static DEFINITION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+:\s+").unwrap());

/// Inline tags whose delimiters are erased while their content is kept.
const INLINE_TAGS: [&str; 25] = [
    "list", "code", "img", "table", "fn", "chap", "title", "chapref", "bou", "kw", "chapter",
    "ruby", "ami", "b", "i", "strong", "em", "tt", "tti", "ttb", "u", "br", "icon", "uchar",
    "column",
];

const RAW_TARGETS: [&str; 4] = ["html", "latex", "idgxml", "top"];

/// Preprocessor annotations removed together with their arguments.
const PREPROCESSOR: [&str; 5] = ["#@warn(", "@comment(", "#@mapfile(", "#@maprange(", "#@mapoutput("];

/// Blocks whose lines are prose and stay subject to validation.
const PROSE_BLOCKS: [&str; 10] = [
    "lead", "quote", "note", "memo", "tip", "info", "warning", "important", "caution", "notice",
];

/// Parser for Re:VIEW.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewParser;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct State {
    block: Option<ReviewBlock>,
    labelled: Labelled,
}

/// Position within a labelled (` : term`) list entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Labelled {
    #[default]
    None,
    Term,
    Description,
}

/// A `//name[...]{` block header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReviewBlock {
    name: String,
    properties: Vec<String>,
    open: bool,
}

impl ReviewBlock {
    /// Parses a line starting with `//`.
    fn parse(text: &str) -> Self {
        let body = text.trim_start_matches('/');
        let name_end = body.find(['[', '{']).unwrap_or(body.len());
        let name = body[..name_end].trim().to_string();

        let mut properties = Vec::new();
        let mut rest = &body[name_end..];
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(close) = stripped.find(']') else {
                break;
            };
            properties.push(stripped[..close].to_string());
            rest = &stripped[close + 1..];
        }

        Self {
            name,
            properties,
            open: rest.starts_with('{'),
        }
    }

    fn is_prose(&self) -> bool {
        PROSE_BLOCKS.contains(&self.name.as_str())
    }
}

impl ReviewParser {
    /// Creates a new Re:VIEW parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ReviewParser {
    fn name(&self) -> &str {
        "review"
    }

    fn extensions(&self) -> &[&str] {
        &["re", "review"]
    }

    fn parse(
        &self,
        source: &str,
        file_name: Option<&str>,
        extractor: &SentenceExtractor,
    ) -> Result<Document, ParseError> {
        let (mut lines, suppress_rules) = split_lines(source, Line::raw);
        let state = lines
            .iter_mut()
            .fold(State::default(), |state, line| process_line(line, state));
        if let Some(block) = state.block {
            warn!("Unterminated //{} block at end of Re:VIEW document", block.name);
        }
        Ok(build_document(&lines, suppress_rules, extractor, file_name))
    }
}

fn process_line(line: &mut Line, mut state: State) -> State {
    let text = line.text();

    if let Some(prose) = state.block.as_ref().map(ReviewBlock::is_prose) {
        if text == "//}" {
            line.erase_all();
            state.block = None;
            return state;
        }
        if !prose {
            line.erase_all();
            line.set_in_block(true);
            return state;
        }
        line.set_in_block(true);
        erase_inline_markup(line);
        return state;
    }

    if text.starts_with("//") {
        let block = ReviewBlock::parse(&text);
        line.erase_all();
        if block.open {
            debug!(
                "Line {} opens //{} block {:?}",
                line.line_no(),
                block.name,
                block.properties
            );
            state.block = Some(block);
        }
        return state;
    }

    if text.starts_with("#@#") || text.starts_with("#@end") {
        line.erase_all();
        return state;
    }

    if line.is_empty() {
        state.labelled = Labelled::None;
        return state;
    }

    if let Some((length, groups)) = prefix_match(line, &HEADING) {
        line.erase(0, length);
        line.set_section_level(groups[0].chars().count());
        state.labelled = Labelled::None;
    } else if let Some((length, groups)) = prefix_match(line, &BULLET) {
        line.erase(0, length);
        line.set_list_level(groups[0].chars().count());
        line.set_list_start(true);
        state.labelled = Labelled::None;
    } else if let Some((length, _)) = prefix_match(line, &ORDERED) {
        line.erase(0, length);
        line.set_list_level(1);
        line.set_list_start(true);
        state.labelled = Labelled::None;
    } else if prefix_match(line, &DEFINITION).is_some() {
        line.erase_all();
        state.labelled = Labelled::Term;
        return state;
    } else if state.labelled != Labelled::None {
        // Description of a labelled list entry, up to the next blank line.
        line.set_list_level(1);
        line.set_list_start(state.labelled == Labelled::Term);
        state.labelled = Labelled::Description;
    }

    erase_inline_markup(line);
    state
}

fn erase_inline_markup(line: &mut Line) {
    extract_href(line);
    for tag in INLINE_TAGS {
        line.erase_enclosure(&format!("@<{}>{{", tag), "}", EraseStyle::Markers);
    }
    line.erase_enclosure("@<m>{", "}", EraseStyle::All);
    for target in RAW_TARGETS {
        line.erase_enclosure(&format!("@<raw>{{{}|", target), "}", EraseStyle::Markers);
    }
    for open in PREPROCESSOR {
        line.erase_enclosure(open, ")", EraseStyle::All);
    }
}

/// Erases `@<href>{url, label}` markup, keeping the label when present
/// and recording the URL as a link.
fn extract_href(line: &mut Line) {
    const OPEN: &str = "@<href>{";
    let open_len = OPEN.chars().count();

    let mut from = 0;
    while let Some(start) = line.find(OPEN, from) {
        let inner_start = start + open_len;
        let Some(end) = line.find("}", inner_start) else {
            break;
        };
        let inner: String = (inner_start..end).filter_map(|i| line.raw_char_at(i)).collect();

        line.erase(start, open_len);
        line.erase(end, 1);
        match inner.split_once(',') {
            Some((url, _)) => {
                let label_start = inner_start + url.chars().count() + 1;
                line.erase(inner_start, label_start - inner_start);
                line.erase_while(label_start, char::is_whitespace);
                line.add_link(label_start, url.trim());
            }
            None => {
                line.protect(inner_start, end - inner_start);
                line.add_link(inner_start, inner.trim());
            }
        }
        from = end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akapen_model::LineOffset;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        ReviewParser::new()
            .parse(source, Some("ch01.re"), &SentenceExtractor::default())
            .unwrap()
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.sentences().map(|s| s.content.clone()).collect()
    }

    #[test]
    fn test_block_header_parsing() {
        let block = ReviewBlock::parse("//list[yml_sample][my.yml]{");
        assert_eq!(block.name, "list");
        assert_eq!(block.properties, vec!["yml_sample", "my.yml"]);
        assert!(block.open);

        let block = ReviewBlock::parse("//lead{");
        assert_eq!(block.name, "lead");
        assert!(block.properties.is_empty());

        let block = ReviewBlock::parse("//image[fig][caption]");
        assert!(!block.open);
    }

    #[test]
    fn test_multiple_short_lines() {
        let doc = parse("Tokyu\nis a good\nrailway company. But there\nare competitors.");
        let sentences: Vec<_> = doc.sentences().collect();

        assert_eq!(sentences[0].content, "Tokyu is a good railway company.");
        assert_eq!(sentences[0].offset_map().len(), 32);
        assert_eq!(sentences[1].content, " But there are competitors.");
        assert_eq!(sentences[1].position(), LineOffset::new(3, 16));
    }

    #[test]
    fn test_inline_tag_offsets() {
        let doc = parse("It is a @<b>{good} day.");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "It is a good day.");
        let offsets: Vec<usize> = sentence.offset_map().iter().map(|o| o.offset).collect();
        assert_eq!(
            offsets,
            vec![0, 1, 2, 3, 4, 5, 6, 7, 13, 14, 15, 16, 18, 19, 20, 21, 22]
        );
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let doc = parse("= About @<i>{Gekioko}.\n\nGekioko means angry.");

        assert_eq!(doc.sections()[1].level, 1);
        assert_eq!(doc.sections()[1].header_text(), "About Gekioko.");
    }

    #[test]
    fn test_heading_with_label() {
        let doc = parse("=={intro} Introduction\nText.\n");
        assert_eq!(doc.sections()[1].level, 2);
        assert_eq!(doc.sections()[1].header_text(), "Introduction");
    }

    #[test]
    fn test_bullet_list_levels() {
        let doc = parse(
            "There are several railway companies.\n\n * Tokyu\n ** Toyoko Line\n ** Denentoshi Line\n * Keio\n  * Odakyu\n",
        );
        let block = &doc.sections()[0].list_blocks[0];

        let levels: Vec<usize> = block.elements.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 2, 1, 1]);
        assert_eq!(block.elements[0].sentences[0].position(), LineOffset::new(3, 3));
        assert_eq!(block.elements[4].sentences[0].position(), LineOffset::new(7, 4));
    }

    #[test]
    fn test_labelled_list() {
        let doc = parse(
            "= Terms\n\n : Release\nShipping software to customers.\n\n : Akapen\nA proofreading tool.\n",
        );
        let block = &doc.sections()[1].list_blocks[0];

        assert_eq!(block.elements.len(), 2);
        assert_eq!(block.elements[0].sentences[0].content, "Shipping software to customers.");
        assert_eq!(block.elements[1].sentences[0].line_number, 7);
    }

    #[test]
    fn test_comments_are_erased() {
        let doc = parse("#@# BLAH BLAH\nPotato\n#@warn(check this)\n#@end\n");
        assert_eq!(contents(&doc), vec!["Potato"]);
    }

    #[test]
    fn test_code_block_is_erased() {
        let doc = parse("Before.\n//list[sample][Sample]{\nlet x = 1. Not prose.\n\n//}\nAfter.\n");
        assert_eq!(contents(&doc), vec!["Before.", "After."]);
    }

    #[test]
    fn test_prose_block_is_kept() {
        let doc = parse("//lead{\nThis chapter is about @<b>{trains}.\n//}\n");
        assert_eq!(contents(&doc), vec!["This chapter is about trains."]);
    }

    #[test]
    fn test_single_line_block_is_erased() {
        let doc = parse("//image[fig][A picture]\nText.\n");
        assert_eq!(contents(&doc), vec!["Text."]);
    }

    #[test]
    fn test_math_is_removed() {
        let doc = parse("Compute @<m>{x^2} now.\n");
        assert_eq!(contents(&doc), vec!["Compute  now."]);
    }

    #[test]
    fn test_href_with_label() {
        let doc = parse("See @<href>{https://example.com, the site} now.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "See the site now.");
        assert_eq!(sentence.links, vec!["https://example.com".to_string()]);
    }

    #[test]
    fn test_href_without_label() {
        let doc = parse("Visit @<href>{https://example.com/a}.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "Visit https://example.com/a.");
        assert_eq!(sentence.links, vec!["https://example.com/a".to_string()]);
    }

    #[test]
    fn test_raw_markup() {
        let doc = parse("A @<raw>{html|<br>} break.\n");
        assert_eq!(contents(&doc), vec!["A <br> break."]);
    }

    #[test]
    fn test_unterminated_block_runs_to_end() {
        let doc = parse("Intro.\n//emlist{\nnever closed.\n");
        assert_eq!(contents(&doc), vec!["Intro."]);
    }
}
