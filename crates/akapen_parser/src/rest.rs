//! reStructuredText parser.
//!
//! Every line goes through an ordered battery of checks: section titles
//! (over/underlined), inline markup, lists, tables, directives, literal
//! blocks, comments, footnotes and line blocks. Lines inside a block are
//! erased until a blank line followed by an unindented line, or an
//! unindented line, closes the block.

use std::sync::LazyLock;

use akapen_model::Document;
use akapen_text::{EraseStyle, Line, SentenceExtractor};
use regex::Regex;
use tracing::debug;

use crate::lines::{build_document, prefix_match, split_lines};
use crate::{ParseError, Parser};

static DIGIT_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[0-9#]+\.\s+").unwrap());
static GRID_TABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+][-+]+[+]$").unwrap());
static SIMPLE_TABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^=+[= ]+=$").unwrap());
static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\. [a-z][a-z-]*::").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.\. [^\[][^:]+$").unwrap());
static TARGET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.\. _[^:]*:").unwrap());
static FOOTNOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\. \[[^\]]+\]\s+").unwrap());

/// Inline markup, tried in this order.
///
/// Single-character delimiters come before their doubled forms; the
/// boundary rules of [`EraseStyle::InlineMarkup`] keep `*` from matching
/// inside `**strong**`.
const INLINE_MARKUP: [(&str, &str); 11] = [
    (":ref:`", "`"),
    ("`", "`:sup:"),
    ("`", "`sub:"),
    ("*", "*"),
    ("**", "**"),
    ("`", "`"),
    ("``", "``"),
    ("`", "`_"),
    ("_`", "`"),
    ("[", "]_"),
    ("|", "|"),
];

const ADORNMENTS: &str = "#*=-~^";

/// Parser for reStructuredText.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReStructuredTextParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Directive,
    Literal,
    Comment,
}

#[derive(Debug, Default, Clone, Copy)]
struct State {
    block: Option<Block>,
    in_table: bool,
    in_list: bool,
    list_level: usize,
    pending_item: bool,
}

impl ReStructuredTextParser {
    /// Creates a new reStructuredText parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for ReStructuredTextParser {
    fn name(&self) -> &str {
        "rest"
    }

    fn extensions(&self) -> &[&str] {
        &["rst", "rest"]
    }

    fn parse(
        &self,
        source: &str,
        file_name: Option<&str>,
        extractor: &SentenceExtractor,
    ) -> Result<Document, ParseError> {
        let (mut lines, suppress_rules) = split_lines(source, Line::new);
        (0..lines.len()).fold(State::default(), |state, index| {
            process_line(&mut lines, index, state)
        });
        Ok(build_document(&lines, suppress_rules, extractor, file_name))
    }
}

fn process_line(lines: &mut [Line], index: usize, mut state: State) -> State {
    if lines[index].is_erased() {
        return state;
    }
    if lines[index].section_level() > 0 {
        erase_inline_markup(&mut lines[index]);
        return state;
    }

    let next_indented = lines.get(index + 1).is_some_and(is_indented);

    if let Some(block) = state.block {
        if lines[index].is_empty() {
            return if next_indented { state } else { State::default() };
        }
        if is_indented(&lines[index]) {
            let line = &mut lines[index];
            line.erase_all();
            line.set_in_block(true);
            return state;
        }
        debug!("{:?} block closed by dedent at line {}", block, index + 1);
        state = State::default();
    }

    if lines[index].is_empty() {
        if next_indented {
            state.in_table = false;
            state.pending_item = state.in_list;
            return state;
        }
        return State::default();
    }

    if let Some(level) = section_title(lines, index) {
        if level > 0 {
            lines[index].set_section_level(level);
            erase_inline_markup(&mut lines[index]);
        }
        return State::default();
    }

    let next_empty = lines.get(index + 1).is_none_or(Line::is_empty);
    let line = &mut lines[index];
    erase_inline_markup(line);

    if list_item(line, &mut state, next_indented) {
        return state;
    }

    let text = line.text();
    if state.in_table {
        line.erase_all();
        return state;
    }
    if GRID_TABLE.is_match(&text) || SIMPLE_TABLE.is_match(&text) {
        line.erase_all();
        state.in_table = true;
        return state;
    }

    if DIRECTIVE.is_match(&text) {
        line.erase_all();
        state.block = Some(Block::Directive);
        return state;
    }

    if text.ends_with("::") && next_empty {
        if text == "::" {
            line.erase_all();
        } else {
            line.erase(line.len() - 1, 1);
        }
        state.block = Some(Block::Literal);
        return state;
    }

    if text == ".." || COMMENT.is_match(&text) || TARGET.is_match(&text) {
        line.erase_all();
        state.block = Some(Block::Comment);
        return state;
    }

    if let Some((length, _)) = prefix_match(line, &FOOTNOTE) {
        line.erase(0, length);
        return state;
    }

    if line.starts_with("| ") || line.starts_with(">>>") {
        line.erase_all();
    }
    state
}

fn erase_inline_markup(line: &mut Line) {
    for (open, close) in INLINE_MARKUP {
        line.erase_enclosure(open, close, EraseStyle::InlineMarkup);
    }
}

fn is_indented(line: &Line) -> bool {
    !line.is_empty() && matches!(line.raw_char_at(0), Some(' ' | '\t'))
}

fn adornment(line: &Line) -> Option<char> {
    let first = line.char_at(0)?;
    (line.len() >= 2 && ADORNMENTS.contains(first) && line.consists_of(first)).then_some(first)
}

fn is_title_text(line: &Line) -> bool {
    !line.is_empty() && !is_indented(line) && adornment(line).is_none()
}

/// Level of a title adorned with `over` (optional) and `under`.
///
/// Zero marks a subtitle: its adornment is dropped but no section opens.
fn title_level(over: Option<char>, under: char) -> Option<usize> {
    match (over, under) {
        (Some('#'), '#') => Some(1),
        (Some('*'), '*') => Some(2),
        (Some('='), '=') => Some(3),
        (None, '=') => Some(4),
        (Some('-'), '-') => Some(0),
        (None, '-') => Some(5),
        (Some('~'), '~') => Some(6),
        (None, '~') => Some(7),
        (Some('^'), '^') => Some(8),
        (None, '^') => Some(9),
        _ => None,
    }
}

/// Detects a section title starting at `index` and erases its adornment.
///
/// Handles an overline at `index` (title on the next line) and a title at
/// `index` with an underline. A lone adornment line between blank lines is
/// a transition and is erased as well.
fn section_title(lines: &mut [Line], index: usize) -> Option<usize> {
    let previous_blank = index == 0 || lines[index - 1].is_empty();

    if let Some(over) = adornment(&lines[index]) {
        let titled = lines.get(index + 1).is_some_and(is_title_text)
            && lines.get(index + 2).and_then(adornment) == Some(over);
        if titled && let Some(level) = title_level(Some(over), over) {
            lines[index].erase_all();
            lines[index + 2].erase_all();
            lines[index + 1].set_section_level(level);
            // The title line is handled on its own turn.
            return Some(0);
        }

        let next_blank = lines.get(index + 1).is_none_or(Line::is_empty);
        if previous_blank && next_blank && lines[index].len() >= 4 {
            lines[index].erase_all();
            return Some(0);
        }
        return None;
    }

    if !previous_blank || !is_title_text(&lines[index]) {
        return None;
    }
    let under = lines.get(index + 1).and_then(adornment)?;
    let level = title_level(None, under)?;
    lines[index + 1].erase_all();
    Some(level)
}

/// Classifies bullet, enumerated and definition list lines.
fn list_item(line: &mut Line, state: &mut State, next_indented: bool) -> bool {
    let indent = line.indentation();

    let bullet = line
        .char_at(indent)
        .is_some_and(|c| matches!(c, '*' | '-' | '+'))
        && line.raw_char_at(indent + 1).is_some_and(char::is_whitespace);
    let marker = if bullet {
        Some(indent + 1)
    } else {
        prefix_match(line, &DIGIT_LIST).map(|(length, _)| length)
    };

    if let Some(marker) = marker {
        line.erase(0, marker);
        line.erase_while(marker, char::is_whitespace);
        let level = indent / 2 + 1;
        line.set_list_level(level);
        line.set_list_start(true);
        state.in_list = true;
        state.list_level = level;
        state.pending_item = false;
        return true;
    }

    let text = line.text();
    if indent == 0 && next_indented && !text.ends_with(':') && !text.starts_with("..") {
        line.erase_all();
        state.in_list = true;
        state.list_level = 1;
        state.pending_item = true;
        return true;
    }

    if state.in_list && indent > 0 {
        line.erase(0, indent);
        line.set_list_level(state.list_level);
        line.set_list_start(state.pending_item);
        state.pending_item = false;
        return true;
    }

    state.in_list = false;
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        ReStructuredTextParser::new()
            .parse(source, Some("doc.rst"), &SentenceExtractor::default())
            .unwrap()
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.sentences().map(|s| s.content.clone()).collect()
    }

    fn list_levels(doc: &Document) -> Vec<usize> {
        doc.sections()[0].list_blocks[0]
            .elements
            .iter()
            .map(|e| e.level)
            .collect()
    }

    #[test]
    fn test_parse_underlined_sections() {
        let doc = parse("Title\n=====\n\nText here.\n\nSub\n---\n\nMore text.\n");

        let levels: Vec<usize> = doc.sections().iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![0, 4, 5]);
        assert_eq!(doc.sections()[1].header_text(), "Title");
        assert_eq!(contents(&doc), vec!["Title", "Text here.", "Sub", "More text."]);
    }

    #[test]
    fn test_parse_overlined_section() {
        let doc = parse("#####\nPart\n#####\n\nBody.\n");

        assert_eq!(doc.sections()[1].level, 1);
        assert_eq!(doc.sections()[1].header_text(), "Part");
        assert_eq!(doc.sections()[1].header_contents[0].line_number, 2);
    }

    #[test]
    fn test_parse_subtitle_stays_text() {
        let doc = parse("-----\nSubtitle\n-----\n\nBody.\n");

        assert_eq!(doc.len(), 1);
        assert_eq!(contents(&doc), vec!["Subtitle", "Body."]);
    }

    #[test]
    fn test_parse_transition_is_erased() {
        let doc = parse("Before.\n\n----------\n\nAfter.\n");
        assert_eq!(contents(&doc), vec!["Before.", "After."]);
    }

    #[test]
    fn test_parse_inline_markup() {
        let doc = parse("This is *emphasis*, **strong** and ``code``.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "This is emphasis, strong and code.");
        assert_eq!(sentence.offset_at(8).map(|o| o.offset), Some(9));
        assert_eq!(sentence.offset_at(18).map(|o| o.offset), Some(22));
    }

    #[test]
    fn test_parse_references() {
        let doc = parse("See :ref:`intro` and `Python`_ or [1]_.\n");
        assert_eq!(contents(&doc), vec!["See intro and Python or 1."]);
    }

    #[test]
    fn test_parse_escaped_markup() {
        let doc = parse("Not \\*emphasis\\* here.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "Not *emphasis* here.");
        assert_eq!(sentence.offset_at(4).map(|o| o.offset), Some(5));
    }

    #[test]
    fn test_parse_bullet_lists() {
        let doc = parse("* one\n* two\n\n  * nested\n- three\n");
        assert_eq!(list_levels(&doc), vec![1, 1, 2, 1]);
        assert_eq!(doc.sections()[0].list_blocks[0].elements[2].sentences[0].content, "nested");
    }

    #[test]
    fn test_parse_bullet_continuation() {
        let doc = parse("* first item\n  continues here.\n* second\n");
        let block = &doc.sections()[0].list_blocks[0];

        assert_eq!(block.elements.len(), 2);
        assert_eq!(block.elements[0].sentences[0].content, "first item continues here.");
    }

    #[test]
    fn test_parse_enumerated_list() {
        let doc = parse("1. first\n2. second\n#. third\n");
        assert_eq!(list_levels(&doc), vec![1, 1, 1]);
    }

    #[test]
    fn test_parse_number_in_text_is_not_list() {
        let doc = parse("3.14 is pi.\n");
        assert!(doc.sections()[0].list_blocks.is_empty());
        assert_eq!(contents(&doc), vec!["3.14 is pi."]);
    }

    #[test]
    fn test_parse_definition_list() {
        let doc = parse("term\n    Definition text.\n");
        let block = &doc.sections()[0].list_blocks[0];

        assert_eq!(block.elements.len(), 1);
        assert_eq!(block.elements[0].level, 1);
        assert_eq!(block.elements[0].sentences[0].content, "Definition text.");
    }

    #[test]
    fn test_parse_directive_block() {
        let doc = parse(".. code-block:: python\n\n   print('x')\n\nAfter.\n");
        assert_eq!(contents(&doc), vec!["After."]);
    }

    #[test]
    fn test_parse_literal_block() {
        let doc = parse("Example::\n\n    code here.\n\nDone.\n");
        assert_eq!(contents(&doc), vec!["Example:", "Done."]);
    }

    #[test]
    fn test_parse_comments_and_targets() {
        let doc = parse(".. a comment\nText.\n\n.. _site: https://example.com\n\nEnd.\n");
        assert_eq!(contents(&doc), vec!["Text.", "End."]);
    }

    #[test]
    fn test_parse_tables() {
        let doc = parse("+---+---+\n| a | b |\n+---+---+\n\n=== ===\nA   B\n=== ===\n\nAfter.\n");
        assert_eq!(contents(&doc), vec!["After."]);
    }

    #[test]
    fn test_parse_footnote_keeps_text() {
        let doc = parse(".. [1] Footnote text.\n");
        assert_eq!(contents(&doc), vec!["Footnote text."]);
    }

    #[test]
    fn test_parse_line_block() {
        let doc = parse("| quoted line\n>>> print(1)\nText.\n");
        assert_eq!(contents(&doc), vec!["Text."]);
    }
}
