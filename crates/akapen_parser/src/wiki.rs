//! Wiki markup parser.
//!
//! Supported syntax:
//!
//! - headers `h1. Title` to `h6. Title`
//! - bullet lists `- item`, `-- nested item`, numbered lists `# item`
//! - links `[[url]]` and `[[label|url]]`
//! - inline `//italic//`, `__underline__`, `**bold**`, `--strike--`
//! - comment blocks `[!-- ... --]`, possibly spanning lines

use std::sync::LazyLock;

use akapen_model::Document;
use akapen_text::{EraseStyle, Line, SentenceExtractor};
use regex::Regex;
use tracing::warn;

use crate::lines::{build_document, prefix_match, split_lines};
use crate::{ParseError, Parser};

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^h([1-6])\. ").unwrap());
static LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(-+) ").unwrap());
static NUMBERED_LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+) ").unwrap());

const INLINE_MARKERS: [(&str, &str); 4] = [("//", "//"), ("__", "__"), ("**", "**"), ("--", "--")];

/// Parser for wiki markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikiParser;

#[derive(Debug, Default, Clone, Copy)]
struct State {
    in_comment: bool,
}

impl WikiParser {
    /// Creates a new wiki parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for WikiParser {
    fn name(&self) -> &str {
        "wiki"
    }

    fn extensions(&self) -> &[&str] {
        &["wiki"]
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
        if state.in_comment {
            warn!("Unterminated comment block at end of wiki document");
        }
        Ok(build_document(&lines, suppress_rules, extractor, file_name))
    }
}

fn process_line(line: &mut Line, mut state: State) -> State {
    if !state.in_comment && line.starts_with("[!--") {
        state.in_comment = true;
    }
    if state.in_comment {
        state.in_comment = !line.text().ends_with("--]");
        line.erase_all();
        line.set_in_block(true);
        return state;
    }

    if let Some((length, groups)) = prefix_match(line, &HEADER) {
        let level = groups[0].parse().unwrap_or(1);
        line.erase(0, length);
        line.set_section_level(level);
    } else if let Some((length, groups)) =
        prefix_match(line, &LIST).or_else(|| prefix_match(line, &NUMBERED_LIST))
    {
        line.erase(0, length);
        line.set_list_level(groups[0].chars().count());
        line.set_list_start(true);
    }

    extract_links(line);
    for (open, close) in INLINE_MARKERS {
        line.erase_enclosure(open, close, EraseStyle::Markers);
    }
    state
}

/// Erases `[[...]]` link markup, keeping the label and recording the URL.
fn extract_links(line: &mut Line) {
    let mut from = 0;
    while let Some(start) = line.find("[[", from) {
        let inner_start = start + 2;
        let Some(end) = line.find("]]", inner_start) else {
            break;
        };
        let inner: String = (inner_start..end).filter_map(|i| line.raw_char_at(i)).collect();
        let parts: Vec<&str> = inner.split('|').collect();

        line.erase(start, 2);
        match parts.as_slice() {
            [url] if url.trim().is_empty() => {
                warn!("Invalid link block at line {}: vacant block", line.line_no());
                line.erase(end, 2);
            }
            [url] => {
                line.protect(inner_start, end - inner_start);
                line.add_link(inner_start, url.trim());
                line.erase(end, 2);
            }
            [label, url, rest @ ..] => {
                if !rest.is_empty() {
                    warn!(
                        "Invalid link block at line {}: more than two link parts",
                        line.line_no()
                    );
                }
                let bar = inner_start + label.chars().count();
                line.add_link(inner_start, url.trim());
                line.erase(bar, end + 2 - bar);
            }
            [] => {}
        }
        from = end + 2;
    }
}
