//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! The source is parsed to mdast with GFM extensions and front matter
//! enabled, then walked to build the document: headings open sections,
//! paragraphs and list items carry sentences, block quotes are traversed.
//! Code, HTML, tables, thematic breaks and front matter are skipped.

use akapen_model::{Document, DocumentBuilder, LineOffset, Sentence};
use akapen_text::SentenceExtractor;
use markdown::mdast::Node;
use markdown::unist::Position;
use markdown::{Constructs, ParseOptions, to_mdast};

use crate::lines::TextRun;
use crate::{ParseError, Parser};

/// Markdown parser implementation.
///
/// Uses `markdown-rs` for parsing, which supports:
/// - CommonMark
/// - GFM (GitHub Flavored Markdown)
/// - Frontmatter
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser;

impl MarkdownParser {
    /// Creates a new Markdown parser with default options.
    pub fn new() -> Self {
        Self
    }

    /// Gets default parse options (GFM with front matter).
    fn default_options() -> ParseOptions {
        ParseOptions {
            constructs: Constructs {
                frontmatter: true,
                ..Constructs::gfm()
            },
            ..ParseOptions::gfm()
        }
    }
}

impl Parser for MarkdownParser {
    fn name(&self) -> &str {
        "markdown"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkdn", "mkd"]
    }

    fn parse(
        &self,
        source: &str,
        file_name: Option<&str>,
        extractor: &SentenceExtractor,
    ) -> Result<Document, ParseError> {
        let options = Self::default_options();
        let mdast =
            to_mdast(source, &options).map_err(|e| ParseError::invalid_source(e.to_string()))?;

        let mut converter = Converter::new(source, extractor, file_name);
        converter.visit(&mdast);
        Ok(converter.builder.build())
    }
}

/// Maps byte offsets of the source to line and character positions.
struct SourceMap<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> SourceMap<'s> {
    fn new(source: &'s str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    fn position(&self, byte: usize) -> LineOffset {
        let line = self.line_starts.partition_point(|&start| start <= byte).max(1);
        let start = self.line_starts[line - 1];
        let column = self
            .source
            .get(start..byte)
            .map_or(0, |prefix| prefix.chars().count());
        LineOffset::new(line, column)
    }
}

struct Converter<'a> {
    map: SourceMap<'a>,
    extractor: &'a SentenceExtractor,
    builder: DocumentBuilder,
    list_depth: usize,
}

impl<'a> Converter<'a> {
    fn new(source: &'a str, extractor: &'a SentenceExtractor, file_name: Option<&str>) -> Self {
        Self {
            map: SourceMap::new(source),
            extractor,
            builder: DocumentBuilder::new(file_name.map(str::to_string)),
            list_depth: 0,
        }
    }

    fn visit(&mut self, node: &Node) {
        match node {
            Node::Root(root) => {
                self.builder.add_section(0, Vec::new());
                self.visit_all(&root.children);
            }

            Node::Heading(heading) => {
                let sentences = self.sentences(&heading.children, node.position());
                self.builder.add_section(heading.depth as usize, sentences);
            }

            Node::Paragraph(paragraph) => {
                let sentences = self.sentences(&paragraph.children, node.position());
                self.builder.add_paragraph();
                self.builder.add_sentences(sentences);
            }

            Node::List(list) => {
                if self.list_depth == 0 {
                    self.builder.add_list_block();
                }
                self.list_depth += 1;
                self.visit_all(&list.children);
                self.list_depth -= 1;
            }

            Node::ListItem(item) => self.visit_list_item(&item.children),

            Node::Blockquote(quote) => self.visit_all(&quote.children),

            Node::FootnoteDefinition(definition) => self.visit_all(&definition.children),

            // Code, HTML, tables, thematic breaks, front matter, definitions.
            _ => {}
        }
    }

    fn visit_all(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.visit(node);
        }
    }

    /// Adds the list elements of one item.
    ///
    /// The item's own text becomes an element before those of its nested
    /// lists; text following a nested list becomes a further element at the
    /// item's level.
    fn visit_list_item(&mut self, children: &[Node]) {
        let level = self.list_depth.max(1);
        let mut sentences = Vec::new();
        let mut added = false;

        self.collect_item(children, level, &mut sentences, &mut added);

        if !sentences.is_empty() {
            self.builder.add_list_element(level, sentences);
        }
    }

    fn collect_item(
        &mut self,
        children: &[Node],
        level: usize,
        sentences: &mut Vec<Sentence>,
        added: &mut bool,
    ) {
        for child in children {
            match child {
                Node::Paragraph(paragraph) => {
                    sentences.extend(self.sentences(&paragraph.children, child.position()));
                }
                Node::Heading(heading) => {
                    sentences.extend(self.sentences(&heading.children, child.position()));
                }
                Node::List(_) => {
                    if !*added || !sentences.is_empty() {
                        self.builder.add_list_element(level, std::mem::take(sentences));
                        *added = true;
                    }
                    self.visit(child);
                }
                Node::Blockquote(quote) => {
                    self.collect_item(&quote.children, level, sentences, added);
                }
                Node::FootnoteDefinition(definition) => {
                    self.collect_item(&definition.children, level, sentences, added);
                }
                // Code, HTML, tables, thematic breaks.
                _ => {}
            }
        }
    }

    fn sentences(&self, inline: &[Node], position: Option<&Position>) -> Vec<Sentence> {
        let mut run = TextRun::default();
        self.collect_inline(inline, &mut run);
        let fallback = position.map_or(LineOffset::new(1, 0), |p| self.map.position(p.start.offset));
        run.into_sentences(self.extractor, fallback)
    }

    fn collect_inline(&self, nodes: &[Node], run: &mut TextRun) {
        for node in nodes {
            match node {
                Node::Text(text) => self.push_value(&text.value, node.position(), run),
                Node::InlineCode(code) => self.push_value(&code.value, node.position(), run),
                Node::Emphasis(emphasis) => self.collect_inline(&emphasis.children, run),
                Node::Strong(strong) => self.collect_inline(&strong.children, run),
                Node::Delete(delete) => self.collect_inline(&delete.children, run),
                Node::Link(link) => {
                    run.add_link(&link.url);
                    self.collect_inline(&link.children, run);
                }
                Node::LinkReference(reference) => self.collect_inline(&reference.children, run),
                Node::Break(_) => {
                    if let Some(position) = node.position() {
                        run.push_separator(self.extractor, self.map.position(position.start.offset));
                    }
                }
                _ => {}
            }
        }
    }

    /// Appends `value`, mapping each character to where it appears in the
    /// source span of its node.
    ///
    /// Characters missing from the source (entities, escapes) take the
    /// position of the next source character. Line breaks become the
    /// broken-line separator.
    fn push_value(&self, value: &str, position: Option<&Position>, run: &mut TextRun) {
        let Some(position) = position else {
            for c in value.chars() {
                run.push(c, LineOffset::new(1, 0));
            }
            return;
        };

        let span: Vec<(usize, char)> = self
            .map
            .source
            .get(position.start.offset..position.end.offset)
            .map(|s| s.char_indices().collect())
            .unwrap_or_default();

        let mut cursor = 0;
        for c in value.chars() {
            if let Some(found) = span[cursor..].iter().position(|(_, s)| *s == c) {
                cursor += found;
            }
            let byte = span
                .get(cursor)
                .map_or(position.end.offset, |(i, _)| position.start.offset + i);
            let at = self.map.position(byte);

            if c == '\n' {
                run.push_separator(self.extractor, at);
            } else {
                run.push(c, at);
            }
            if cursor < span.len() && span[cursor].1 == c {
                cursor += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Document {
        MarkdownParser::new()
            .parse(source, Some("README.md"), &SentenceExtractor::default())
            .unwrap()
    }

    fn contents(doc: &Document) -> Vec<String> {
        doc.sentences().map(|s| s.content.clone()).collect()
    }

    #[test]
    fn test_parse_heading_and_paragraph() {
        let doc = parse("# Title\nHello world.\n");

        let levels: Vec<usize> = doc.sections().iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![0, 1]);
        let section = &doc.sections()[1];
        assert_eq!(section.header_text(), "Title");
        assert_eq!(section.header_contents[0].position(), LineOffset::new(1, 2));
        assert_eq!(section.paragraphs[0].sentences[0].content, "Hello world.");
        assert_eq!(section.paragraphs[0].sentences[0].line_number, 2);
    }

    #[test]
    fn test_parse_heading_nesting() {
        let doc = parse("# A\n\n## B\n\n### C\n\n## D\n");
        let sections = doc.sections();

        assert_eq!(sections[4].level, 2);
        assert_eq!(sections[4].parent(), sections[2].parent());
        assert_eq!(sections[1].subsections().len(), 2);
        assert_eq!(sections[2].subsections().len(), 1);
    }

    #[test]
    fn test_parse_inline_markup_offsets() {
        let doc = parse("This is **bold** and `code`.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "This is bold and code.");
        assert_eq!(sentence.offset_at(8), Some(LineOffset::new(1, 10)));
        assert_eq!(sentence.offset_at(17), Some(LineOffset::new(1, 22)));
    }

    #[test]
    fn test_parse_soft_break_joins_lines() {
        let doc = parse("A sentence that\n  continues here. Next.\n");

        assert_eq!(contents(&doc), vec!["A sentence that continues here.", " Next."]);
        let first = doc.sentences().next().unwrap();
        assert_eq!(first.offset_at(16), Some(LineOffset::new(2, 2)));
    }

    #[test]
    fn test_parse_links() {
        let doc = parse("Read [the docs](https://example.com/docs). Done.\n");
        let sentences: Vec<_> = doc.sentences().collect();

        assert_eq!(sentences[0].content, "Read the docs.");
        assert_eq!(sentences[0].links, vec!["https://example.com/docs".to_string()]);
        assert!(sentences[1].links.is_empty());
    }

    #[test]
    fn test_parse_nested_lists() {
        let doc = parse("- one\n  - two\n  - three\n- four\n");
        let block = &doc.sections()[0].list_blocks[0];

        let levels: Vec<usize> = block.elements.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 2, 1]);
        assert_eq!(block.elements[3].sentences[0].content, "four");
    }

    #[test]
    fn test_parse_paragraph_after_nested_list() {
        let doc = parse("- one\n\n  - two\n\n  Trailing paragraph of one.\n");
        let block = &doc.sections()[0].list_blocks[0];

        assert_eq!(contents(&doc), vec!["one", "two", "Trailing paragraph of one."]);
        let levels: Vec<usize> = block.elements.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 1]);
    }

    #[test]
    fn test_parse_block_quote_inside_list_item() {
        let doc = parse("- item\n\n  > Quoted inside item.\n");
        let block = &doc.sections()[0].list_blocks[0];

        assert_eq!(block.elements.len(), 1);
        assert_eq!(contents(&doc), vec!["item", "Quoted inside item."]);
        assert_eq!(block.elements[0].sentences[1].position(), LineOffset::new(3, 4));
    }

    #[test]
    fn test_parse_skips_code_html_and_tables() {
        let doc = parse(
            "Intro.\n\n```rust\nlet x = 1;\n```\n\n<div>html</div>\n\n| a | b |\n|---|---|\n| c | d |\n\n---\n\nOutro.\n",
        );
        assert_eq!(contents(&doc), vec!["Intro.", "Outro."]);
    }

    #[test]
    fn test_parse_skips_front_matter() {
        let doc = parse("---\ntitle: Test.\n---\n\nBody text.\n");
        assert_eq!(contents(&doc), vec!["Body text."]);
    }

    #[test]
    fn test_parse_block_quote() {
        let doc = parse("> Quoted text.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "Quoted text.");
        assert_eq!(sentence.position(), LineOffset::new(1, 2));
    }

    #[test]
    fn test_parse_escapes_keep_positions() {
        let doc = parse("A \\*star\\* here.\n");
        let sentence = doc.sentences().next().unwrap();

        assert_eq!(sentence.content, "A *star* here.");
        assert_eq!(sentence.offset_at(2), Some(LineOffset::new(1, 3)));
        assert_eq!(sentence.offset_at(3), Some(LineOffset::new(1, 4)));
    }

    #[test]
    fn test_parse_multibyte_columns() {
        let doc = parse("# 見出し\n\nこれは**太字**です。\n");
        let sentence = &doc.sections()[1].paragraphs[0].sentences[0];

        assert_eq!(sentence.content, "これは太字です。");
        assert_eq!(sentence.offset_at(3), Some(LineOffset::new(3, 5)));
    }

    #[test]
    fn test_extensions() {
        let parser = MarkdownParser::new();

        assert!(parser.can_parse("md"));
        assert!(parser.can_parse("markdown"));
        assert!(parser.can_parse("MD"));
        assert!(!parser.can_parse("txt"));
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.sentences().count(), 0);
    }
}
