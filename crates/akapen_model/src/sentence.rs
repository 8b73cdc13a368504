//! Sentences and their source positions.

use serde::{Deserialize, Serialize};

/// A position in the original source text.
///
/// Uses 1-indexed lines and 0-indexed character offsets. The offset always
/// refers to the line as it was read from the input, before any markup was
/// erased from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineOffset {
    /// Line number (1-indexed).
    pub line: usize,
    /// Character offset within the line (0-indexed).
    pub offset: usize,
}

impl LineOffset {
    /// Creates a new line offset.
    #[inline]
    pub const fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// A sentence extracted from a document.
///
/// `content` holds only the surviving text (markup erased). Every character
/// of `content` has a matching entry in the offset map when the sentence was
/// produced by a parser, so validators can report precise locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Text content of the sentence.
    pub content: String,
    /// Line number of the first non-whitespace character (1-indexed).
    pub line_number: usize,
    /// Offset of the first non-whitespace character in its line.
    pub start_offset: usize,
    /// True for the first sentence of a paragraph, list element or header.
    pub is_first_sentence: bool,
    /// Link targets found in the sentence, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Original position of each character of `content`.
    #[serde(skip)]
    offset_map: Vec<LineOffset>,
}

impl Sentence {
    /// Creates a sentence without a per-character offset map.
    ///
    /// Every character is assumed to sit on `line_number`, starting at
    /// offset zero.
    pub fn new(content: impl Into<String>, line_number: usize) -> Self {
        let content = content.into();
        let offset_map = (0..content.chars().count())
            .map(|i| LineOffset::new(line_number, i))
            .collect();
        Self {
            content,
            line_number,
            start_offset: 0,
            is_first_sentence: false,
            links: Vec::new(),
            offset_map,
        }
    }

    /// Creates a sentence from its content and one offset per character.
    ///
    /// The sentence position is taken from the first non-whitespace
    /// character, falling back to the first character, and finally to
    /// `fallback` for empty content.
    pub fn with_offsets(
        content: impl Into<String>,
        offset_map: Vec<LineOffset>,
        fallback: LineOffset,
    ) -> Self {
        let content = content.into();
        let position = content
            .chars()
            .zip(offset_map.iter())
            .find(|(c, _)| !c.is_whitespace())
            .map(|(_, o)| *o)
            .or_else(|| offset_map.first().copied())
            .unwrap_or(fallback);

        Self {
            content,
            line_number: position.line,
            start_offset: position.offset,
            is_first_sentence: false,
            links: Vec::new(),
            offset_map,
        }
    }

    /// Sets the links of this sentence.
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    /// Returns the position of the sentence in the original source.
    pub fn position(&self) -> LineOffset {
        LineOffset::new(self.line_number, self.start_offset)
    }

    /// Returns the original position of the character at `index` in `content`.
    ///
    /// `index` counts characters, not bytes.
    pub fn offset_at(&self, index: usize) -> Option<LineOffset> {
        self.offset_map.get(index).copied()
    }

    /// Returns the per-character offset map.
    pub fn offset_map(&self) -> &[LineOffset] {
        &self.offset_map
    }

    /// Returns the number of characters in the content.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if the content is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
