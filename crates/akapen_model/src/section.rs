//! Sections and the blocks they contain.

use serde::{Deserialize, Serialize};

use crate::{Sentence, SectionId};

/// An ordered run of sentences separated from its neighbours by a blank
/// line or a structural boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Sentences in source order.
    pub sentences: Vec<Sentence>,
}

impl Paragraph {
    /// Creates an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Returns true if the paragraph holds no sentences.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// A single list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListElement {
    /// Nesting depth, starting at 1.
    pub level: usize,
    /// Sentences of the item.
    pub sentences: Vec<Sentence>,
}

impl ListElement {
    /// Creates a list element. Levels below 1 are raised to 1.
    pub fn new(level: usize, sentences: Vec<Sentence>) -> Self {
        Self {
            level: level.max(1),
            sentences,
        }
    }
}

/// A contiguous list, possibly nested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    /// List items in source order.
    pub elements: Vec<ListElement>,
}

impl ListBlock {
    /// Creates an empty list block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the list block has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A titled or untitled block of content at a nesting level.
///
/// Level 0 is the untitled document root. Subsections and the parent link
/// are stored as ids into the owning [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Header level (0 for the untitled root).
    pub level: usize,
    /// Sentences of the header line(s).
    pub header_contents: Vec<Sentence>,
    /// Paragraphs in source order.
    pub paragraphs: Vec<Paragraph>,
    /// List blocks in source order.
    pub list_blocks: Vec<ListBlock>,
    pub(crate) subsections: Vec<SectionId>,
    pub(crate) parent: Option<SectionId>,
}

impl Section {
    /// Creates a section without content.
    pub fn new(level: usize, header_contents: Vec<Sentence>) -> Self {
        Self {
            level,
            header_contents,
            paragraphs: Vec::new(),
            list_blocks: Vec::new(),
            subsections: Vec::new(),
            parent: None,
        }
    }

    /// Returns the ids of the direct subsections.
    pub fn subsections(&self) -> &[SectionId] {
        &self.subsections
    }

    /// Returns the id of the enclosing section, if any.
    pub fn parent(&self) -> Option<SectionId> {
        self.parent
    }

    /// Returns the joined header text.
    pub fn header_text(&self) -> String {
        self.header_contents
            .iter()
            .map(|s| s.content.as_str())
            .collect()
    }

    /// Iterates over every sentence of the section: header first, then
    /// paragraphs, then list elements.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.header_contents
            .iter()
            .chain(self.paragraphs.iter().flat_map(|p| p.sentences.iter()))
            .chain(
                self.list_blocks
                    .iter()
                    .flat_map(|b| b.elements.iter())
                    .flat_map(|e| e.sentences.iter()),
            )
    }

    /// Returns the number of characters in the section body, excluding the
    /// header.
    pub fn body_char_count(&self) -> usize {
        self.sentences()
            .skip(self.header_contents.len())
            .map(Sentence::char_len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_section() -> Section {
        let mut section = Section::new(1, vec![Sentence::new("Title", 1)]);
        section.paragraphs.push(Paragraph {
            sentences: vec![Sentence::new("First.", 2), Sentence::new(" Second.", 2)],
        });
        section.list_blocks.push(ListBlock {
            elements: vec![ListElement::new(1, vec![Sentence::new("Item", 4)])],
        });
        section
    }

    #[test]
    fn test_sentences_order_header_paragraph_list() {
        let section = sample_section();
        let contents: Vec<&str> = section.sentences().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["Title", "First.", " Second.", "Item"]);
    }

    #[test]
    fn test_body_char_count_excludes_header() {
        let section = sample_section();
        assert_eq!(section.body_char_count(), 6 + 8 + 4);
    }

    #[test]
    fn test_list_element_level_floor() {
        assert_eq!(ListElement::new(0, Vec::new()).level, 1);
    }

    #[test]
    fn test_header_text() {
        assert_eq!(sample_section().header_text(), "Title");
    }
}
