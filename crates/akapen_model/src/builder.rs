//! Incremental document construction.

use tracing::warn;

use crate::{
    Document, ListBlock, ListElement, Paragraph, Section, SectionId, Sentence, SuppressRule,
};

/// Builds a [`Document`] in source order.
///
/// The builder tracks the current section. Content added before any
/// section exists goes into an implicit untitled root section (level 0).
///
/// # Example
///
/// ```rust,ignore
/// use akapen_model::{DocumentBuilder, Sentence};
///
/// let mut builder = DocumentBuilder::new(Some("doc.md".into()));
/// builder.add_section(1, vec![Sentence::new("Title", 1)]);
/// builder.add_paragraph();
/// builder.add_sentence(Sentence::new("Hello world.", 2));
/// let document = builder.build();
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
    current: Option<SectionId>,
}

impl DocumentBuilder {
    /// Creates a builder for a document with the given file name.
    pub fn new(file_name: Option<String>) -> Self {
        Self {
            document: Document::new(file_name),
            current: None,
        }
    }

    /// Returns the id of the section receiving content.
    pub fn current_section(&self) -> Option<SectionId> {
        self.current
    }

    /// Returns the document built so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Adds a section and makes it current.
    ///
    /// The section is nested below the nearest open section with a lower
    /// level. When no such section exists a warning is logged and the
    /// section stays at the top level.
    pub fn add_section(&mut self, level: usize, mut header_contents: Vec<Sentence>) -> SectionId {
        mark_first(&mut header_contents);
        let id = self.document.push_section(Section::new(level, header_contents));

        if let Some(current) = self.current
            && !self.document.attach(current, id)
        {
            warn!("Failed to add parent for a Section (level {})", level);
        }

        self.current = Some(id);
        id
    }

    /// Starts a new paragraph in the current section.
    pub fn add_paragraph(&mut self) {
        self.current_mut().paragraphs.push(Paragraph::new());
    }

    /// Appends a sentence to the last paragraph of the current section.
    pub fn add_sentence(&mut self, mut sentence: Sentence) {
        let section = self.current_mut();
        if section.paragraphs.is_empty() {
            section.paragraphs.push(Paragraph::new());
        }
        if let Some(paragraph) = section.paragraphs.last_mut() {
            sentence.is_first_sentence = paragraph.sentences.is_empty();
            paragraph.sentences.push(sentence);
        }
    }

    /// Appends several sentences to the last paragraph.
    pub fn add_sentences(&mut self, sentences: impl IntoIterator<Item = Sentence>) {
        for sentence in sentences {
            self.add_sentence(sentence);
        }
    }

    /// Starts a new list block in the current section.
    pub fn add_list_block(&mut self) {
        self.current_mut().list_blocks.push(ListBlock::new());
    }

    /// Appends a list element to the last list block of the current section.
    pub fn add_list_element(&mut self, level: usize, mut sentences: Vec<Sentence>) {
        mark_first(&mut sentences);
        let section = self.current_mut();
        if section.list_blocks.is_empty() {
            section.list_blocks.push(ListBlock::new());
        }
        if let Some(block) = section.list_blocks.last_mut() {
            block.elements.push(ListElement::new(level, sentences));
        }
    }

    /// Records a suppression rule on the document.
    pub fn add_suppress_rule(&mut self, rule: SuppressRule) {
        self.document.add_suppress_rule(rule);
    }

    /// Finishes the document, dropping empty paragraphs and list blocks.
    pub fn build(mut self) -> Document {
        for section in self.document.sections_mut() {
            section.paragraphs.retain(|p| !p.is_empty());
            section.list_blocks.retain(|b| !b.is_empty());
        }
        self.document
    }

    fn current_mut(&mut self) -> &mut Section {
        let id = match self.current {
            Some(id) => id,
            None => {
                let id = self.document.push_section(Section::new(0, Vec::new()));
                self.current = Some(id);
                id
            }
        };
        &mut self.document.sections_mut()[id.index()]
    }
}

fn mark_first(sentences: &mut [Sentence]) {
    for (i, sentence) in sentences.iter_mut().enumerate() {
        sentence.is_first_sentence = i == 0;
    }
}
