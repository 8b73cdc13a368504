//! Documents, section storage and section nesting.

use serde::{Deserialize, Serialize};

use crate::{Section, Sentence, SuppressRule};

/// Identifier of a section within its [`Document`].
///
/// Ids are indices into the document's section storage, which keeps
/// sections in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(usize);

impl SectionId {
    /// Returns the index of this section in document order.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A parsed input file.
///
/// Sections are owned by the document and stored flat in document order.
/// The tree shape is expressed through [`Section::subsections`] and the
/// non-owning [`Section::parent`] back-reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    file_name: Option<String>,
    sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suppress_rules: Vec<SuppressRule>,
}

impl Document {
    /// Creates an empty document.
    pub fn new(file_name: Option<String>) -> Self {
        Self {
            file_name,
            sections: Vec::new(),
            suppress_rules: Vec::new(),
        }
    }

    /// Returns the file name, if the document came from a file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Sets the file name.
    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    /// Returns every section in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the section with the given id.
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.0)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Returns the section with the given id mutably.
    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.get_mut(id.0)
    }

    /// Returns the ids of sections without a parent, in document order.
    pub fn top_level_sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.parent.is_none())
            .map(|(i, _)| SectionId(i))
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterates over every sentence in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sections.iter().flat_map(Section::sentences)
    }

    /// Returns the suppression rules found in the source.
    pub fn suppress_rules(&self) -> &[SuppressRule] {
        &self.suppress_rules
    }

    /// Records a suppression rule.
    pub fn add_suppress_rule(&mut self, rule: SuppressRule) {
        self.suppress_rules.push(rule);
    }

    /// Returns true if a suppression rule covers an error of `validator`
    /// reported at `line`.
    pub fn is_suppressed(&self, validator: &str, line: usize) -> bool {
        self.suppress_rules
            .iter()
            .any(|rule| rule.suppresses(&self.sections, validator, line))
    }

    /// Appends a section without attaching it to any parent.
    pub fn push_section(&mut self, section: Section) -> SectionId {
        self.sections.push(section);
        SectionId(self.sections.len() - 1)
    }

    /// Attaches `child` below the nearest section, starting at `current`,
    /// whose level is lower than the child's.
    ///
    /// Returns `false` when no such ancestor exists; the child is then left
    /// at the top level.
    pub fn attach(&mut self, current: SectionId, child: SectionId) -> bool {
        if current == child {
            return false;
        }
        let Some(level) = self.section(child).map(|s| s.level) else {
            return false;
        };

        let mut candidate = Some(current);
        while let Some(id) = candidate {
            let Some(section) = self.section(id) else {
                return false;
            };
            if section.level < level {
                self.sections[id.0].subsections.push(child);
                self.sections[child.0].parent = Some(id);
                return true;
            }
            candidate = section.parent;
        }
        false
    }
}

/// An ordered set of documents checked together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentCollection {
    documents: Vec<Document>,
}

impl DocumentCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Returns the documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterates over the documents.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl From<Vec<Document>> for DocumentCollection {
    fn from(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl FromIterator<Document> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
