//! Answers and the citations attached to them.

use std::slice;

/// A quoted passage tied to a source document and a paragraph within it.
///
/// Fields are private so a citation cannot change after the backend
/// response that produced it has been converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    quoted_text: String,
    source_document_id: String,
    paragraph_label: String,
    external_link: String,
}

impl Citation {
    pub fn new(
        quoted_text: impl Into<String>,
        source_document_id: impl Into<String>,
        paragraph_label: impl Into<String>,
        external_link: impl Into<String>,
    ) -> Self {
        Self {
            quoted_text: quoted_text.into(),
            source_document_id: source_document_id.into(),
            paragraph_label: paragraph_label.into(),
            external_link: external_link.into(),
        }
    }

    pub fn quoted_text(&self) -> &str {
        &self.quoted_text
    }

    pub fn source_document_id(&self) -> &str {
        &self.source_document_id
    }

    pub fn paragraph_label(&self) -> &str {
        &self.paragraph_label
    }

    /// The raw link as received. It is only validated when opened.
    pub fn external_link(&self) -> &str {
        &self.external_link
    }
}

/// A resolved backend answer: narrative markup plus its citations in the
/// order the backend returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    narrative_markup: String,
    citations: Vec<Citation>,
}

impl Answer {
    pub fn new(narrative_markup: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            narrative_markup: narrative_markup.into(),
            citations,
        }
    }

    pub fn narrative_markup(&self) -> &str {
        &self.narrative_markup
    }

    pub fn citations(&self) -> CitationRegistry<'_> {
        CitationRegistry {
            citations: &self.citations,
        }
    }
}

/// Read-only, ordered view over the citations of one [`Answer`].
///
/// The view borrows the answer, so it can never outlive it and offers no
/// way to add, remove or reorder entries.
#[derive(Debug, Clone, Copy)]
pub struct CitationRegistry<'a> {
    citations: &'a [Citation],
}

impl<'a> CitationRegistry<'a> {
    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Citation> {
        self.citations.get(index)
    }

    pub fn first(&self) -> Option<&'a Citation> {
        self.citations.first()
    }

    pub fn iter(&self) -> slice::Iter<'a, Citation> {
        self.citations.iter()
    }
}

impl<'a> IntoIterator for CitationRegistry<'a> {
    type Item = &'a Citation;
    type IntoIter = slice::Iter<'a, Citation>;

    fn into_iter(self) -> Self::IntoIter {
        self.citations.iter()
    }
}

impl<'a> IntoIterator for &CitationRegistry<'a> {
    type Item = &'a Citation;
    type IntoIter = slice::Iter<'a, Citation>;

    fn into_iter(self) -> Self::IntoIter {
        self.citations.iter()
    }
}
