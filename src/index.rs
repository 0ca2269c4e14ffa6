use crate::document::{DocId, Document};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Indexed document fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Description,
    Content,
    Category,
    Tags,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Description,
        Field::Content,
        Field::Category,
        Field::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Content => "content",
            Field::Category => "category",
            Field::Tags => "tags",
        }
    }

    /// Text of this field for a document
    pub fn text(&self, doc: &Document) -> String {
        match self {
            Field::Name => doc.name.clone(),
            Field::Description => doc.description.clone().unwrap_or_default(),
            Field::Content => doc.content.clone(),
            Field::Category => doc.category.clone(),
            Field::Tags => doc.tags_text(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occurrences of one term in one field of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub field: Field,
    pub frequency: u32,
    pub positions: Vec<u32>,
}

/// Inverted index: normalized term -> postings.
///
/// Only active documents are indexed, and a term is present only if it has
/// at least one posting. Rebuilt wholesale from a document set; there is no
/// incremental update path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    index: HashMap<String, Vec<Posting>>,
    doc_count: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over the active documents of a set.
    ///
    /// Document ids are expected to be unique; a repeated id is indexed
    /// only for its first active occurrence.
    pub fn build(documents: &[Document], tokenizer: &Tokenizer) -> Self {
        let mut index = Self::new();
        let mut seen: HashSet<DocId> = HashSet::new();

        for doc in documents.iter().filter(|d| d.active) {
            if !seen.insert(doc.id) {
                tracing::warn!(doc_id = doc.id, "duplicate document id ignored");
                continue;
            }

            for field in Field::ALL {
                index.index_field(doc.id, field, &field.text(doc), tokenizer);
            }
            index.doc_count += 1;
        }

        tracing::debug!(
            documents = index.doc_count,
            tokens = index.index.len(),
            "index rebuilt"
        );

        index
    }

    fn index_field(&mut self, doc_id: DocId, field: Field, text: &str, tokenizer: &Tokenizer) {
        for (position, term) in tokenizer.analyze(text).into_iter().enumerate() {
            let postings = self.index.entry(term).or_default();

            // Fields are indexed one at a time, so an existing posting for
            // this (document, field) is always the last one in the list.
            match postings.last_mut() {
                Some(last) if last.doc_id == doc_id && last.field == field => {
                    last.frequency += 1;
                    last.positions.push(position as u32);
                }
                _ => postings.push(Posting {
                    doc_id,
                    field,
                    frequency: 1,
                    positions: vec![position as u32],
                }),
            }
        }
    }

    /// Postings for an exact normalized term
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.index.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Number of distinct documents containing a term (for IDF calculation)
    pub fn doc_frequency(&self, term: &str) -> usize {
        // Postings of one document are contiguous
        let mut docs: Vec<DocId> = self.postings(term).iter().map(|p| p.doc_id).collect();
        docs.dedup();
        docs.len()
    }

    /// Get total number of indexed (active) documents
    pub fn total_documents(&self) -> usize {
        self.doc_count
    }

    /// Iterate over every term and its postings
    pub fn vocabulary(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.index
            .iter()
            .map(|(term, postings)| (term.as_str(), postings.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        let total_postings: usize = self.index.values().map(Vec::len).sum();
        IndexStats {
            total_documents: self.doc_count,
            total_tokens: self.index.len(),
            total_postings,
            avg_postings_per_token: if self.index.is_empty() {
                0.0
            } else {
                total_postings as f64 / self.index.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_tokens: usize,
    pub total_postings: usize,
    pub avg_postings_per_token: f64,
}
