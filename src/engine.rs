use crate::config::SearchConfig;
use crate::document::{DocId, Document, DocumentType};
use crate::index::{IndexStats, InvertedIndex};
use crate::ranking::{MatchDetail, Ranker};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A document with its aggregate score and the postings that produced it
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMatch<'a> {
    pub document: &'a Document,
    pub score: f64,
    pub matches: Vec<MatchDetail>,
}

/// Immutable snapshot of a document set and the index built over it.
///
/// Searching only needs `&self`, so a snapshot can be shared between
/// threads behind an `Arc` while a newer one is being built.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    documents: Vec<Document>,
    positions: HashMap<DocId, usize>,
    index: InvertedIndex,
    tokenizer: Tokenizer,
    ranker: Ranker,
}

impl SearchIndex {
    /// Build a snapshot with the default configuration
    pub fn build(documents: Vec<Document>) -> Self {
        Self::with_config(documents, &SearchConfig::default())
    }

    pub fn with_config(documents: Vec<Document>, config: &SearchConfig) -> Self {
        let tokenizer = config.tokenizer();
        let index = InvertedIndex::build(&documents, &tokenizer);

        let mut positions = HashMap::new();
        for (i, doc) in documents.iter().enumerate().filter(|(_, d)| d.active) {
            positions.entry(doc.id).or_insert(i);
        }

        Self {
            documents,
            positions,
            index,
            tokenizer,
            ranker: config.ranker(),
        }
    }

    /// Ranked documents for a free-text query, at most `limit` of them.
    ///
    /// Never fails: blank queries, empty indexes and queries with no
    /// overlapping vocabulary all produce an empty result.
    pub fn search(&self, query: &str, limit: usize) -> Vec<DocumentMatch<'_>> {
        let terms = self.tokenizer.analyze(query);
        if terms.is_empty() || limit == 0 {
            return Vec::new();
        }

        self.ranker
            .rank(&self.index, &terms, limit)
            .into_iter()
            .filter_map(|scored| {
                let document = self.document(scored.doc_id)?;
                Some(DocumentMatch {
                    document,
                    score: scored.score,
                    matches: scored.matches,
                })
            })
            .collect()
    }

    /// Indexed (active) document by id
    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.positions.get(&id).map(|&i| &self.documents[i])
    }

    /// Every supplied document, active or not, in supply order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

/// Search facade owning the current snapshot.
///
/// Starts unindexed, where every search returns nothing. `set_documents`
/// replaces the snapshot wholesale; callers holding an older snapshot keep
/// searching it undisturbed.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: SearchConfig,
    snapshot: Option<Arc<SearchIndex>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            snapshot: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replace the document set and rebuild the index
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        let snapshot = SearchIndex::with_config(documents, &self.config);
        self.install(snapshot);
    }

    /// Swap in a snapshot built elsewhere, e.g. outside a lock
    pub fn install(&mut self, snapshot: SearchIndex) {
        tracing::debug!(
            documents = snapshot.documents().len(),
            indexed = snapshot.index().total_documents(),
            "document set replaced"
        );
        self.snapshot = Some(Arc::new(snapshot));
    }

    pub fn is_indexed(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<DocumentMatch<'_>> {
        match &self.snapshot {
            Some(snapshot) => snapshot.search(query, limit),
            None => Vec::new(),
        }
    }

    /// Current snapshot; an empty one while unindexed
    pub fn snapshot(&self) -> Arc<SearchIndex> {
        match &self.snapshot {
            Some(snapshot) => Arc::clone(snapshot),
            None => Arc::new(SearchIndex::with_config(Vec::new(), &self.config)),
        }
    }
}

/// Post-filter collaborators apply to returned matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub category: Option<String>,
    pub document_type: Option<DocumentType>,
}

impl DocumentFilter {
    /// Category compares case-insensitively
    pub fn matches(&self, doc: &Document) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| doc.category.to_lowercase() == c.to_lowercase());
        let type_ok = self.document_type.map_or(true, |t| doc.document_type == t);
        category_ok && type_ok
    }

    pub fn apply<'a>(&self, matches: Vec<DocumentMatch<'a>>) -> Vec<DocumentMatch<'a>> {
        matches
            .into_iter()
            .filter(|m| self.matches(m.document))
            .collect()
    }
}
