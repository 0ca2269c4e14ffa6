use crate::document::DocId;
use crate::fuzzy::DEFAULT_MAX_EDIT_DISTANCE;
use crate::index::{Field, InvertedIndex, Posting};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Per-field score multipliers, applied at ranking time only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub description: f64,
    pub content: f64,
    pub category: f64,
    pub tags: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 3.0,
            description: 2.0,
            content: 1.0,
            category: 2.5,
            tags: 2.0,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, field: Field) -> f64 {
        match field {
            Field::Name => self.name,
            Field::Description => self.description,
            Field::Content => self.content,
            Field::Category => self.category,
            Field::Tags => self.tags,
        }
    }

    /// Weight for a field by name; unknown fields weigh 1.0
    pub fn for_name(&self, field: &str) -> f64 {
        Field::ALL
            .iter()
            .find(|f| f.as_str() == field)
            .map_or(1.0, |f| self.weight(*f))
    }
}

/// Inverse document frequency, smoothed so a term present in every
/// document still scores above zero. A term in no document scores 0.
pub fn idf(total_docs: usize, doc_freq: usize) -> f64 {
    if doc_freq == 0 || total_docs == 0 {
        return 0.0;
    }
    (1.0 + total_docs as f64 / doc_freq as f64).ln()
}

/// Why a document matched: one entry per scored posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub field: Field,
    /// Normalized query term
    pub text: String,
    /// Vocabulary term that supplied the posting; differs from `text`
    /// only for fuzzy matches
    pub matched: String,
    pub score: f64,
}

impl MatchDetail {
    pub fn is_fuzzy(&self) -> bool {
        self.text != self.matched
    }
}

/// Ranked search result
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
    pub matches: Vec<MatchDetail>,
}

impl ScoredDocument {
    pub fn new(doc_id: DocId) -> Self {
        Self {
            doc_id,
            score: 0.0,
            matches: Vec::new(),
        }
    }
}

/// Field-weighted TF-IDF ranker with fuzzy fallback
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: FieldWeights,
    max_edit_distance: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(FieldWeights::default(), DEFAULT_MAX_EDIT_DISTANCE)
    }
}

impl Ranker {
    pub fn new(weights: FieldWeights, max_edit_distance: usize) -> Self {
        Self {
            weights,
            max_edit_distance,
        }
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Score documents against normalized query terms.
    ///
    /// Each term contributes `frequency * idf * field_weight` per posting.
    /// A term with no exact postings falls back to every vocabulary term
    /// within the edit-distance threshold, each weighted by its own idf.
    /// Results are ordered by descending score, then ascending document id,
    /// and truncated to `limit`.
    pub fn rank(&self, index: &InvertedIndex, terms: &[String], limit: usize) -> Vec<ScoredDocument> {
        if limit == 0 || terms.is_empty() {
            return Vec::new();
        }

        let total_docs = index.total_documents();
        let mut scored: HashMap<DocId, ScoredDocument> = HashMap::new();

        for term in terms {
            let exact = index.postings(term);
            if !exact.is_empty() {
                let idf = idf(total_docs, index.doc_frequency(term));
                self.accumulate(&mut scored, term, term, exact, idf);
                continue;
            }

            for candidate in index.fuzzy_matches(term, self.max_edit_distance) {
                let idf = idf(total_docs, index.doc_frequency(candidate.term));
                self.accumulate(&mut scored, term, candidate.term, candidate.postings, idf);
            }
        }

        let mut ranked: Vec<ScoredDocument> = scored.into_values().filter(|d| d.score > 0.0).collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        ranked.truncate(limit);
        ranked
    }

    fn accumulate(
        &self,
        scored: &mut HashMap<DocId, ScoredDocument>,
        term: &str,
        matched: &str,
        postings: &[Posting],
        idf: f64,
    ) {
        for posting in postings {
            let score = posting.frequency as f64 * idf * self.weights.weight(posting.field);
            let entry = scored
                .entry(posting.doc_id)
                .or_insert_with(|| ScoredDocument::new(posting.doc_id));
            entry.score += score;
            entry.matches.push(MatchDetail {
                field: posting.field,
                text: term.to_string(),
                matched: matched.to_string(),
                score,
            });
        }
    }
}
