//! Edit-distance fallback for query terms with no exact postings.
//!
//! Every lookup scans the whole vocabulary, which is fine for the few
//! thousand terms a policy library produces but grows linearly with it.

use crate::index::{InvertedIndex, Posting};

/// Default maximum edit distance for fuzzy matches
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

/// Levenshtein distance over Unicode scalar values (unit cost for insert,
/// delete and substitute)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}

/// A vocabulary term within the allowed distance of a query term
#[derive(Debug, Clone)]
pub struct FuzzyMatch<'a> {
    pub term: &'a str,
    pub distance: usize,
    pub postings: &'a [Posting],
}

impl InvertedIndex {
    /// Vocabulary terms within `max_distance` edits of `term`, closest
    /// first and alphabetical among equals.
    pub fn fuzzy_matches(&self, term: &str, max_distance: usize) -> Vec<FuzzyMatch<'_>> {
        let term_len = term.chars().count();

        let mut matches: Vec<FuzzyMatch<'_>> = self
            .vocabulary()
            .filter(|(candidate, _)| candidate.chars().count().abs_diff(term_len) <= max_distance)
            .filter_map(|(candidate, postings)| {
                let distance = levenshtein(term, candidate);
                (distance <= max_distance).then_some(FuzzyMatch {
                    term: candidate,
                    distance,
                    postings,
                })
            })
            .collect();

        matches.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.term.cmp(b.term)));

        tracing::trace!(term, candidates = matches.len(), "fuzzy fallback");
        matches
    }
}
