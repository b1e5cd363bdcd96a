//! Semantic retrieval over the FAQ corpus using TF-IDF vectors.
//!
//! Each entry's searchable text (question, keywords, category) becomes a
//! sparse term vector weighted by term frequency and smoothed inverse
//! document frequency. Queries are projected into the same term space and
//! ranked by cosine similarity. The corpus is fixed at build time; a
//! knowledge base reload rebuilds the whole index.

use std::collections::HashMap;

use crate::models::FaqEntry;

use super::text::tokenize;

/// A ranked retrieval hit.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Insertion index of the entry in the knowledge base.
    pub entry_idx: usize,
    /// Cosine similarity in [0, 1].
    pub score: f32,
}

struct EntryVector {
    weights: HashMap<String, f32>,
    norm: f32,
}

/// TF-IDF vector space over the FAQ corpus.
pub struct SemanticIndex {
    idf: HashMap<String, f32>,
    vectors: Vec<EntryVector>,
}

fn searchable_text(entry: &FaqEntry) -> String {
    format!("{} {} {}", entry.question, entry.keywords.join(" "), entry.category)
}

fn term_counts(tokens: &[String]) -> HashMap<String, f32> {
    let mut counts: HashMap<String, f32> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    counts
}

impl SemanticIndex {
    /// Build the index from the full entry corpus.
    ///
    /// An empty corpus yields an index that always returns an empty
    /// result list.
    pub fn build(entries: &[FaqEntry]) -> Self {
        let docs: Vec<Vec<String>> = entries
            .iter()
            .map(|e| tokenize(&searchable_text(e)))
            .collect();
        let n = docs.len();

        // Document frequency per term.
        let mut df: HashMap<String, usize> = HashMap::new();
        for doc in &docs {
            let mut seen: Vec<&String> = doc.iter().collect();
            seen.sort();
            seen.dedup();
            for term in seen {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Smoothed IDF (ln((1+n)/(1+df)) + 1) keeps weights positive even
        // for terms present in every document, so a single-entry corpus
        // still produces a usable vector space.
        let idf: HashMap<String, f32> = df
            .into_iter()
            .map(|(term, count)| {
                let weight = ((1.0 + n as f32) / (1.0 + count as f32)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        let vectors = docs
            .iter()
            .map(|doc| {
                let weights: HashMap<String, f32> = term_counts(doc)
                    .into_iter()
                    .map(|(term, tf)| {
                        let w = tf * idf.get(&term).copied().unwrap_or(0.0);
                        (term, w)
                    })
                    .collect();
                let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
                EntryVector { weights, norm }
            })
            .collect();

        Self { idf, vectors }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Rank entries by cosine similarity against the query text.
    ///
    /// Query tokenization is the exact pipeline used at build time. Terms
    /// outside the build vocabulary contribute zero weight. Zero-score
    /// entries are dropped, so a query that normalizes to nothing returns
    /// an empty list rather than a wall of zeros. Ties keep the entries'
    /// insertion order (stable sort), making results deterministic.
    pub fn query(&self, text: &str, top_k: usize) -> Vec<MatchResult> {
        if self.vectors.is_empty() || top_k == 0 {
            return vec![];
        }

        let tokens = tokenize(text);
        if tokens.is_empty() {
            return vec![];
        }

        let query_weights: HashMap<String, f32> = term_counts(&tokens)
            .into_iter()
            .filter_map(|(term, tf)| {
                // Out-of-vocabulary terms project to zero, never fail.
                self.idf.get(&term).map(|idf| (term, tf * idf))
            })
            .collect();
        let query_norm = query_weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if query_norm == 0.0 {
            return vec![];
        }

        let mut results: Vec<MatchResult> = self
            .vectors
            .iter()
            .enumerate()
            .filter_map(|(entry_idx, vector)| {
                if vector.norm == 0.0 {
                    return None;
                }
                let dot: f32 = query_weights
                    .iter()
                    .filter_map(|(term, qw)| vector.weights.get(term).map(|ew| qw * ew))
                    .sum();
                let score = (dot / (query_norm * vector.norm)).min(1.0);
                if score > 0.0 {
                    Some(MatchResult { entry_idx, score })
                } else {
                    None
                }
            })
            .collect();

        // Stable sort: equal scores preserve insertion order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        results
    }
}
