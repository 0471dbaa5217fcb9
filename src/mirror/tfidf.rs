// TF-IDF document vectors for the near-duplicate layer.
//
// Standard vectorizer behavior: unigram and bigram terms over lowercased
// alphanumeric tokens, English stop words removed, vocabulary capped at the
// most frequent terms, terms present in more than 95% of documents pruned,
// smoothed idf, l2-normalized vectors. Cosine similarity between two
// normalized vectors is then a plain sparse dot product.
//
// Pages on the same site template share boilerplate; the max_df pruning
// strips terms that appear in (almost) every document of the group, so the
// similarity score reflects the distinctive content.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use stop_words::{get, LANGUAGE};

/// Sparse document vector: (term id, weight) sorted by term id.
pub type DocVector = Vec<(usize, f64)>;

pub struct TfIdfVectorizer {
    /// Vocabulary cap; the terms most frequent across the corpus are kept.
    pub max_features: usize,
    /// Prune terms appearing in more than this fraction of documents.
    pub max_df: f64,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            max_features: 5000,
            max_df: 0.95,
        }
    }
}

impl TfIdfVectorizer {
    /// Fit on the corpus and return one l2-normalized vector per document.
    ///
    /// Fails when nothing survives tokenization and pruning (all-stopword
    /// content, degenerate corpora); callers skip the near layer for that
    /// group and carry on.
    pub fn fit_transform(&self, docs: &[&str]) -> Result<Vec<DocVector>> {
        let stop: HashSet<String> = get(LANGUAGE::English).into_iter().collect();

        // Per-document term counts plus corpus-wide document frequencies.
        let mut doc_counts: Vec<HashMap<String, u32>> = Vec::with_capacity(docs.len());
        let mut df: HashMap<String, u32> = HashMap::new();
        let mut corpus_count: HashMap<String, u64> = HashMap::new();

        for doc in docs {
            let mut counts: HashMap<String, u32> = HashMap::new();
            for term in terms(doc, &stop) {
                *counts.entry(term).or_insert(0) += 1;
            }
            for (term, count) in &counts {
                *df.entry(term.clone()).or_insert(0) += 1;
                *corpus_count.entry(term.clone()).or_insert(0) += u64::from(*count);
            }
            doc_counts.push(counts);
        }

        let n_docs = docs.len() as f64;
        let df_limit = self.max_df * n_docs;
        let mut vocab: Vec<&String> = df
            .iter()
            .filter(|(_, &count)| f64::from(count) <= df_limit)
            .map(|(term, _)| term)
            .collect();

        if vocab.is_empty() {
            anyhow::bail!(
                "no terms remain after document-frequency pruning ({} documents)",
                docs.len()
            );
        }

        if vocab.len() > self.max_features {
            vocab.sort_by(|a, b| {
                corpus_count[*b]
                    .cmp(&corpus_count[*a])
                    .then_with(|| a.cmp(b))
            });
            vocab.truncate(self.max_features);
        }
        vocab.sort();

        let term_ids: HashMap<&str, usize> = vocab
            .iter()
            .enumerate()
            .map(|(id, term)| (term.as_str(), id))
            .collect();
        let idf: Vec<f64> = vocab
            .iter()
            .map(|term| ((1.0 + n_docs) / (1.0 + f64::from(df[*term]))).ln() + 1.0)
            .collect();

        let vectors = doc_counts
            .iter()
            .map(|counts| {
                let mut vector: DocVector = counts
                    .iter()
                    .filter_map(|(term, &count)| {
                        term_ids
                            .get(term.as_str())
                            .map(|&id| (id, f64::from(count) * idf[id]))
                    })
                    .collect();
                vector.sort_by_key(|&(id, _)| id);
                let norm = vector.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut vector {
                        *w /= norm;
                    }
                }
                vector
            })
            .collect();

        Ok(vectors)
    }
}

/// Cosine similarity of two l2-normalized sparse vectors.
pub fn cosine(a: &DocVector, b: &DocVector) -> f64 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

/// Unigram and bigram terms of a document: lowercased alphanumeric tokens
/// of at least two characters, stop words removed, bigrams joined over the
/// filtered token stream.
fn terms(doc: &str, stop: &HashSet<String>) -> Vec<String> {
    let lower = doc.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.chars().count() >= 2 && !stop.contains(*t))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_have_cosine_one() {
        let docs = [
            "dark market escrow payments accepted bitcoin monero shipping worldwide",
            "dark market escrow payments accepted bitcoin monero shipping worldwide",
            "an unrelated gardening page discussing tulips and compost heaps",
        ];
        let vectors = TfIdfVectorizer::default().fit_transform(&docs).unwrap();
        assert!((cosine(&vectors[0], &vectors[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_documents_have_cosine_zero() {
        let docs = [
            "bitcoin escrow marketplace vendors",
            "gardening tulips compost heaps",
            "astronomy telescopes nebulae charts",
        ];
        let vectors = TfIdfVectorizer::default().fit_transform(&docs).unwrap();
        assert_eq!(cosine(&vectors[0], &vectors[1]), 0.0);
        assert_eq!(cosine(&vectors[1], &vectors[2]), 0.0);
    }

    #[test]
    fn terms_in_every_document_are_pruned() {
        // "zebra" appears in all 3 documents (df 3 > 0.95 * 3), so after
        // pruning the documents share nothing.
        let docs = ["zebra alpha", "zebra beta", "zebra gamma"];
        let vectors = TfIdfVectorizer::default().fit_transform(&docs).unwrap();
        assert_eq!(cosine(&vectors[0], &vectors[1]), 0.0);
    }

    #[test]
    fn all_stopword_corpus_fails() {
        let docs = ["the and of", "and the of"];
        assert!(TfIdfVectorizer::default().fit_transform(&docs).is_err());
    }

    #[test]
    fn vocabulary_cap_keeps_most_frequent_terms() {
        let vectorizer = TfIdfVectorizer {
            max_features: 2,
            max_df: 0.95,
        };
        let docs = ["frequent frequent frequent rare", "frequent frequent other"];
        // Vocabulary is capped, vectors still produced deterministically
        let vectors = vectorizer.fit_transform(&docs).unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.len() <= 2));
    }

    #[test]
    fn short_tokens_are_dropped() {
        let docs = ["a b unique mirror", "xx yy zz qq"];
        let vectors = TfIdfVectorizer::default().fit_transform(&docs).unwrap();
        // 2 unigrams + 1 bigram; the single-character tokens contribute nothing
        assert_eq!(vectors[0].len(), 3);
    }
}
