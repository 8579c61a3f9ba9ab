//! TF-IDF vectorization over a vocabulary built from one document collection

use super::tokenizer::Tokenizer;
use crate::config::RankingConfig;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Sparse term vector: `(term index, weight)` pairs sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// Cosine of the angle between two term vectors.
///
/// Returns 0 when either vector has zero norm. Term weights are non-negative,
/// so the result is clamped into [0, 1] to absorb rounding drift.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denominator).clamp(0.0, 1.0)
}

/// Term vectors for one collection, sharing a single vocabulary
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<TermVector>,
}

impl TfidfMatrix {
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn rows(&self) -> &[TermVector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&TermVector> {
        self.rows.get(index)
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    sublinear_tf: bool,
    smooth_idf: bool,
    normalize: bool,
}

impl TfidfVectorizer {
    pub fn new(config: &RankingConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config.lowercase),
            sublinear_tf: config.sublinear_tf,
            smooth_idf: config.smooth_idf,
            normalize: config.normalize,
        }
    }

    /// Learns the vocabulary and IDF weights from `documents` and returns
    /// one term vector per document, in input order.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfMatrix {
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in self.tokenizer.tokenize(doc.as_ref()) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let terms: BTreeSet<&str> = counts
            .iter()
            .flat_map(|tf| tf.keys().map(String::as_str))
            .collect();
        let vocabulary: Vec<String> = terms.into_iter().map(str::to_string).collect();
        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for term in tf.keys() {
                document_frequency[index[term.as_str()]] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| self.inverse_document_frequency(n, df as f64))
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut entries: Vec<(usize, f64)> = tf
                    .iter()
                    .map(|(term, &count)| {
                        let i = index[term.as_str()];
                        (i, self.term_frequency(count) * idf[i])
                    })
                    .collect();
                entries.sort_unstable_by_key(|(i, _)| *i);

                let mut vector = TermVector { entries };
                if self.normalize {
                    vector.normalize();
                }
                vector
            })
            .collect();

        TfidfMatrix {
            vocabulary,
            idf,
            rows,
        }
    }

    fn term_frequency(&self, count: usize) -> f64 {
        if self.sublinear_tf {
            1.0 + (count as f64).ln()
        } else {
            count as f64
        }
    }

    fn inverse_document_frequency(&self, n: f64, df: f64) -> f64 {
        if self.smooth_idf {
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        } else {
            (n / df).ln() + 1.0
        }
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(&RankingConfig::default())
    }
}
