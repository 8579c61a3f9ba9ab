//! Lexical ranking of candidate documents against a query

pub mod assembly;
pub mod tfidf;
pub mod tokenizer;

pub use assembly::{assemble, select};
pub use tfidf::{cosine_similarity, TermVector, TfidfMatrix, TfidfVectorizer};
pub use tokenizer::Tokenizer;

use crate::config::RankingConfig;

/// Scores for one ranking call, aligned with the input corpus
#[derive(Debug, Clone)]
pub struct Ranking {
    pub scores: Vec<f32>,
    pub vocabulary_size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    vectorizer: TfidfVectorizer,
}

impl Ranker {
    pub fn new(config: &RankingConfig) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(config),
        }
    }

    /// One score per corpus document, in corpus order.
    ///
    /// The vocabulary is built from the query and this corpus only, so the
    /// same document can score differently against a different candidate set.
    /// Callers reject an empty query or corpus before getting here.
    pub fn rank<S: AsRef<str>>(&self, query: &str, corpus: &[S]) -> Vec<f32> {
        self.rank_with_stats(query, corpus).scores
    }

    pub fn rank_with_stats<S: AsRef<str>>(&self, query: &str, corpus: &[S]) -> Ranking {
        let mut collection: Vec<&str> = Vec::with_capacity(corpus.len() + 1);
        collection.push(query);
        collection.extend(corpus.iter().map(|doc| doc.as_ref()));

        let matrix = self.vectorizer.fit_transform(&collection);
        let (reference, candidates) = match matrix.rows().split_first() {
            Some(split) => split,
            None => {
                return Ranking {
                    scores: Vec::new(),
                    vocabulary_size: 0,
                }
            }
        };

        let scores = candidates
            .iter()
            .map(|candidate| cosine_similarity(reference, candidate) as f32)
            .collect();

        Ranking {
            scores,
            vocabulary_size: matrix.vocabulary().len(),
        }
    }
}

/// Ranks `corpus` against `query` with the default vectorizer settings.
pub fn rank<S: AsRef<str>>(query: &str, corpus: &[S]) -> Vec<f32> {
    Ranker::default().rank(query, corpus)
}
