use crate::types::{Document, ScoredResult};

/// Pairs each document with its score and orders them by descending score.
///
/// The sort is stable: equal scores keep their input order.
pub fn assemble(documents: &[Document], scores: &[f32]) -> Vec<ScoredResult> {
    debug_assert_eq!(documents.len(), scores.len());

    let mut scored: Vec<(&Document, f32)> = documents.iter().zip(scores.iter().copied()).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .enumerate()
        .map(|(rank, (document, score))| ScoredResult {
            rank: rank + 1,
            document: document.id.clone(),
            score,
            extraction: document.status.clone(),
        })
        .collect()
}

/// Drops results under `min_score` and keeps at most `limit`.
pub fn select(mut results: Vec<ScoredResult>, limit: usize, min_score: f32) -> Vec<ScoredResult> {
    results.retain(|result| result.score >= min_score);
    results.truncate(limit);
    results
}
