use serde::{Deserialize, Serialize};

/// A candidate document with the text extracted from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub status: ExtractionStatus,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let status = ExtractionStatus::from_text(&content);
        Self {
            id: id.into(),
            content,
            status,
        }
    }

    /// A document whose extraction failed; it is ranked with empty text.
    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            status: ExtractionStatus::Failed { error: error.into() },
        }
    }

    pub fn warning(&self) -> Option<String> {
        match &self.status {
            ExtractionStatus::Extracted { .. } => None,
            ExtractionStatus::Empty => Some(format!("{}: no extractable text", self.id)),
            ExtractionStatus::Failed { error } => Some(format!("{}: {}", self.id, error)),
        }
    }
}

/// Outcome of extracting text from one document resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionStatus {
    Extracted { chars: usize },
    Empty,
    Failed { error: String },
}

impl ExtractionStatus {
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            ExtractionStatus::Empty
        } else {
            ExtractionStatus::Extracted {
                chars: text.chars().count(),
            }
        }
    }
}

/// A document identifier paired with its similarity to the query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub rank: usize,
    pub document: String,
    pub score: f32,
    pub extraction: ExtractionStatus,
}

/// Output of one ranking request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub results: Vec<ScoredResult>,
    pub documents_ranked: usize,
    pub vocabulary_size: usize,
    pub warnings: Vec<String>,
    pub elapsed_ms: u64,
    pub ranked_at: String,
}
