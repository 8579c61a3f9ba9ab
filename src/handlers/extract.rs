use super::{document_id, ensure_absolute_path, validate_resume_path, RankingHandlers};
use crate::extract::{extract_file, extractor_for_path};
use crate::Result;
use serde::Deserialize;
use tracing::{info, error};

#[derive(Debug, Deserialize)]
pub struct ExtractTextArgs {
    pub path: String,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

pub fn default_max_chars() -> usize {
    2000
}

impl RankingHandlers {
    /// Handle extract_text tool call: shows what the ranker will see for one resume
    pub async fn handle_extract_text(&self, args: ExtractTextArgs) -> Result<String> {
        let ExtractTextArgs { path, max_chars } = args;

        let absolute_path = ensure_absolute_path(&path)?;
        if let Err(e) = validate_resume_path(&absolute_path) {
            return Ok(serde_json::json!({
                "error": format!("{}. Original input: '{}'", e, path)
            }).to_string());
        }
        if !absolute_path.is_file() {
            return Ok(serde_json::json!({
                "error": format!("Path is not a file: {}", absolute_path.display())
            }).to_string());
        }

        let format = match extractor_for_path(&absolute_path) {
            Ok(extractor) => extractor.format_name().to_string(),
            Err(e) => {
                return Ok(serde_json::json!({"error": e.to_string()}).to_string());
            }
        };

        info!("[EXTRACT] Extracting text from {}", absolute_path.display());

        let max_file_bytes = self.config.extraction.max_file_bytes;
        let target = absolute_path.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_file(&target, max_file_bytes)).await?;

        let text = match extracted {
            Ok(text) => text,
            Err(e) => {
                let error_msg = format!("Failed to extract {}: {}", absolute_path.display(), e);
                error!("[EXTRACT] {}", error_msg);
                return Ok(serde_json::json!({"error": error_msg}).to_string());
            }
        };

        let chars = text.chars().count();
        let preview: String = text.chars().take(max_chars).collect();

        Ok(serde_json::json!({
            "document": document_id(&absolute_path),
            "format": format,
            "chars": chars,
            "truncated": chars > max_chars,
            "text": preview,
        }).to_string())
    }
}
