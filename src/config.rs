use crate::extract::EXTRACTABLE_EXTENSIONS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// TF-IDF vectorizer options
    pub ranking: RankingConfig,

    /// Result selection
    pub search: SearchConfig,

    /// Document loading and text extraction
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Lower-case text before tokenizing
    pub lowercase: bool,
    /// Replace raw term counts with 1 + ln(count)
    pub sublinear_tf: bool,
    /// Add one to document frequencies as if an extra document held every term
    pub smooth_idf: bool,
    /// L2-normalize every term vector
    pub normalize: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub min_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub max_file_bytes: u64,
    pub parallel: bool,
    pub supported_extensions: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            sublinear_tf: false,
            smooth_idf: true,
            normalize: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            search: SearchConfig {
                default_top_k: 50,
                max_top_k: 500,
                min_score: 0.0,
            },
            extraction: ExtractionConfig {
                max_file_bytes: 20 * 1024 * 1024,
                parallel: true,
                supported_extensions: vec![".pdf".to_string(), ".txt".to_string(), ".md".to_string()],
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        // Vectorizer
        if let Some(value) = env_bool("RANK_LOWERCASE")? {
            config.ranking.lowercase = value;
        }
        if let Some(value) = env_bool("RANK_SUBLINEAR_TF")? {
            config.ranking.sublinear_tf = value;
        }
        if let Some(value) = env_bool("RANK_SMOOTH_IDF")? {
            config.ranking.smooth_idf = value;
        }
        if let Some(value) = env_bool("RANK_NORMALIZE")? {
            config.ranking.normalize = value;
        }

        // Result selection
        if let Some(value) = env_parse("RANK_DEFAULT_TOP_K")? {
            config.search.default_top_k = value;
        }
        if let Some(value) = env_parse("RANK_MAX_TOP_K")? {
            config.search.max_top_k = value;
        }
        if let Some(value) = env_parse("RANK_MIN_SCORE")? {
            config.search.min_score = value;
        }

        // Extraction
        if let Some(value) = env_parse("EXTRACT_MAX_FILE_BYTES")? {
            config.extraction.max_file_bytes = value;
        }
        if let Some(value) = env_bool("EXTRACT_PARALLEL")? {
            config.extraction.parallel = value;
        }
        if let Ok(extensions) = std::env::var("EXTRACT_EXTENSIONS") {
            config.extraction.supported_extensions = parse_extensions(&extensions);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.max_top_k == 0 {
            return Err(Error::Config("RANK_MAX_TOP_K must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.search.min_score) {
            return Err(Error::Config(format!(
                "RANK_MIN_SCORE must be within [0, 1], got {}",
                self.search.min_score
            )));
        }
        if self.extraction.supported_extensions.is_empty() {
            return Err(Error::Config("EXTRACT_EXTENSIONS must name at least one extension".to_string()));
        }
        let unsupported: Vec<&str> = self
            .extraction
            .supported_extensions
            .iter()
            .map(String::as_str)
            .filter(|ext| !EXTRACTABLE_EXTENSIONS.contains(ext))
            .collect();
        if !unsupported.is_empty() {
            return Err(Error::Config(format!(
                "EXTRACT_EXTENSIONS has no extractor for {} (available: {})",
                unsupported.join(", "),
                EXTRACTABLE_EXTENSIONS.join(", ")
            )));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid value '{raw}' for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn env_bool(key: &str) -> Result<Option<bool>> {
    match std::env::var(key) {
        Ok(raw) => parse_bool(&raw)
            .map(Some)
            .ok_or_else(|| Error::Config(format!("Invalid boolean '{raw}' for {key}"))),
        Err(_) => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Normalizes a comma-separated list like `pdf, .TXT` into `[".pdf", ".txt"]`.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty() && ext != ".")
        .map(|ext| if ext.starts_with('.') { ext } else { format!(".{ext}") })
        .collect()
}
