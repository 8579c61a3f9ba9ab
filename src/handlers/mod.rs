
pub mod extract;
pub mod rank;

pub use extract::ExtractTextArgs;
pub use rank::RankResumesArgs;

use crate::{Result, Error, Config};
use crate::rank::Ranker;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct RankingHandlers {
    config: Config,
    ranker: Ranker,
}

impl RankingHandlers {
    pub fn new(config: Config) -> Self {
        let ranker = Ranker::new(&config.ranking);
        Self { config, ranker }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn is_supported(&self, path: &Path) -> bool {
        crate::extract::extension_of(path)
            .map(|ext| self.config.extraction.supported_extensions.contains(&ext))
            .unwrap_or(false)
    }
}

pub fn ensure_absolute_path(path: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(path);

    if path_buf.is_absolute() {
        Ok(path_buf)
    } else {
        let current_dir = std::env::current_dir()?;
        let absolute = current_dir.join(path_buf);

        tracing::warn!(
            "Relative path provided: '{}', resolved to absolute: '{}'",
            path,
            absolute.display()
        );

        Ok(absolute)
    }
}

pub fn validate_resume_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::InvalidPath(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    if !path.is_file() && !path.is_dir() {
        return Err(Error::InvalidPath(format!(
            "Path is neither a file nor a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Display name for a resume: its file name, or the full path if it has none.
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
