//! Rank resumes handler
//!
//! Handles the rank_resumes MCP tool: validate, collect files, extract, rank.

use super::{document_id, ensure_absolute_path, validate_resume_path, RankingHandlers};
use crate::rank::{assemble, select, Ranking};
use crate::types::{Document, RankingReport};
use crate::Result;
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
pub struct RankResumesArgs {
    pub job_description: String,
    pub paths: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f32>,
}

impl RankingHandlers {
    /// Handle rank_resumes tool call - returns JSON string
    pub async fn handle_rank_resumes(&self, args: RankResumesArgs) -> Result<String> {
        let RankResumesArgs {
            job_description,
            paths,
            limit,
            min_score,
        } = args;

        if job_description.trim().is_empty() {
            return Ok(serde_json::json!({
                "error": "Please enter a job description."
            }).to_string());
        }

        if paths.is_empty() {
            return Ok(serde_json::json!({
                "error": "Please provide at least one resume file or directory."
            }).to_string());
        }

        let min_score = min_score.unwrap_or(self.config.search.min_score);
        if !(0.0..=1.0).contains(&min_score) {
            return Ok(serde_json::json!({
                "error": format!("minScore must be within [0, 1], got {}", min_score)
            }).to_string());
        }
        let limit = limit
            .unwrap_or(self.config.search.default_top_k)
            .min(self.config.search.max_top_k);

        let CollectedResumes { files, skipped } = match self.collect_resumes(&paths) {
            Ok(collected) => collected,
            Err(e) => {
                return Ok(serde_json::json!({
                    "error": format!("{}. Original input: {:?}", e, paths)
                }).to_string());
            }
        };

        if files.is_empty() {
            return Ok(serde_json::json!({
                "error": format!(
                    "No resumes found. Supported extensions: {}{}",
                    self.config.extraction.supported_extensions.join(", "),
                    if skipped.is_empty() {
                        String::new()
                    } else {
                        format!(". Skipped: {}", skipped.join("; "))
                    }
                )
            }).to_string());
        }

        info!("[RANK] Ranking {} resumes", files.len());
        let started = Instant::now();

        let handlers = self.clone();
        let (documents, ranking) = tokio::task::spawn_blocking(move || {
            handlers.extract_and_rank(&job_description, &files)
        })
        .await?;

        let mut warnings = skipped;
        warnings.extend(documents.iter().filter_map(Document::warning));
        for warning in &warnings {
            warn!("[RANK] {}", warning);
        }

        let results = select(assemble(&documents, &ranking.scores), limit, min_score);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            "[RANK] Ranked {} resumes over {} terms in {}ms ({} warnings)",
            documents.len(),
            ranking.vocabulary_size,
            elapsed_ms,
            warnings.len()
        );

        let report = RankingReport {
            results,
            documents_ranked: documents.len(),
            vocabulary_size: ranking.vocabulary_size,
            warnings,
            elapsed_ms,
            ranked_at: chrono::Utc::now().to_rfc3339(),
        };

        Ok(serde_json::to_string(&report)?)
    }
}

/// A resume file and the identifier it is reported under
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub path: PathBuf,
    pub id: String,
}

/// Resumes to rank, plus warnings for submitted files that were left out
#[derive(Debug, Default)]
pub struct CollectedResumes {
    pub files: Vec<ResumeFile>,
    pub skipped: Vec<String>,
}

impl RankingHandlers {
    /// Resolves files and directories into an ordered, de-duplicated list of resumes.
    ///
    /// Files are kept in the order given and named by file name. Directories
    /// are walked recursively in file-name order, contribute only files with a
    /// supported extension, and name them relative to the directory. Symlinked
    /// files are followed; symlinked directories are not. Identifiers that
    /// still collide fall back to the full path.
    pub fn collect_resumes(&self, paths: &[String]) -> Result<CollectedResumes> {
        let mut seen = HashSet::new();
        let mut collected = CollectedResumes::default();

        for raw in paths {
            let path = ensure_absolute_path(raw)?;
            validate_resume_path(&path)?;

            if path.is_file() {
                let id = document_id(&path);
                if !self.is_supported(&path) {
                    warn!("[SCAN] Skipping unsupported file: {}", path.display());
                    collected.skipped.push(format!(
                        "{}: unsupported format, skipped (supported: {})",
                        id,
                        self.config.extraction.supported_extensions.join(", ")
                    ));
                    continue;
                }
                if seen.insert(path.clone()) {
                    collected.files.push(ResumeFile { path, id });
                }
                continue;
            }

            let mut found = 0;
            for entry in WalkDir::new(&path).follow_links(false).sort_by_file_name() {
                let entry = entry?;
                let file_type = entry.file_type();
                if file_type.is_symlink() {
                    if !entry.path().is_file() {
                        debug!("[SCAN] Not following symlink: {}", entry.path().display());
                        continue;
                    }
                } else if !file_type.is_file() {
                    continue;
                }

                let file_path = entry.into_path();
                if self.is_supported(&file_path) && seen.insert(file_path.clone()) {
                    let id = file_path
                        .strip_prefix(&path)
                        .map(|relative| relative.display().to_string())
                        .unwrap_or_else(|_| document_id(&file_path));
                    collected.files.push(ResumeFile { path: file_path, id });
                    found += 1;
                }
            }
            info!("[SCAN] Found {} resumes in {}", found, path.display());
        }

        disambiguate_ids(&mut collected.files);
        Ok(collected)
    }

    /// Extracts every file, keeping input order. Failures become empty documents.
    pub fn extract_documents(&self, files: &[ResumeFile]) -> Vec<Document> {
        let max_file_bytes = self.config.extraction.max_file_bytes;
        let extract_one = |file: &ResumeFile| {
            match crate::extract::extract_file(&file.path, max_file_bytes) {
                Ok(text) => Document::new(file.id.clone(), text),
                Err(e) => Document::failed(file.id.clone(), e.to_string()),
            }
        };

        if self.config.extraction.parallel {
            files.par_iter().map(extract_one).collect()
        } else {
            files.iter().map(extract_one).collect()
        }
    }

    fn extract_and_rank(&self, job_description: &str, files: &[ResumeFile]) -> (Vec<Document>, Ranking) {
        let documents = self.extract_documents(files);
        let corpus: Vec<&str> = documents.iter().map(|doc| doc.content.as_str()).collect();
        let ranking = self.ranker.rank_with_stats(job_description, &corpus);
        (documents, ranking)
    }
}

fn disambiguate_ids(files: &mut [ResumeFile]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for file in files.iter() {
        *counts.entry(file.id.clone()).or_insert(0) += 1;
    }
    for file in files.iter_mut() {
        if counts[&file.id] > 1 {
            file.id = file.path.display().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::pdf::sample_pdf;
    use crate::types::ExtractionStatus;
    use crate::Config;
    use std::path::Path;
    use tempfile::tempdir;

    fn args(job_description: &str, paths: Vec<String>) -> RankResumesArgs {
        RankResumesArgs {
            job_description: job_description.to_string(),
            paths,
            limit: None,
            min_score: None,
        }
    }

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    fn error_of(response: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(response).unwrap();
        value.get("error").and_then(|e| e.as_str()).map(str::to_string)
    }

    #[tokio::test]
    async fn test_rejects_empty_job_description() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "rust").unwrap();
        let handlers = RankingHandlers::new(Config::default());

        let response = handlers
            .handle_rank_resumes(args("   ", vec![path_str(dir.path())]))
            .await
            .unwrap();
        assert!(error_of(&response).unwrap().contains("job description"));
    }

    #[tokio::test]
    async fn test_rejects_empty_resume_list() {
        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("rust engineer", vec![]))
            .await
            .unwrap();
        assert!(error_of(&response).unwrap().contains("at least one resume"));
    }

    #[tokio::test]
    async fn test_rejects_missing_path() {
        let dir = tempdir().unwrap();
        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("rust engineer", vec![path_str(&dir.path().join("gone.pdf"))]))
            .await
            .unwrap();
        assert!(error_of(&response).unwrap().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_rejects_directory_without_resumes() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("photo.png"), [0u8; 4]).unwrap();
        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("rust engineer", vec![path_str(dir.path())]))
            .await
            .unwrap();
        assert!(error_of(&response).unwrap().contains("No resumes found"));
    }

    #[tokio::test]
    async fn test_ranks_directory_descending() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("alice.txt"),
            "senior backend engineer with 5 years Python experience",
        )
        .unwrap();
        std::fs::write(dir.path().join("bob.txt"), "graphic designer with Photoshop skills").unwrap();
        std::fs::write(dir.path().join("carol.pdf"), sample_pdf(&["backend engineer", ""])).unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("senior backend engineer Python", vec![path_str(dir.path())]))
            .await
            .unwrap();
        let report: RankingReport = serde_json::from_str(&response).unwrap();

        assert_eq!(report.documents_ranked, 3);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].document, "alice.txt");
        assert_eq!(report.results[0].rank, 1);
        assert_eq!(report.results[2].document, "bob.txt");
        assert_eq!(report.results[2].score, 0.0);
        assert!(report.results[1].score > 0.0);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_resume_does_not_abort_batch() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let broken = dir.path().join("broken.pdf");
        std::fs::write(&good, "data scientist").unwrap();
        std::fs::write(&broken, b"not really a pdf").unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("data scientist", vec![path_str(&broken), path_str(&good)]))
            .await
            .unwrap();
        let report: RankingReport = serde_json::from_str(&response).unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].document, "good.txt");
        assert!((report.results[0].score - 1.0).abs() < 1e-6);

        let failed = &report.results[1];
        assert_eq!(failed.document, "broken.pdf");
        assert_eq!(failed.score, 0.0);
        assert!(matches!(failed.extraction, ExtractionStatus::Failed { .. }));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("broken.pdf"));
    }

    #[tokio::test]
    async fn test_limit_and_min_score() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "rust engineer").unwrap();
        std::fs::write(dir.path().join("b.txt"), "rust").unwrap();
        std::fs::write(dir.path().join("c.txt"), "accountant").unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let mut request = args("rust engineer", vec![path_str(dir.path())]);
        request.limit = Some(1);
        let report: RankingReport =
            serde_json::from_str(&handlers.handle_rank_resumes(request).await.unwrap()).unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].document, "a.txt");
        assert_eq!(report.documents_ranked, 3);

        let mut request = args("rust engineer", vec![path_str(dir.path())]);
        request.min_score = Some(0.01);
        let report: RankingReport =
            serde_json::from_str(&handlers.handle_rank_resumes(request).await.unwrap()).unwrap();
        assert_eq!(report.results.len(), 2);
    }

    #[test]
    fn test_collect_resumes_order_and_dedup() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.pdf"), "a").unwrap();
        std::fs::write(nested.join("c.md"), "c").unwrap();
        std::fs::write(dir.path().join("notes.docx"), "x").unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let explicit = path_str(&dir.path().join("b.txt"));
        let collected = handlers
            .collect_resumes(&[explicit, path_str(dir.path())])
            .unwrap();

        let names: Vec<String> = collected.files.iter().map(|f| f.id.clone()).collect();
        let nested_id = Path::new("nested").join("c.md").display().to_string();
        assert_eq!(names, vec!["b.txt".to_string(), "a.pdf".to_string(), nested_id]);
        assert!(collected.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_same_file_name_in_different_folders_stays_distinct() {
        let dir = tempdir().unwrap();
        for (folder, text) in [("alice", "rust engineer"), ("bob", "pastry chef")] {
            std::fs::create_dir_all(dir.path().join(folder)).unwrap();
            std::fs::write(dir.path().join(folder).join("resume.txt"), text).unwrap();
        }

        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("rust engineer", vec![path_str(dir.path())]))
            .await
            .unwrap();
        let report: RankingReport = serde_json::from_str(&response).unwrap();

        let alice = Path::new("alice").join("resume.txt").display().to_string();
        let bob = Path::new("bob").join("resume.txt").display().to_string();
        assert_eq!(report.results[0].document, alice);
        assert_eq!(report.results[1].document, bob);
    }

    #[test]
    fn test_colliding_ids_fall_back_to_full_path() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        std::fs::write(dir.path().join("resume.txt"), "a").unwrap();
        std::fs::write(other.path().join("resume.txt"), "b").unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let collected = handlers
            .collect_resumes(&[path_str(dir.path()), path_str(&other.path().join("resume.txt"))])
            .unwrap();

        let ids: Vec<String> = collected.files.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids[0], dir.path().join("resume.txt").display().to_string());
        assert_eq!(ids[1], other.path().join("resume.txt").display().to_string());
    }

    #[tokio::test]
    async fn test_unsupported_explicit_file_is_reported() {
        let dir = tempdir().unwrap();
        let resume = dir.path().join("resume.txt");
        let word = dir.path().join("cv.docx");
        std::fs::write(&resume, "rust engineer").unwrap();
        std::fs::write(&word, "rust engineer").unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("rust engineer", vec![path_str(&word), path_str(&resume)]))
            .await
            .unwrap();
        let report: RankingReport = serde_json::from_str(&response).unwrap();

        assert_eq!(report.documents_ranked, 1);
        assert_eq!(report.results[0].document, "resume.txt");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("cv.docx: unsupported format"));
    }

    #[tokio::test]
    async fn test_only_unsupported_files_names_them_in_error() {
        let dir = tempdir().unwrap();
        let word = dir.path().join("cv.docx");
        std::fs::write(&word, "rust engineer").unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let response = handlers
            .handle_rank_resumes(args("rust engineer", vec![path_str(&word)]))
            .await
            .unwrap();
        let error = error_of(&response).unwrap();
        assert!(error.contains("No resumes found"));
        assert!(error.contains("cv.docx"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_resume_in_directory_is_collected() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let target = outside.path().join("real.txt");
        std::fs::write(&target, "rust engineer").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.txt")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked_dir")).unwrap();

        let handlers = RankingHandlers::new(Config::default());
        let collected = handlers.collect_resumes(&[path_str(dir.path())]).unwrap();

        let ids: Vec<String> = collected.files.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids, vec!["linked.txt".to_string()]);
    }

    #[test]
    fn test_sequential_and_parallel_extraction_agree() {
        let dir = tempdir().unwrap();
        let files: Vec<ResumeFile> = (0..8)
            .map(|i| {
                let path = dir.path().join(format!("r{i}.txt"));
                std::fs::write(&path, format!("resume number {i}")).unwrap();
                ResumeFile { id: document_id(&path), path }
            })
            .collect();

        let parallel = RankingHandlers::new(Config::default()).extract_documents(&files);

        let mut config = Config::default();
        config.extraction.parallel = false;
        let sequential = RankingHandlers::new(config).extract_documents(&files);

        let ids = |docs: &[Document]| docs.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&parallel), ids(&sequential));
        assert_eq!(parallel[3].content, "resume number 3");
    }
}
