use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    parser::{looks_like_quiz_document, QuizParser},
    services::quiz_service::QuizService,
};

/// Outcome of one import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<String>, // chapter ids
    pub no_quiz: Vec<PathBuf>,
    pub unreadable: Vec<PathBuf>,
    pub warnings: usize,
}

pub struct QuizImportService {
    quiz_service: Arc<QuizService>,
    parser: QuizParser,
}

impl QuizImportService {
    pub fn new(quiz_service: Arc<QuizService>, parser: QuizParser) -> Self {
        Self {
            quiz_service,
            parser,
        }
    }

    /// Quiz documents under `root`, sorted. Hidden entries are skipped, as are
    /// subdirectories that cannot be listed.
    pub fn discover_documents(root: &Path) -> AppResult<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(AppError::Io(format!(
                "Content directory {} does not exist",
                root.display()
            )));
        }

        let mut documents = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) if dir.as_path() == root => return Err(err.into()),
                Err(err) => {
                    log::warn!("Skipping unreadable directory {}: {}", dir.display(), err);
                    continue;
                }
            };

            for entry in entries.filter_map(|e| e.ok()) {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }

                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if looks_like_quiz_document(&path) {
                    documents.push(path);
                }
            }
        }

        documents.sort();
        Ok(documents)
    }

    /// Parses every quiz document under `root` and upserts the results.
    ///
    /// Unreadable documents and documents without questions are skipped; a storage
    /// failure stops the run.
    pub async fn import_directory(&self, root: &Path) -> AppResult<ImportReport> {
        let documents = Self::discover_documents(root)?;
        log::info!(
            "Found {} quiz documents under {}",
            documents.len(),
            root.display()
        );

        let mut report = ImportReport::default();

        for path in documents {
            let logical_path = path.strip_prefix(root).unwrap_or(&path);

            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("Skipping unreadable document {}: {}", path.display(), err);
                    report.unreadable.push(path);
                    continue;
                }
            };

            let Some(parsed) = self.parser.parse(logical_path, &text) else {
                log::info!("No quiz found in {}", path.display());
                report.no_quiz.push(path);
                continue;
            };

            for warning in &parsed.warnings {
                log::warn!("{}: {}", logical_path.display(), warning);
            }
            report.warnings += parsed.warnings.len();

            let quiz = self.quiz_service.upsert_parsed(parsed).await?;
            report.imported.push(quiz.chapter_id);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, contents).expect("write file");
    }

    #[test]
    fn discovers_quiz_documents_recursively() {
        let dir = TempDir::new().expect("temp dir");
        write(dir.path(), "chapter-2/quiz.md", "");
        write(dir.path(), "chapter-1/quiz.md", "");
        write(dir.path(), "chapter-1/intro.md", "");
        write(dir.path(), ".drafts/quiz.md", "");

        let documents =
            QuizImportService::discover_documents(dir.path()).expect("discovery should work");

        let relative: Vec<_> = documents
            .iter()
            .map(|p| p.strip_prefix(dir.path()).expect("inside root").to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("chapter-1/quiz.md"),
                PathBuf::from("chapter-2/quiz.md")
            ]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let result = QuizImportService::discover_documents(&dir.path().join("nope"));

        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
