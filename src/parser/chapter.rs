use std::path::{Component, Path};

pub const CHAPTER_ID_SUFFIX: &str = "-quiz";

/// Chapter identifier for a document at `logical_path` (relative to the content root).
///
/// The innermost directory whose name starts with `prefix` names the chapter; documents
/// outside any chapter directory fall back to their own base name.
pub fn chapter_id_for(logical_path: &Path, prefix: &str) -> String {
    let chapter_segment = logical_path.parent().and_then(|parent| {
        parent
            .components()
            .rev()
            .filter_map(|component| match component {
                Component::Normal(segment) => segment.to_str(),
                _ => None,
            })
            .find(|segment| segment.starts_with(prefix))
    });

    match chapter_segment {
        Some(segment) => format!("{}{}", segment, CHAPTER_ID_SUFFIX),
        None => logical_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("quiz")
            .to_string(),
    }
}

/// Filename heuristic used by the importer: a markdown file with "quiz" in its name.
pub fn looks_like_quiz_document(path: &Path) -> bool {
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "mdx"))
        .unwrap_or(false);

    let named_quiz = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_ascii_lowercase().contains("quiz"))
        .unwrap_or(false);

    is_markdown && named_quiz
}
