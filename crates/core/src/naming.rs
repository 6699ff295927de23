//! Target file names: AI suggestions, deterministic fallbacks, collision suffixes.

use crate::categories::Category;
use crate::extractor::Metadata;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_NAME_LEN: usize = 50;
const MIN_SUGGESTION_LEN: usize = 4;
const UNTITLED: &str = "untitled";
const WORDY_EXTENSIONS: &[&str] = &["txt", "md", "pdf", "doc", "docx"];

static ILLEGAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]").expect("valid regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]{4,}\b").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChoice {
    pub stem: String,
    pub file_name: String,
    pub source: NameSource,
    /// Why an AI suggestion was not used, when one was expected.
    pub note: Option<String>,
}

/// What the namer needs to know about one file.
#[derive(Debug, Clone, Copy)]
pub struct NamingInput<'a> {
    pub path: &'a Path,
    pub category: Category,
    pub metadata: &'a Metadata,
    pub content: &'a str,
}

pub fn sanitize(raw: &str) -> String {
    ILLEGAL.replace_all(raw, "_").into_owned()
}

/// Cleans a model reply into a stem; `None` when nothing usable is left.
pub fn sanitize_suggestion(raw: &str, extension: Option<&str>, max_len: usize) -> Option<String> {
    let mut text = raw
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`'))
        .trim();
    if let Some(ext) = extension.filter(|e| !e.is_empty()) {
        let dotted = format!(".{}", ext);
        if text.len() > dotted.len() {
            let cut = text.len() - dotted.len();
            if text.is_char_boundary(cut) && text[cut..].eq_ignore_ascii_case(&dotted) {
                text = &text[..cut];
            }
        }
    }

    let cleaned = sanitize(text);
    let cleaned: String = cleaned.trim_matches('_').chars().take(max_len).collect();
    let cleaned = cleaned.trim_end_matches('_').to_string();
    if cleaned.chars().count() < MIN_SUGGESTION_LEN {
        None
    } else {
        Some(cleaned)
    }
}

/// Deterministic: the same file, metadata and content always give the same stem.
pub fn fallback_stem(input: &NamingInput<'_>) -> String {
    if let Some(date) = input
        .metadata
        .get("photo_date")
        .filter(|_| input.category == Category::Images)
    {
        let date = sanitize(&date.replace([':', '-'], "").replace(' ', "_"));
        if !date.is_empty() {
            return format!("photo_{}", date);
        }
    }

    let ext = crate::extractor::lowercase_extension(input.path).unwrap_or_default();
    if !input.content.is_empty() && WORDY_EXTENSIONS.contains(&ext.as_str()) {
        let head: String = input.content.chars().take(200).collect();
        let words: Vec<String> = WORD
            .find_iter(&head)
            .take(3)
            .map(|m| m.as_str().to_lowercase())
            .collect();
        if words.len() >= 2 {
            return words.join("_");
        }
    }

    let stem = input
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = sanitize(&stem);
    if stem.is_empty() {
        UNTITLED.to_string()
    } else {
        stem
    }
}

pub fn with_extension(stem: &str, path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}.{}", stem, ext),
        _ => stem.to_string(),
    }
}

/// Picks the final name, preferring a usable AI suggestion.
pub fn name_for(
    input: &NamingInput<'_>,
    suggestion: Option<&str>,
    max_len: usize,
) -> NameChoice {
    let ext = input.path.extension().and_then(|e| e.to_str());
    let mut note = None;

    if let Some(raw) = suggestion.filter(|s| !s.trim().is_empty()) {
        match sanitize_suggestion(raw, ext, max_len) {
            Some(stem) => {
                return NameChoice {
                    file_name: with_extension(&stem, input.path),
                    stem,
                    source: NameSource::Ai,
                    note: None,
                }
            }
            None => note = Some(format!("ai suggestion {:?} rejected", raw.trim())),
        }
    }

    let stem = fallback_stem(input);
    NameChoice {
        file_name: with_extension(&stem, input.path),
        stem,
        source: NameSource::Fallback,
        note,
    }
}

fn numbered(file_name: &str, n: u32) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    }
}

/// Paths claimed or given up by earlier actions of the current run.
///
/// A dry run never touches the disk, so the ledger is what keeps its
/// collision decisions identical to a live run over the same input.
#[derive(Debug, Default, Clone)]
pub struct PathLedger {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl PathLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, path: &Path) -> bool {
        if self.claimed.contains(path) {
            return true;
        }
        path.exists() && !self.vacated.contains(path)
    }

    pub fn record_move(&mut self, from: &Path, to: &Path) {
        self.vacated.insert(from.to_path_buf());
        self.vacated.remove(to);
        self.claimed.remove(from);
        self.claimed.insert(to.to_path_buf());
    }

    /// Reserves `to` without freeing the source, for moves that were
    /// attempted but did not happen.
    pub fn claim(&mut self, to: &Path) {
        self.vacated.remove(to);
        self.claimed.insert(to.to_path_buf());
    }

    /// First free path among `name`, `name_2`, `name_3`, ... inside `dir`.
    /// `current` is the file's own location, which never blocks itself.
    pub fn resolve(&self, dir: &Path, file_name: &str, current: Option<&Path>) -> PathBuf {
        let is_free = |candidate: &Path| Some(candidate) == current || !self.is_taken(candidate);

        let candidate = dir.join(file_name);
        if is_free(&candidate) {
            return candidate;
        }
        let mut n = 2;
        loop {
            let candidate = dir.join(numbered(file_name, n));
            if is_free(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Collision check against the filesystem alone.
pub fn resolve_collision(target_dir: &Path, candidate: &str) -> String {
    let resolved = PathLedger::new().resolve(target_dir, candidate, None);
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn input<'a>(path: &'a Path, category: Category, meta: &'a Metadata, content: &'a str) -> NamingInput<'a> {
        NamingInput {
            path,
            category,
            metadata: meta,
            content,
        }
    }

    #[test]
    fn image_without_ai_keeps_extension() {
        let meta = Metadata::new();
        let path = Path::new("/tmp/IMG_1234.jpg");
        let choice = name_for(&input(path, Category::Images, &meta, ""), None, 50);
        assert_eq!(choice.file_name, "IMG_1234.jpg");
        assert_eq!(choice.source, NameSource::Fallback);
        assert!(choice.note.is_none());
    }

    #[test]
    fn exif_date_drives_photo_names() {
        let mut meta = Metadata::new();
        meta.insert("photo_date".into(), "2023:07:14 09:30:05".into());
        let path = Path::new("IMG_1234.JPG");
        let choice = name_for(&input(path, Category::Images, &meta, ""), None, 50);
        assert_eq!(choice.file_name, "photo_20230714_093005.JPG");
    }

    #[test]
    fn documents_use_leading_words() {
        let meta = Metadata::new();
        let path = Path::new("scan001.txt");
        let text = "Quarterly budget review for the marketing team";
        let choice = name_for(&input(path, Category::Documents, &meta, text), None, 50);
        assert_eq!(choice.file_name, "quarterly_budget_review.txt");

        let again = name_for(&input(Path::new("quarterly_budget_review.txt"), Category::Documents, &meta, text), None, 50);
        assert_eq!(again.file_name, choice.file_name);
    }

    #[test]
    fn code_files_keep_a_sanitized_stem() {
        let meta = Metadata::new();
        let path = Path::new("my script (v2).py");
        let choice = name_for(&input(path, Category::Code, &meta, "import os\nprint('hello world')"), None, 50);
        assert_eq!(choice.file_name, "my_script__v2_.py");
    }

    #[test]
    fn fallback_is_never_empty() {
        let meta = Metadata::new();
        let choice = name_for(&input(Path::new("....pdf"), Category::Documents, &meta, ""), None, 50);
        assert!(!choice.stem.is_empty());
        assert!(choice.file_name.ends_with(".pdf"));
    }

    #[test]
    fn ai_suggestion_is_cleaned_and_bounded() {
        let meta = Metadata::new();
        let path = Path::new("notes.txt");
        let choice = name_for(
            &input(path, Category::Documents, &meta, "x"),
            Some("  \"Team Offsite: Agenda & Notes.txt\"\n"),
            50,
        );
        assert_eq!(choice.source, NameSource::Ai);
        assert_eq!(choice.file_name, "Team_Offsite__Agenda___Notes.txt");

        let long = "a".repeat(120);
        let stem = sanitize_suggestion(&long, Some("txt"), 50).unwrap();
        assert_eq!(stem.len(), 50);
    }

    #[test]
    fn short_suggestion_falls_back_with_note() {
        let meta = Metadata::new();
        let path = Path::new("notes.txt");
        let choice = name_for(&input(path, Category::Documents, &meta, ""), Some("ok"), 50);
        assert_eq!(choice.source, NameSource::Fallback);
        assert_eq!(choice.file_name, "notes.txt");
        assert!(choice.note.unwrap().contains("rejected"));
    }

    #[test]
    fn second_report_gets_suffix_two() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_collision(dir.path(), "report.pdf"), "report.pdf");
        fs::write(dir.path().join("report.pdf"), "a").unwrap();
        assert_eq!(resolve_collision(dir.path(), "report.pdf"), "report_2.pdf");
        fs::write(dir.path().join("report_2.pdf"), "b").unwrap();
        assert_eq!(resolve_collision(dir.path(), "report.pdf"), "report_3.pdf");
        assert_eq!(resolve_collision(dir.path(), "README"), "README");
    }

    #[test]
    fn resolve_is_idempotent_without_creating_the_result() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let first = resolve_collision(dir.path(), "a.txt");
        let second = resolve_collision(dir.path(), "a.txt");
        assert_eq!(first, second);
    }

    #[test]
    fn ledger_tracks_claims_and_vacated_paths() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("report.pdf");
        fs::write(&existing, "a").unwrap();

        let mut ledger = PathLedger::new();
        let first = ledger.resolve(dir.path(), "report.pdf", None);
        assert_eq!(first, dir.path().join("report_2.pdf"));
        ledger.record_move(Path::new("/elsewhere/one.pdf"), &first);
        let second = ledger.resolve(dir.path(), "report.pdf", None);
        assert_eq!(second, dir.path().join("report_3.pdf"));

        ledger.record_move(&existing, &dir.path().join("moved.pdf"));
        assert_eq!(
            ledger.resolve(dir.path(), "report.pdf", None),
            existing,
            "a vacated path is free again"
        );
    }

    #[test]
    fn claimed_target_blocks_but_source_stays_taken() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        fs::write(&source, "n").unwrap();

        let mut ledger = PathLedger::new();
        let target = dir.path().join("Organized_Documents/notes.txt");
        ledger.claim(&target);
        assert!(ledger.is_taken(&target));
        assert!(ledger.is_taken(&source));
        assert_eq!(
            ledger.resolve(&dir.path().join("Organized_Documents"), "notes.txt", None),
            dir.path().join("Organized_Documents/notes_2.txt")
        );
    }

    #[test]
    fn own_path_does_not_collide_with_itself() {
        let dir = tempfile::tempdir().unwrap();
        let mine = dir.path().join("report_2.pdf");
        fs::write(dir.path().join("report.pdf"), "a").unwrap();
        fs::write(&mine, "b").unwrap();
        let ledger = PathLedger::new();
        assert_eq!(ledger.resolve(dir.path(), "report.pdf", Some(&mine)), mine);
    }
}
