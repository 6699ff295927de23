use crate::categories::Category;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

pub type Metadata = BTreeMap<String, String>;

pub const DEFAULT_MIME: &str = "application/octet-stream";

const TEXT_PREVIEW_EXTENSIONS: &[&str] = &[
    "txt", "md", "py", "js", "html", "css", "json", "xml", "csv",
];

/// Content sniffing first, then a guess from the extension.
pub fn guess_mime(path: &Path) -> String {
    if let Ok(Some(kind)) = infer::get_from_path(path) {
        return kind.mime_type().to_string();
    }
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME.to_string())
}

pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Basic filesystem facts plus EXIF fields for images. Missing values are
/// left out rather than reported as errors.
pub fn extract_metadata(path: &Path, category: Category) -> Metadata {
    let mut metadata = Metadata::new();
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        metadata.insert("original_name".into(), name.to_string());
    }
    if let Some(ext) = lowercase_extension(path) {
        metadata.insert("extension".into(), format!(".{}", ext));
    }

    if let Ok(meta) = fs::metadata(path) {
        metadata.insert("size".into(), meta.len().to_string());
        if let Ok(created) = meta.created() {
            metadata.insert("created".into(), format_time(created));
        }
        if let Ok(modified) = meta.modified() {
            metadata.insert("modified".into(), format_time(modified));
        }
    }

    if category == Category::Images {
        if let Some(exif) = extract_exif(path) {
            metadata.extend(exif);
        }
    }

    metadata
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339()
}

/// First `max_chars` characters of readable content, or an empty string.
pub fn read_content_preview(path: &Path, max_chars: usize) -> String {
    let ext = lowercase_extension(path).unwrap_or_default();
    let preview = if TEXT_PREVIEW_EXTENSIONS.contains(&ext.as_str()) {
        read_text_prefix(path, max_chars)
    } else if ext == "pdf" {
        pdf_text(path, max_chars)
    } else {
        Ok(String::new())
    };

    match preview {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("could not read content from {:?}: {}", path, e);
            String::new()
        }
    }
}

fn read_text_prefix(path: &Path, max_chars: usize) -> anyhow::Result<String> {
    let file = fs::File::open(path)?;
    // UTF-8 needs at most four bytes per character.
    let mut buf = Vec::with_capacity(max_chars * 4);
    file.take((max_chars * 4) as u64).read_to_end(&mut buf)?;
    let text = String::from_utf8_lossy(&buf);
    Ok(text.chars().take(max_chars).collect())
}

#[cfg(feature = "pdf")]
fn pdf_text(path: &Path, max_chars: usize) -> anyhow::Result<String> {
    let content = pdf_extract::extract_text(path)?;
    Ok(content.chars().take(max_chars).collect())
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_path: &Path, _max_chars: usize) -> anyhow::Result<String> {
    Ok(String::new())
}

#[cfg(feature = "exif")]
fn extract_exif(path: &Path) -> Option<Metadata> {
    let file = fs::File::open(path).ok()?;
    let mut bufreader = std::io::BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut bufreader)
        .ok()?;

    let ascii = |tag: exif::Tag| -> Option<String> {
        let field = exif.get_field(tag, exif::In::PRIMARY)?;
        match &field.value {
            exif::Value::Ascii(parts) => parts
                .first()
                .map(|raw| String::from_utf8_lossy(raw).trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    };

    let mut map = Metadata::new();
    if let Some(date) = ascii(exif::Tag::DateTimeOriginal).or_else(|| ascii(exif::Tag::DateTime)) {
        map.insert("photo_date".into(), date);
    }
    if let (Some(make), Some(model)) = (ascii(exif::Tag::Make), ascii(exif::Tag::Model)) {
        map.insert("camera".into(), format!("{} {}", make, model));
    }
    Some(map)
}

#[cfg(not(feature = "exif"))]
fn extract_exif(_path: &Path) -> Option<Metadata> {
    None
}
