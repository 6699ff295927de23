//! Static extension table and MIME fallback for the fixed category set.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ORGANIZED_PREFIX: &str = "Organized_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Images,
    Documents,
    Spreadsheets,
    Presentations,
    Audio,
    Video,
    Archives,
    Code,
    Data,
    Other,
}

const TABLE: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "svg", "webp", "ico"],
    ),
    (
        Category::Documents,
        &["pdf", "doc", "docx", "txt", "rtf", "odt", "pages"],
    ),
    (
        Category::Spreadsheets,
        &["xls", "xlsx", "csv", "numbers", "ods"],
    ),
    (Category::Presentations, &["ppt", "pptx", "key", "odp"]),
    (Category::Audio, &["mp3", "wav", "aac", "flac", "ogg", "m4a"]),
    (
        Category::Video,
        &["mp4", "avi", "mov", "mkv", "wmv", "flv", "webm", "m4v"],
    ),
    (
        Category::Archives,
        &["zip", "rar", "7z", "tar", "gz", "dmg", "pkg"],
    ),
    (
        Category::Code,
        &[
            "py", "js", "html", "css", "java", "cpp", "c", "php", "rb", "go", "swift",
        ],
    ),
    (
        Category::Data,
        &["json", "xml", "yaml", "yml", "sql", "db", "sqlite"],
    ),
];

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Images,
        Category::Documents,
        Category::Spreadsheets,
        Category::Presentations,
        Category::Audio,
        Category::Video,
        Category::Archives,
        Category::Code,
        Category::Data,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Spreadsheets => "Spreadsheets",
            Category::Presentations => "Presentations",
            Category::Audio => "Audio",
            Category::Video => "Video",
            Category::Archives => "Archives",
            Category::Code => "Code",
            Category::Data => "Data",
            Category::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn folder_name(self) -> String {
        format!("{}{}", ORGANIZED_PREFIX, self.label())
    }

    /// `Organized_Images` -> `Images`. Unknown labels are not organized folders.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        name.strip_prefix(ORGANIZED_PREFIX).and_then(Self::from_label)
    }

    /// Accepts the extension with or without a leading dot, in any case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            return None;
        }
        TABLE
            .iter()
            .find(|(_, exts)| exts.contains(&ext.as_str()))
            .map(|(category, _)| *category)
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.to_lowercase();
        let (kind, subtype) = mime.split_once('/')?;

        let category = match kind {
            "image" => Category::Images,
            "audio" => Category::Audio,
            "video" => Category::Video,
            _ if subtype.contains("spreadsheet") || subtype.contains("ms-excel") => {
                Category::Spreadsheets
            }
            _ if subtype.contains("presentation") || subtype.contains("ms-powerpoint") => {
                Category::Presentations
            }
            _ if subtype == "pdf"
                || subtype == "msword"
                || subtype == "rtf"
                || subtype.contains("wordprocessingml")
                || subtype.contains("opendocument.text") =>
            {
                Category::Documents
            }
            _ if matches!(
                subtype,
                "zip"
                    | "x-tar"
                    | "gzip"
                    | "x-gzip"
                    | "x-7z-compressed"
                    | "vnd.rar"
                    | "x-rar-compressed"
                    | "x-bzip2"
                    | "x-xz"
                    | "zstd"
            ) =>
            {
                Category::Archives
            }
            _ if subtype.contains("json")
                || subtype.contains("xml")
                || subtype.contains("yaml")
                || subtype == "sql"
                || subtype.contains("sqlite") =>
            {
                Category::Data
            }
            "text" => Category::Documents,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
