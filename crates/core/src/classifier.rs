use crate::categories::Category;
use crate::extractor::{self, Metadata};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub mime_type: String,
    pub metadata: Metadata,
}

/// Total and read-only: unknown or unreadable files land in `Other`.
pub fn classify(path: &Path) -> Classification {
    let mime_type = extractor::guess_mime(path);
    let category = categorize(path, &mime_type);
    let metadata = extractor::extract_metadata(path, category);
    Classification {
        category,
        mime_type,
        metadata,
    }
}

pub fn categorize(path: &Path, mime: &str) -> Category {
    // Fast path: extension table.
    if let Some(category) = extractor::lowercase_extension(path)
        .as_deref()
        .and_then(Category::from_extension)
    {
        return category;
    }
    Category::from_mime(mime).unwrap_or(Category::Other)
}
