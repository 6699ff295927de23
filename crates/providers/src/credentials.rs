//! Format checks for OpenAI API keys. No network access happens here.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Legacy,
    Project,
}

impl KeyKind {
    fn bounds(self) -> (usize, usize) {
        match self {
            KeyKind::Legacy => (45, 60),
            KeyKind::Project => (150, 200),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KeyKind::Legacy => "legacy",
            KeyKind::Project => "project-based",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("no api key provided")]
    Missing,
    #[error("api key must start with 'sk-' or 'sk-proj-'")]
    BadPrefix,
    #[error("{} api key has unusual length {} (expected {}-{})", .kind.label(), .len, .min, .max)]
    BadLength {
        kind: KeyKind,
        len: usize,
        min: usize,
        max: usize,
    },
    #[error("api key contains spaces")]
    Corrupted,
}

/// Strips surrounding whitespace and stray line breaks, then checks shape.
pub fn validate_api_key(raw: &str) -> Result<(String, KeyKind), KeyError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    if cleaned.is_empty() {
        return Err(KeyError::Missing);
    }

    let kind = if cleaned.starts_with("sk-proj-") {
        KeyKind::Project
    } else if cleaned.starts_with("sk-") {
        KeyKind::Legacy
    } else {
        return Err(KeyError::BadPrefix);
    };

    let (min, max) = kind.bounds();
    let len = cleaned.chars().count();
    if len < min || len > max {
        return Err(KeyError::BadLength {
            kind,
            len,
            min,
            max,
        });
    }
    if cleaned.contains(' ') {
        return Err(KeyError::Corrupted);
    }

    tracing::debug!(
        kind = kind.label(),
        len,
        prefix = %cleaned.chars().take(8).collect::<String>(),
        "api key format accepted"
    );
    Ok((cleaned, kind))
}
