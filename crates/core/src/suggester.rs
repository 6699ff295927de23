use providers::{LlmProvider, ProviderError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

const PROMPT_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Suggested(String),
    /// AI is off or there was nothing to show it.
    Skipped,
    /// AI was asked and did not deliver; the reason ends up in the log.
    Unavailable(String),
}

impl SuggestionOutcome {
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            SuggestionOutcome::Suggested(s) => Some(s),
            _ => None,
        }
    }
}

pub struct NameSuggester {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
    disabled: bool,
}

impl NameSuggester {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            disabled: false,
        }
    }

    pub async fn suggest(&mut self, path: &Path, content: &str) -> SuggestionOutcome {
        if self.disabled || content.trim().is_empty() {
            return SuggestionOutcome::Skipped;
        }

        let prompt = build_prompt(path, content);
        let result = match tokio::time::timeout(self.timeout, self.provider.suggest(&prompt)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };

        let name = path.display();
        match result {
            Ok(s) => SuggestionOutcome::Suggested(s.text),
            Err(ProviderError::Disabled) => SuggestionOutcome::Skipped,
            Err(e) if e.is_fatal_for_run() => {
                error!("{} for {}; ai naming disabled for the rest of this run", e, name);
                self.disabled = true;
                SuggestionOutcome::Unavailable(e.to_string())
            }
            Err(e @ (ProviderError::QuotaExceeded | ProviderError::RateLimited)) => {
                error!("ai quota/rate limit for {}: {}", name, e);
                SuggestionOutcome::Unavailable(e.to_string())
            }
            Err(e) => {
                warn!("ai analysis failed for {}: {}", name, e);
                SuggestionOutcome::Unavailable(e.to_string())
            }
        }
    }
}

pub fn build_prompt(path: &Path, content: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let preview: String = content.chars().take(PROMPT_PREVIEW_CHARS).collect();
    format!(
        "Analyze this file content and suggest a descriptive filename (without extension).\n\
         Original filename: {stem}\n\
         File type: {ext}\n\
         Content preview: {preview}...\n\n\
         Suggest a clear, descriptive filename that indicates the content.\n\
         Keep it under 50 characters and use underscores instead of spaces.\n\
         Only return the suggested filename, nothing else."
    )
}
