use crate::{LlmProvider, ProviderError, Suggestion};

/// Stand-in used when AI naming is switched off or no usable key exists.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl LlmProvider for NoopProvider {
    async fn suggest(&self, _prompt: &str) -> Result<Suggestion, ProviderError> {
        Err(ProviderError::Disabled)
    }
}
