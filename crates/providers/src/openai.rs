use crate::{LlmProvider, ProviderError, Suggestion};
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    cfg: Arc<OpenAiConfig>,
}

#[derive(serde::Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessageResp,
}

#[derive(Deserialize)]
struct ChatMessageResp {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    choices: Vec<Choice>,
    model: Option<String>,
}

impl OpenAiProvider {
    pub fn new(cfg: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }

    /// Sends a one-token request to check that the key and endpoint work.
    pub async fn ping(&self) -> Result<(), ProviderError> {
        self.chat("test", 1, 0.0).await.map(|_| ())
    }

    async fn chat(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<ChatApiResponse, ProviderError> {
        let body = ChatRequest {
            model: &self.cfg.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature,
        };

        let resp = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.cfg.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(error_for_status(status, &String::from_utf8_lossy(&body)));
        }

        resp.json().await.map_err(map_transport_error)
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn suggest(&self, prompt: &str) -> Result<Suggestion, ProviderError> {
        let parsed = self.chat(prompt, 50, 0.3).await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(Suggestion {
            text: content,
            model: parsed.model,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

pub(crate) fn error_for_status(status: u16, body: &str) -> ProviderError {
    match status {
        401 => ProviderError::InvalidApiKey,
        429 if body.contains("insufficient_quota") => ProviderError::QuotaExceeded,
        429 => ProviderError::RateLimited,
        _ if body.contains("invalid_api_key") => ProviderError::InvalidApiKey,
        _ => ProviderError::RequestFailed(format!("status {} body {:?}", status, body)),
    }
}
