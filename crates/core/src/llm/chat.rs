use crate::config::Settings;
use crate::error::{AdvisoryError, Result};
use crate::llm::{ChatMessage, CompletionClient};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "chat completions";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f64 = 0.7;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ChatCompletionsClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_llm_api_key()?.to_string();

        let connect_timeout_secs = std::env::var("LLM_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            api_key,
            settings.llm_base_url.clone(),
            Duration::from_secs(connect_timeout_secs),
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn new(
        api_key: String,
        base_url: String,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .context("failed to build chat completions http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, model: &str, messages: Vec<ChatMessage>) -> Result<String> {
        let req = ChatCompletionRequest {
            model,
            messages,
            temperature: TEMPERATURE,
        };

        let res = self
            .http
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| AdvisoryError::transport(SERVICE, e))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| AdvisoryError::transport(SERVICE, e))?;

        if !status.is_success() {
            tracing::warn!(%status, model, "chat completion request rejected");
            return Err(AdvisoryError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed = serde_json::from_str::<ChatCompletionResponse>(&text)
            .map_err(|e| AdvisoryError::malformed(SERVICE, format!("{e}: {text}")))?;

        parsed.into_content()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> Result<String> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AdvisoryError::malformed(SERVICE, "response has no choices"))?;

        choice
            .message
            .content
            .ok_or_else(|| AdvisoryError::malformed(SERVICE, "first choice has no message content"))
    }
}
