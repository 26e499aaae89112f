// Groq chat-completions client (OpenAI-compatible API).
//
// API docs: https://console.groq.com/docs/api-reference#chat-create

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{ChatMessage, CompletionRequest, TextGenerator};

pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    /// Build a client. `timeout` bounds each request end to end; a stalled
    /// call fails with a timeout error instead of hanging the request.
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("respectrewrite/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatCompletionRequest::from(request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to call Groq chat completions")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API returned {}: {}", status, text);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse Groq response")?;

        let content = parsed.into_content()?;
        debug!(model = %request.params.model, chars = content.len(), "Groq completion received");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

// --- Chat completions request/response types ---

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl<'a> From<&'a CompletionRequest> for ChatCompletionRequest<'a> {
    fn from(req: &'a CompletionRequest) -> Self {
        Self {
            model: &req.params.model,
            messages: &req.messages,
            max_tokens: req.params.max_tokens,
            temperature: req.params.temperature,
            top_p: req.params.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice. No choice, null content or
    /// blank content are all errors.
    pub fn into_content(self) -> Result<String> {
        let content = self
            .choices
            .into_iter()
            .next()
            .context("Groq response had no choices")?
            .message
            .content
            .context("Groq response had no message content")?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Groq response content was empty");
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::prompt::{build_request, GenerationParams};

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let client = GroqClient::new(
            "gsk_test".to_string(),
            "https://api.groq.com/openai/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_carries_sampling_params() {
        let req = build_request("you are stupid", &GenerationParams::default());
        let json = serde_json::to_value(ChatCompletionRequest::from(&req)).unwrap();

        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["max_tokens"], 80);
        assert!((json["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!((json["top_p"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }
}
