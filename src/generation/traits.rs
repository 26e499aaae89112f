// Generation capability trait.
//
// One call in, one string out. Implementations are shared read-only across
// requests and own their own request timeout.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::GenerationParams;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Everything the capability needs for one completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one chat completion and return the assistant's text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    fn name(&self) -> &'static str;
}
