// ExplanationGenerator: one generation call per toxic message.
//
// By the time this runs the verdict is already "toxic", and nothing here may
// lose it. Every capability failure (transport, auth, rate limit, malformed
// or empty response) is logged and replaced by FALLBACK_EXPLANATION.

use std::sync::Arc;

use tracing::warn;

use super::prompt::{build_request, GenerationParams};
use super::traits::{CompletionRequest, TextGenerator};
use crate::error::{ModerationError, Result};
use crate::models::RawGeneration;

/// Returned in place of an explanation when generation fails.
pub const FALLBACK_EXPLANATION: &str = "Sorry, rewrite unavailable.";

/// Outcome of `ExplanationGenerator::generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Text from the capability, not yet checked against the format contract.
    Produced(RawGeneration),
    /// The capability failed; carries no generated text.
    Fallback,
}

impl Generation {
    pub fn text(&self) -> &str {
        match self {
            Generation::Produced(raw) => &raw.content,
            Generation::Fallback => FALLBACK_EXPLANATION,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback)
    }
}

#[derive(Clone)]
pub struct ExplanationGenerator {
    backend: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl ExplanationGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { backend, params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn request_for(&self, text: &str) -> CompletionRequest {
        build_request(text, &self.params)
    }

    /// One generation call, failures surfaced as `GenerationUnavailable`.
    pub async fn try_generate(&self, text: &str) -> Result<RawGeneration> {
        let request = self.request_for(text);
        let content = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| ModerationError::generation(format!("{e:#}")))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(ModerationError::generation(format!(
                "{} returned empty content",
                self.backend.name()
            )));
        }

        Ok(RawGeneration {
            content: content.to_string(),
        })
    }

    /// One generation call that never fails: errors become `Generation::Fallback`.
    pub async fn generate(&self, text: &str) -> Generation {
        match self.try_generate(text).await {
            Ok(raw) => Generation::Produced(raw),
            Err(e) => {
                warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Explanation generation failed, using fallback"
                );
                Generation::Fallback
            }
        }
    }
}
