// Data model for a single moderation call.
//
// Nothing here outlives the request: a ModerationRequest is built from the
// inbound payload, flows through the gate and (maybe) the generator, and the
// ModerationResult is converted to the wire shape and dropped.

use serde::{Deserialize, Serialize};

use crate::error::{ModerationError, Result};

/// Default toxicity threshold. A score must be strictly above it to count as toxic.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// A validated, non-empty message to moderate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRequest {
    text: String,
}

impl ModerationRequest {
    /// Build a request, rejecting empty or whitespace-only text.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ModerationError::invalid("text must not be empty"));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Outcome of the toxicity gate for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityVerdict {
    pub score: f64,
    pub threshold: f64,
    pub is_toxic: bool,
}

impl ToxicityVerdict {
    /// Apply the threshold. Strict inequality: a score equal to the threshold is safe.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        Self {
            score,
            threshold,
            is_toxic: score > threshold,
        }
    }
}

/// Free text returned by the generation capability. May violate the output contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGeneration {
    pub content: String,
}

/// The text returned to callers on a toxic verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub text: String,
}

impl Explanation {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The sole externally visible artifact of a moderation call.
///
/// Construct through [`ModerationResult::safe`] or [`ModerationResult::toxic`]
/// so that `explanation` is present exactly when `is_safe` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationResult {
    pub is_safe: bool,
    pub explanation: Option<Explanation>,
}

impl ModerationResult {
    pub fn safe() -> Self {
        Self {
            is_safe: true,
            explanation: None,
        }
    }

    pub fn toxic(explanation: Explanation) -> Self {
        Self {
            is_safe: false,
            explanation: Some(explanation),
        }
    }
}

// --- Wire types for the inbound operation ---

/// Inbound payload: `{ "text": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub text: String,
}

/// Outbound payload. `rewrite` keeps the name the browser extension already
/// reads, even though it carries the explanation rather than a rewritten message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResponse {
    pub rewrite: Option<String>,
    pub is_safe: bool,
}

impl From<ModerationResult> for RewriteResponse {
    fn from(result: ModerationResult) -> Self {
        Self {
            rewrite: result.explanation.map(|e| e.text),
            is_safe: result.is_safe,
        }
    }
}
