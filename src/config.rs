use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::ModerationError;
use crate::generation::groq::DEFAULT_GROQ_API_URL;
use crate::generation::prompt::DEFAULT_MODEL;
use crate::models::DEFAULT_THRESHOLD;

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded at startup
/// via dotenvy before this is called.
#[derive(Clone)]
pub struct Config {
    /// Credential for the generation capability. Empty when unset;
    /// `require_generation` turns that into a startup error.
    pub groq_api_key: String,
    /// Base URL of the OpenAI-compatible chat completions API.
    pub groq_api_url: String,
    /// Generation model identifier.
    pub generation_model: String,
    /// Per-request timeout handed to the generation HTTP client.
    pub generation_timeout: Duration,
    /// Toxicity threshold in [0, 1]; scores strictly above are toxic.
    pub threshold: f64,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Malformed values fail here. Missing credentials do not; each command
    /// checks the ones it needs with the `require_*` methods.
    pub fn load() -> Result<Self> {
        let threshold = match env::var("RESPECT_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        let timeout_secs = match env::var("RESPECT_GENERATION_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("RESPECT_GENERATION_TIMEOUT_SECS is not a number: {raw}"))?,
            Err(_) => 30,
        };

        let model_dir = env::var("RESPECT_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::toxicity::download::default_model_dir());

        Ok(Self {
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string()),
            generation_model: env::var("RESPECT_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            generation_timeout: Duration::from_secs(timeout_secs),
            threshold,
            model_dir,
        })
    }

    /// Check that the generation credential is configured.
    /// Call this before building the pipeline.
    pub fn require_generation(&self) -> std::result::Result<(), ModerationError> {
        if self.groq_api_key.trim().is_empty() {
            return Err(ModerationError::MissingCredential("GROQ_API_KEY"));
        }
        Ok(())
    }

    /// Check that the local toxicity model is on disk.
    pub fn require_scorer(&self) -> Result<()> {
        if !crate::toxicity::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "ONNX model files not found in {}\n\
                 Run `respectrewrite download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}

/// Parse a threshold value, rejecting anything outside [0, 1].
pub fn parse_threshold(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("RESPECT_THRESHOLD is not a number: {raw}"))?;
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("RESPECT_THRESHOLD must be between 0 and 1, got {value}");
    }
    Ok(value)
}
