// Error taxonomy for the moderation pipeline.
//
// Capability implementations (scorers, generators) return anyhow::Result.
// The component that owns a capability converts its failures into one of
// these variants, so the pipeline can tell a hard failure (classifier down)
// apart from a soft one (generation down, recovered with a fallback).

/// Result alias used by the pipeline-facing components.
pub type Result<T> = std::result::Result<T, ModerationError>;

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    /// The toxicity scorer failed to produce a score. Fatal to the request.
    #[error("toxicity classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The generation capability failed or returned unusable content.
    /// Recovered inside the pipeline with the fallback explanation.
    #[error("generation capability unavailable: {0}")]
    GenerationUnavailable(String),

    /// A required secret is absent from the environment. Fatal at startup.
    #[error("{0} not set. Add it to your .env file.")]
    MissingCredential(&'static str),

    /// The inbound payload was rejected before scoring (e.g. empty text).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ModerationError {
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::ClassifierUnavailable(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationUnavailable(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
