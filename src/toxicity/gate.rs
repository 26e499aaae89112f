// Toxicity gate: score the text locally and decide whether the expensive
// generation stage runs at all.
//
// Most traffic is benign and must resolve here without any outbound call to
// the generation service. A scorer failure is never read as "safe": it comes
// back as ClassifierUnavailable and fails the request.

use std::sync::Arc;

use tracing::info;

use super::traits::{ToxicityResult, ToxicityScorer};
use crate::error::{ModerationError, Result};
use crate::models::{ToxicityVerdict, DEFAULT_THRESHOLD};
use crate::output::truncate_chars;

/// Characters of input included in the score log line.
const PREVIEW_CHARS: usize = 50;

/// Threshold test in front of a shared, read-only toxicity scorer.
#[derive(Clone)]
pub struct ToxicityGate {
    scorer: Arc<dyn ToxicityScorer>,
    threshold: f64,
}

impl ToxicityGate {
    pub fn new(scorer: Arc<dyn ToxicityScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    /// Gate with the default threshold of 0.7.
    pub fn with_default_threshold(scorer: Arc<dyn ToxicityScorer>) -> Self {
        Self::new(scorer, DEFAULT_THRESHOLD)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn backend(&self) -> &'static str {
        self.scorer.name()
    }

    /// Full scorer output, including per-attribute scores.
    ///
    /// A scorer error, or a score that is not a probability (NaN, outside
    /// [0, 1]), becomes `ClassifierUnavailable`.
    pub async fn score_detailed(&self, text: &str) -> Result<ToxicityResult> {
        let result = self
            .scorer
            .score_text(text)
            .await
            .map_err(|e| ModerationError::classifier(format!("{e:#}")))?;

        if !(0.0..=1.0).contains(&result.toxicity) {
            return Err(ModerationError::classifier(format!(
                "{} returned an out-of-range score: {}",
                self.scorer.name(),
                result.toxicity
            )));
        }
        Ok(result)
    }

    /// Toxicity probability in [0, 1].
    pub async fn score(&self, text: &str) -> Result<f64> {
        Ok(self.score_detailed(text).await?.toxicity)
    }

    /// Score the text and apply this gate's threshold.
    pub async fn verdict(&self, text: &str) -> Result<ToxicityVerdict> {
        self.verdict_at(text, self.threshold).await
    }

    /// Score the text and apply an explicit threshold.
    pub async fn verdict_at(&self, text: &str, threshold: f64) -> Result<ToxicityVerdict> {
        let score = self.score(text).await?;
        let verdict = ToxicityVerdict::from_score(score, threshold);

        info!(
            score = verdict.score,
            threshold = verdict.threshold,
            is_toxic = verdict.is_toxic,
            text_preview = %truncate_chars(text, PREVIEW_CHARS),
            "Toxicity scored"
        );

        Ok(verdict)
    }

    /// `score > threshold`, using this gate's threshold.
    pub async fn is_toxic(&self, text: &str) -> Result<bool> {
        Ok(self.verdict(text).await?.is_toxic)
    }
}
