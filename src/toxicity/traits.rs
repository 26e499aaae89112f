// Toxicity scorer trait: the classifier capability behind the gate.
//
// Implementations are long-lived, shared across concurrent requests, and
// never mutated after construction. Failures come back as errors; the gate
// decides what they mean for the request.

use anyhow::Result;
use async_trait::async_trait;

/// The result of scoring a single piece of text for toxicity.
#[derive(Debug, Clone)]
pub struct ToxicityResult {
    /// Overall toxicity score from 0.0 (benign) to 1.0 (very toxic)
    pub toxicity: f64,
    /// Breakdown of specific attributes (if the provider supports them)
    pub attributes: ToxicityAttributes,
}

impl ToxicityResult {
    /// A result carrying only the overall score.
    pub fn from_toxicity(toxicity: f64) -> Self {
        Self {
            toxicity,
            attributes: ToxicityAttributes::default(),
        }
    }
}

/// Detailed toxicity attribute scores (all 0.0 to 1.0).
/// Not all providers will populate every field.
#[derive(Debug, Clone, Default)]
pub struct ToxicityAttributes {
    pub severe_toxicity: Option<f64>,
    pub identity_attack: Option<f64>,
    pub insult: Option<f64>,
    pub profanity: Option<f64>,
    pub threat: Option<f64>,
}

impl ToxicityAttributes {
    /// Populated attributes as (label, score) pairs, for display.
    pub fn present(&self) -> Vec<(&'static str, f64)> {
        [
            ("severe_toxicity", self.severe_toxicity),
            ("identity_attack", self.identity_attack),
            ("insult", self.insult),
            ("profanity", self.profanity),
            ("threat", self.threat),
        ]
        .into_iter()
        .filter_map(|(label, score)| score.map(|s| (label, s)))
        .collect()
    }
}

/// Trait for scoring text toxicity. Async because the hosted backend
/// needs HTTP and the local one offloads inference to a blocking thread.
#[async_trait]
pub trait ToxicityScorer: Send + Sync {
    /// Score a single text for toxicity.
    async fn score_text(&self, text: &str) -> Result<ToxicityResult>;

    /// Short backend name for logs and the CLI.
    fn name(&self) -> &'static str;
}
