// ModerationPipeline: gate -> (safe: done) -> generate -> enforce -> explained.
//
// The composition root of the core. Capabilities are injected at
// construction and shared read-only across concurrent requests; the
// pipeline itself holds no per-request state.
//
// The only hard failure is ClassifierUnavailable from the gate. A failed
// generation still ends in a toxic result carrying the fallback text, which
// is returned as-is (it is not a contract-shaped explanation).

use tracing::{debug, info};

use crate::error::Result;
use crate::format;
use crate::generation::explainer::{ExplanationGenerator, Generation, FALLBACK_EXPLANATION};
use crate::models::{Explanation, ModerationRequest, ModerationResult};
use crate::toxicity::gate::ToxicityGate;

#[derive(Clone)]
pub struct ModerationPipeline {
    gate: ToxicityGate,
    generator: ExplanationGenerator,
}

impl ModerationPipeline {
    pub fn new(gate: ToxicityGate, generator: ExplanationGenerator) -> Self {
        Self { gate, generator }
    }

    pub fn gate(&self) -> &ToxicityGate {
        &self.gate
    }

    pub fn generator(&self) -> &ExplanationGenerator {
        &self.generator
    }

    /// Moderate one message.
    ///
    /// Safe text returns without any generation call. Toxic text always
    /// returns `is_safe: false` with an explanation, even if generation fails.
    pub async fn moderate(&self, request: &ModerationRequest) -> Result<ModerationResult> {
        let text = request.text();

        let verdict = self.gate.verdict(text).await?;
        if !verdict.is_toxic {
            return Ok(ModerationResult::safe());
        }

        info!(score = verdict.score, "Toxic content detected, generating explanation");

        let explanation = match self.generator.generate(text).await {
            Generation::Produced(raw) => {
                let explanation = format::enforce(&raw);
                let check = format::inspect(&explanation.text);
                if !check.is_compliant() {
                    debug!(
                        raw = %raw.content,
                        enforced = %explanation.text,
                        has_connective = check.has_connective,
                        internal_boundaries = check.internal_boundaries,
                        "Explanation still off-contract after enforcement"
                    );
                }
                explanation
            }
            Generation::Fallback => Explanation::new(FALLBACK_EXPLANATION),
        };

        Ok(ModerationResult::toxic(explanation))
    }

    /// Convenience wrapper: validate `text` into a request, then moderate.
    pub async fn moderate_text(&self, text: &str) -> Result<ModerationResult> {
        let request = ModerationRequest::new(text)?;
        self.moderate(&request).await
    }
}
