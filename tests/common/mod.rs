// Deterministic stand-ins for the classifier and generation capabilities.
//
// Each stub counts its calls so tests can assert that the safe branch never
// reaches the generator.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use respectrewrite::generation::explainer::ExplanationGenerator;
use respectrewrite::generation::prompt::GenerationParams;
use respectrewrite::generation::traits::{CompletionRequest, TextGenerator};
use respectrewrite::pipeline::ModerationPipeline;
use respectrewrite::toxicity::gate::ToxicityGate;
use respectrewrite::toxicity::traits::{ToxicityResult, ToxicityScorer};

/// Scorer returning a fixed score, or failing when `score` is None.
pub struct StubScorer {
    pub score: Option<f64>,
    pub calls: AtomicUsize,
}

impl StubScorer {
    pub fn returning(score: f64) -> Arc<Self> {
        Arc::new(Self {
            score: Some(score),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            score: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToxicityScorer for StubScorer {
    async fn score_text(&self, _text: &str) -> anyhow::Result<ToxicityResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.score {
            Some(s) => Ok(ToxicityResult::from_toxicity(s)),
            None => anyhow::bail!("classifier crashed"),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Generator returning a scripted reply, or failing when `reply` is None.
pub struct StubGenerator {
    pub reply: Option<String>,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, _request: &CompletionRequest) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(r) => Ok(r.clone()),
            None => anyhow::bail!("429 Too Many Requests"),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Pipeline over the given stubs with the default 0.7 threshold.
pub fn pipeline(scorer: Arc<StubScorer>, generator: Arc<StubGenerator>) -> ModerationPipeline {
    ModerationPipeline::new(
        ToxicityGate::with_default_threshold(scorer),
        ExplanationGenerator::new(generator, GenerationParams::default()),
    )
}
