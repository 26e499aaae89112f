// Local ONNX toxicity scorer using Detoxify's unbiased-toxic-roberta model.
//
// Runs entirely on the local CPU: no API key, no network call, so the
// benign majority of traffic never leaves the process.
//
// Model: protectai/unbiased-toxic-roberta-onnx (quantized, ~126MB)
// Output: 7 toxicity categories with continuous 0-1 scores via sigmoid.
// Input window: 512 tokens. Longer messages are truncated by the tokenizer
// and scored on their prefix.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::download::{TOXICITY_MODEL_FILE, TOXICITY_TOKENIZER_FILE};
use super::traits::{ToxicityAttributes, ToxicityResult, ToxicityScorer};

/// RoBERTa's maximum sequence length, special tokens included.
pub const MAX_INPUT_TOKENS: usize = 512;

/// Labels output by unbiased-toxic-roberta, in the order the model returns them.
const LABEL_ORDER: [&str; 7] = [
    "toxicity",
    "severe_toxicity",
    "obscene",
    "identity_attack",
    "insult",
    "threat",
    "sexual_explicit",
];

/// Local ONNX-based toxicity scorer.
pub struct OnnxToxicityScorer {
    // ort::Session::run takes &mut self, and spawn_blocking needs 'static,
    // hence Arc<Mutex<_>>. Concurrent requests serialize on inference only.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxToxicityScorer {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model_quantized.onnx` and `tokenizer.json` to exist in `model_dir`.
    /// Call `download::download_model()` first if they don't.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(TOXICITY_MODEL_FILE);
        let tokenizer_path = model_dir.join(TOXICITY_TOKENIZER_FILE);

        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                anyhow::bail!(
                    "Model file not found: {}\nRun `respectrewrite download-model` to download it.",
                    path.display()
                );
            }
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_INPUT_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        debug!("Loaded ONNX toxicity model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl ToxicityScorer for OnnxToxicityScorer {
    /// Tokenize, run one forward pass, apply sigmoid to the logits.
    /// The CPU-bound work runs on a blocking thread.
    async fn score_text(&self, text: &str) -> Result<ToxicityResult> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let shape = [1_i64, input_ids.len() as i64];

            let input_ids_tensor = Tensor::from_array((shape, input_ids))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask))
                .context("Failed to create attention_mask tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape: [1, 7], raw logits
                let (_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;
                data.to_vec()
            };

            if logits.len() < LABEL_ORDER.len() {
                anyhow::bail!(
                    "Model returned {} logits, expected {}",
                    logits.len(),
                    LABEL_ORDER.len()
                );
            }

            let scores: Vec<f64> = logits[..LABEL_ORDER.len()]
                .iter()
                .map(|&logit| sigmoid(logit as f64))
                .collect();
            let result = map_scores_to_result(&scores);

            debug!(
                toxicity = result.toxicity,
                insult = ?result.attributes.insult,
                identity_attack = ?result.attributes.identity_attack,
                tokens = encoding.get_ids().len(),
                "ONNX scored text"
            );

            Ok(result)
        })
        .await
        .context("spawn_blocking panicked")?
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}

/// Sigmoid activation: maps any real number to (0, 1).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Map the model's outputs onto ToxicityResult. `obscene` becomes
/// `profanity`; `sexual_explicit` has no field and is dropped.
fn map_scores_to_result(scores: &[f64]) -> ToxicityResult {
    ToxicityResult {
        toxicity: scores[0],
        attributes: ToxicityAttributes {
            severe_toxicity: Some(scores[1]),
            identity_attack: Some(scores[3]),
            insult: Some(scores[4]),
            profanity: Some(scores[2]),
            threat: Some(scores[5]),
        },
    }
}
