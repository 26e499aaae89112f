// Unit tests for the generation capability's wire format.
//
// Response parsing for the OpenAI-compatible chat completions API and the
// explainer's handling of what comes back, all without network access.

mod common;

use std::sync::Arc;

use common::StubGenerator;
use respectrewrite::error::ModerationError;
use respectrewrite::generation::explainer::{ExplanationGenerator, Generation};
use respectrewrite::generation::groq::ChatCompletionResponse;
use respectrewrite::generation::prompt::GenerationParams;

#[test]
fn parses_first_choice_content() {
    let json = r#"{
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "llama-3.1-8b-instant",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": "  It's rude. This hurts.\n"},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 310, "completion_tokens": 9, "total_tokens": 319}
    }"#;
    let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.into_content().unwrap(), "It's rude. This hurts.");
}

#[test]
fn empty_choices_is_an_error() {
    let resp: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    assert!(resp.into_content().is_err());
}

#[test]
fn missing_choices_field_is_an_error() {
    let resp: ChatCompletionResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
    assert!(resp.into_content().is_err());
}

#[test]
fn null_content_is_an_error() {
    let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
    let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
    assert!(resp.into_content().is_err());
}

#[test]
fn blank_content_is_an_error() {
    let json = r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#;
    let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
    assert!(resp.into_content().is_err());
}

#[tokio::test]
async fn explainer_passes_raw_text_without_enforcing() {
    let generator = ExplanationGenerator::new(
        StubGenerator::replying("hostile tone. That is bad. More."),
        GenerationParams::default(),
    );
    match generator.generate("x").await {
        Generation::Produced(raw) => assert_eq!(raw.content, "hostile tone. That is bad. More."),
        Generation::Fallback => panic!("expected produced text"),
    }
}

#[tokio::test]
async fn explainer_try_generate_surfaces_typed_error() {
    let backend = StubGenerator::failing();
    let generator = ExplanationGenerator::new(backend.clone(), GenerationParams::default());

    let err = generator.try_generate("x").await.unwrap_err();

    assert!(matches!(err, ModerationError::GenerationUnavailable(_)));
    assert!(err.to_string().contains("429"));
    assert_eq!(backend.calls(), 1);
}

#[test]
fn explainer_request_uses_configured_model() {
    let generator = ExplanationGenerator::new(
        Arc::new(StubGenerator {
            reply: None,
            calls: Default::default(),
        }),
        GenerationParams::with_model("llama-3.3-70b-versatile"),
    );
    let req = generator.request_for("you don't belong here");
    assert_eq!(req.params.model, "llama-3.3-70b-versatile");
    assert_eq!(req.params.max_tokens, 80);
    assert!(req.messages[1].content.contains("'you don't belong here'"));
}
