// Instruction template and sampling parameters for harm explanations.
//
// The generator is asked for exactly "It's <harm>. This <effect>." and is
// given few-shot examples to anchor the shape. Sampling is kept near-greedy
// and the output is capped at 80 tokens. None of this guarantees the shape;
// format::fix repairs what comes back.

use super::traits::{ChatMessage, CompletionRequest};

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

pub const SYSTEM_INSTRUCTION: &str = "\
You explain why a message is harmful, in a fixed format.

Output EXACTLY this shape and nothing else:
It's [TYPE OF HARM]. This [NEGATIVE EFFECT].

Rules:
1. Exactly 2 phrases, each ending with a period.
2. The first phrase starts with \"It's\".
3. The second phrase starts with \"This\".
4. Each phrase is short: 3 to 7 words.
5. No extra sentences, explanations, quotes or examples.
6. No markdown or formatting, plain text only.
7. If the message is ambiguous, describe its potential harm.

Examples:
Input: \"you are stupid\"
Output: It's insulting intelligence. This makes people feel hated.

Input: \"I hate all people from that country\"
Output: It's prejudiced generalization. This promotes discrimination.

Input: \"You don't belong here\"
Output: It's exclusionary language. This makes people feel unwelcome.

Remember: 2 phrases only. It's [harm]. This [effect].";

/// Sampling settings for the explanation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            top_p: 0.1,
            max_tokens: 80,
        }
    }
}

impl GenerationParams {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

pub fn user_message(text: &str) -> String {
    format!(
        "Analyze this message for potential harm: '{text}'\n\n\
         Output your analysis in exactly 2 phrases following the format."
    )
}

/// System instruction plus the user message embedding `text`.
pub fn build_request(text: &str, params: &GenerationParams) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(user_message(text)),
        ],
        params: params.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_near_greedy_and_short() {
        let params = GenerationParams::default();
        assert_eq!(params.model, "llama-3.1-8b-instant");
        assert!(params.temperature <= 0.2);
        assert!(params.top_p <= 0.2);
        assert_eq!(params.max_tokens, 80);
    }

    #[test]
    fn test_user_message_embeds_text() {
        let msg = user_message("you are stupid");
        assert!(msg.starts_with("Analyze this message for potential harm: 'you are stupid'"));
    }

    #[test]
    fn test_request_is_system_then_user() {
        let req = build_request("go away", &GenerationParams::default());
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");
        assert!(req.messages[1].content.contains("'go away'"));
    }

    #[test]
    fn test_instruction_names_both_clause_tokens() {
        assert!(SYSTEM_INSTRUCTION.contains("starts with \"It's\""));
        assert!(SYSTEM_INSTRUCTION.contains("starts with \"This\""));
        assert!(SYSTEM_INSTRUCTION.contains("3 to 7 words"));
    }
}
