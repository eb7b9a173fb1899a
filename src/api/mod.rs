//! Request and response payloads for the provider HTTP APIs.

use serde::{Deserialize, Serialize};

use crate::core::message::Turn;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Convert history turns into wire messages, skipping turns with no API role.
pub fn api_messages(turns: &[Turn]) -> Vec<ChatMessage> {
    turns
        .iter()
        .filter_map(|turn| {
            turn.role
                .to_api_role()
                .map(|role| ChatMessage::new(role, turn.content.clone()))
        })
        .collect()
}

// OpenAI-compatible chat completions

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatCompletionChoice>,
}

// Anthropic messages

#[derive(Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Deserialize)]
pub struct MessagesContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<MessagesContentBlock>,
}

// Google generateContent

#[derive(Serialize, Deserialize, Default)]
pub struct GooglePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
pub struct GoogleContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GooglePart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    pub temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GoogleContent>,
    pub generation_config: GoogleGenerationConfig,
}

#[derive(Deserialize)]
pub struct GoogleCandidate {
    #[serde(default)]
    pub content: GoogleContent,
}

#[derive(Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_messages_drop_notice_turns() {
        let turns = vec![
            Turn::user("hello"),
            Turn::system("switched model"),
            Turn::assistant("hi"),
            Turn::error("boom"),
        ];
        assert_eq!(
            api_messages(&turns),
            vec![
                ChatMessage::new("user", "hello"),
                ChatMessage::new("assistant", "hi")
            ]
        );
    }

    #[test]
    fn google_request_uses_camel_case_keys() {
        let request = GenerateContentRequest {
            contents: vec![],
            system_instruction: Some(GoogleContent {
                role: None,
                parts: vec![GooglePart {
                    text: Some("be brief".to_string()),
                }],
            }),
            generation_config: GoogleGenerationConfig { temperature: 0.0 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
        assert!(value["systemInstruction"].get("role").is_none());
    }
}
