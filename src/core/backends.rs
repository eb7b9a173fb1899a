//! HTTP chat backends for the built-in providers.
//!
//! One [`HttpBackend`] exists per catalog entry. Requests are non-streaming
//! and carry no timeout of their own; a hung call is left to the transport.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
    api_messages, ChatCompletionResponse, ChatRequest, GenerateContentRequest,
    GenerateContentResponse, GoogleContent, GoogleGenerationConfig, GooglePart, MessagesRequest,
    MessagesResponse,
};
use crate::core::builtin_providers::{load_builtin_providers, BackendMode};
use crate::core::catalog::{ChatBackend, ModelCatalog};
use crate::core::error::BackendError;
use crate::core::message::{Turn, TurnRole};
use crate::utils::auth::add_auth_headers;
use crate::utils::url::{construct_api_url, construct_model_action_url};

const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Settings shared by every backend built from the embedded catalog.
#[derive(Clone, Debug)]
pub struct BackendSettings {
    pub temperature: f32,
    pub system_prompt: Option<String>,
    /// Provider id → base URL replacing the built-in one.
    pub base_urls: HashMap<String, String>,
}

pub struct HttpBackend {
    client: Client,
    mode: BackendMode,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    temperature: f32,
    system_prompt: Option<String>,
}

impl HttpBackend {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Client,
        mode: BackendMode,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        temperature: f32,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            client,
            mode,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            api_key_env: api_key_env.into(),
            temperature,
            system_prompt,
        }
    }

    fn api_key(&self) -> Result<&str, BackendError> {
        self.api_key.as_deref().ok_or_else(|| {
            BackendError::new(format!(
                "{} is not set; export it to use {}",
                self.api_key_env, self.model
            ))
        })
    }

    fn openai_request(&self, turns: &[Turn]) -> ChatRequest {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(system) = &self.system_prompt {
            messages.push(crate::api::ChatMessage::new("system", system.clone()));
        }
        messages.extend(api_messages(turns));
        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            stream: false,
        }
    }

    fn anthropic_request(&self, turns: &[Turn]) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: ANTHROPIC_MAX_TOKENS,
            system: self.system_prompt.clone(),
            messages: api_messages(from_first_user_turn(turns)),
            temperature: self.temperature,
        }
    }

    fn google_request(&self, turns: &[Turn]) -> GenerateContentRequest {
        let contents = from_first_user_turn(turns)
            .iter()
            .filter(|turn| turn.role.is_conversational())
            .map(|turn| GoogleContent {
                role: Some(
                    if turn.role == TurnRole::Assistant {
                        "model"
                    } else {
                        "user"
                    }
                    .to_string(),
                ),
                parts: vec![GooglePart {
                    text: Some(turn.content.clone()),
                }],
            })
            .collect();
        GenerateContentRequest {
            contents,
            system_instruction: self.system_prompt.as_ref().map(|system| GoogleContent {
                role: None,
                parts: vec![GooglePart {
                    text: Some(system.clone()),
                }],
            }),
            generation_config: GoogleGenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<R, BackendError> {
        let api_key = self.api_key()?;
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        let request = add_auth_headers(request, self.mode, api_key);

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::from_source("Request failed", &err))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(api_error(status.as_u16(), &error_text));
        }

        response
            .json::<R>()
            .await
            .map_err(|err| BackendError::from_source("Malformed response", &err))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    async fn invoke(&self, turns: &[Turn]) -> Result<String, BackendError> {
        tracing::debug!(model = %self.model, turns = turns.len(), "Invoking backend");
        match self.mode {
            BackendMode::OpenAi => {
                let url = construct_api_url(&self.base_url, "chat/completions");
                let response: ChatCompletionResponse =
                    self.post(url, &self.openai_request(turns)).await?;
                extract_openai_reply(response)
            }
            BackendMode::Anthropic => {
                let url = construct_api_url(&self.base_url, "messages");
                let response: MessagesResponse =
                    self.post(url, &self.anthropic_request(turns)).await?;
                extract_anthropic_reply(response)
            }
            BackendMode::Google => {
                let url =
                    construct_model_action_url(&self.base_url, &self.model, "generateContent");
                let response: GenerateContentResponse =
                    self.post(url, &self.google_request(turns)).await?;
                extract_google_reply(response)
            }
        }
    }
}

/// Anthropic and Google reject a conversation that opens with a model turn.
/// An even history limit can leave one at the front of the window.
fn from_first_user_turn(turns: &[Turn]) -> &[Turn] {
    let start = turns
        .iter()
        .position(|turn| turn.role == TurnRole::User)
        .unwrap_or(turns.len());
    &turns[start..]
}

fn extract_openai_reply(response: ChatCompletionResponse) -> Result<String, BackendError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| BackendError::new("Response contained no message content"))
}

fn extract_anthropic_reply(response: MessagesResponse) -> Result<String, BackendError> {
    let text: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    if text.is_empty() {
        return Err(BackendError::new("Response contained no text blocks"));
    }
    Ok(text.concat())
}

fn extract_google_reply(response: GenerateContentResponse) -> Result<String, BackendError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::new("Response contained no candidates"))?;
    let text: Vec<String> = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.is_empty() {
        return Err(BackendError::new("Response candidate contained no text"));
    }
    Ok(text.concat())
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

fn api_error(status: u16, error_text: &str) -> BackendError {
    let trimmed = error_text.trim();
    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value));

    let message = match summary {
        Some(summary) => format!("API error (HTTP {status}): {summary}"),
        None => format!("API error (HTTP {status})"),
    };
    let body = if trimmed.is_empty() { "<empty>" } else { trimmed };
    BackendError::new(message).with_detail(format!("HTTP {status}\n{body}"))
}

/// Assemble the built-in catalog, one [`HttpBackend`] per embedded model.
pub fn builtin_catalog(
    client: &Client,
    settings: &BackendSettings,
) -> Result<ModelCatalog, toml::de::Error> {
    let mut builder = ModelCatalog::builder();
    for provider in load_builtin_providers()? {
        let base_url = settings
            .base_urls
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(provider.id.as_str()))
            .map(|(_, url)| url.clone())
            .unwrap_or_else(|| provider.base_url.clone());
        let api_key = std::env::var(&provider.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::debug!(provider = %provider.id, env = %provider.api_key_env, "No API key in environment");
        }

        for model in &provider.models {
            let backend = HttpBackend::new(
                client.clone(),
                provider.mode,
                base_url.clone(),
                model.api_model(),
                api_key.clone(),
                provider.api_key_env.clone(),
                settings.temperature,
                settings.system_prompt.clone(),
            );
            builder = builder.register(provider.id, model.name.clone(), Arc::new(backend));
        }
    }
    Ok(builder.build())
}
