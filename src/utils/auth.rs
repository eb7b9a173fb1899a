//! Authentication utilities for API requests
//!
//! Each provider family expects its key in a different header.

use crate::core::builtin_providers::BackendMode;

/// Add provider-specific authentication headers to an HTTP request
///
/// - Anthropic: `x-api-key` plus `anthropic-version`
/// - Google: `x-goog-api-key`
/// - OpenAI-compatible: `Authorization: Bearer`
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    mode: BackendMode,
    api_key: &str,
) -> reqwest::RequestBuilder {
    match mode {
        BackendMode::Anthropic => request
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01"),
        BackendMode::Google => request.header("x-goog-api-key", api_key),
        BackendMode::OpenAi => request.header("Authorization", format!("Bearer {api_key}")),
    }
}
