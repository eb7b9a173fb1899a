//! Built-in provider configuration
//!
//! This module loads the providers and models compiled into the binary
//! from `builtin_models.toml`.

use serde::{Deserialize, Serialize};

use crate::core::catalog::ProviderId;

/// Wire protocol spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// OpenAI-style `chat/completions`, also used by DeepSeek.
    #[default]
    OpenAi,
    Anthropic,
    Google,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinModel {
    pub name: String,
    pub api_model: Option<String>,
}

impl BuiltinModel {
    /// The identifier sent to the vendor API.
    pub fn api_model(&self) -> &str {
        self.api_model.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinProvider {
    pub id: ProviderId,
    pub display_name: String,
    pub base_url: String,
    pub api_key_env: String,
    #[serde(default)]
    pub mode: BackendMode,
    pub models: Vec<BuiltinModel>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuiltinProvidersConfig {
    providers: Vec<BuiltinProvider>,
}

/// Load built-in providers from the embedded configuration
pub fn load_builtin_providers() -> Result<Vec<BuiltinProvider>, toml::de::Error> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

    let config: BuiltinProvidersConfig = toml::from_str(CONFIG_CONTENT)?;
    Ok(config.providers)
}

/// Find a built-in provider by ID
pub fn find_builtin_provider(id: ProviderId) -> Option<BuiltinProvider> {
    load_builtin_providers()
        .ok()?
        .into_iter()
        .find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_providers() {
        let providers = load_builtin_providers().expect("embedded catalog parses");
        let provider_ids: Vec<ProviderId> = providers.iter().map(|p| p.id).collect();
        assert_eq!(
            provider_ids,
            vec![
                ProviderId::OpenAi,
                ProviderId::Google,
                ProviderId::Anthropic,
                ProviderId::DeepSeek
            ]
        );
    }

    #[test]
    fn test_openai_models_in_listing_order() {
        let openai = find_builtin_provider(ProviderId::OpenAi).unwrap();
        let names: Vec<&str> = openai.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-4", "gpt-3.5-turbo"]
        );
        assert_eq!(openai.mode, BackendMode::OpenAi);
    }

    #[test]
    fn test_api_model_aliases() {
        let anthropic = find_builtin_provider(ProviderId::Anthropic).unwrap();
        assert_eq!(anthropic.mode, BackendMode::Anthropic);
        let sonnet = anthropic
            .models
            .iter()
            .find(|m| m.name == "claude-3.5-sonnet")
            .unwrap();
        assert_eq!(sonnet.api_model(), "claude-3-5-sonnet-20241022");

        let deepseek = find_builtin_provider(ProviderId::DeepSeek).unwrap();
        assert_eq!(deepseek.models.len(), 1);
        assert_eq!(deepseek.models[0].api_model(), "deepseek-chat");

        let google = find_builtin_provider(ProviderId::Google).unwrap();
        assert_eq!(google.mode, BackendMode::Google);
        assert_eq!(google.models[0].api_model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_provider_properties() {
        for provider in load_builtin_providers().unwrap() {
            assert!(!provider.display_name.is_empty());
            assert!(provider.base_url.starts_with("https://"));
            assert!(provider.api_key_env.ends_with("_API_KEY"));
            assert!(!provider.models.is_empty());
        }
    }
}
