//! Model catalog: the fixed registry of provider/model pairs and their backends.
//!
//! Providers are a closed set ([`ProviderId`]); each one owns an ordered list
//! of named models. The catalog is assembled once through [`CatalogBuilder`]
//! and has no mutating methods afterwards.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::{BackendError, SessionError};
use crate::core::message::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Google,
    Anthropic,
    DeepSeek,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAi,
        ProviderId::Google,
        ProviderId::Anthropic,
        ProviderId::DeepSeek,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Google => "google",
            ProviderId::Anthropic => "anthropic",
            ProviderId::DeepSeek => "deepseek",
        }
    }

    /// Case-insensitive lookup of a provider identifier.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The provider/model pair a session is currently talking to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub provider: ProviderId,
    pub model: String,
}

impl Selection {
    pub fn new(provider: ProviderId, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Uniform calling contract every model backend satisfies.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Vendor-side model identifier sent with each request.
    fn model_id(&self) -> &str;

    /// Instruction prepended to every request, outside the history window.
    fn system_prompt(&self) -> Option<&str> {
        None
    }

    /// Send the conversation and wait for the complete reply.
    async fn invoke(&self, turns: &[Turn]) -> Result<String, BackendError>;
}

#[derive(Clone)]
pub struct CatalogEntry {
    pub provider: ProviderId,
    pub name: String,
    pub backend: Arc<dyn ChatBackend>,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("provider", &self.provider)
            .field("name", &self.name)
            .field("model_id", &self.backend.model_id())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ProviderModels {
    pub provider: ProviderId,
    pub entries: Vec<CatalogEntry>,
}

impl ProviderModels {
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    providers: Vec<ProviderModels>,
}

impl ModelCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Providers and their models in registration order.
    pub fn providers(&self) -> &[ProviderModels] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.iter().all(|group| group.entries.is_empty())
    }

    pub fn lookup(&self, provider: &str, model: &str) -> Result<&CatalogEntry, SessionError> {
        ProviderId::parse(provider)
            .and_then(|id| self.find(id, model))
            .ok_or_else(|| SessionError::UnknownModel {
                provider: provider.to_string(),
                model: model.to_string(),
            })
    }

    pub fn get(&self, selection: &Selection) -> Option<&CatalogEntry> {
        self.find(selection.provider, &selection.model)
    }

    /// Validate a provider/model pair and turn it into a [`Selection`].
    pub fn resolve(&self, provider: &str, model: &str) -> Result<Selection, SessionError> {
        let entry = self.lookup(provider, model)?;
        Ok(Selection::new(entry.provider, entry.name.clone()))
    }

    fn find(&self, provider: ProviderId, model: &str) -> Option<&CatalogEntry> {
        self.providers
            .iter()
            .find(|group| group.provider == provider)
            .and_then(|group| group.entries.iter().find(|entry| entry.name == model))
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    providers: Vec<ProviderModels>,
}

impl CatalogBuilder {
    /// Register a model. A repeated provider/model pair keeps its first backend.
    pub fn register(
        mut self,
        provider: ProviderId,
        name: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        let name = name.into();
        let index = match self
            .providers
            .iter()
            .position(|group| group.provider == provider)
        {
            Some(index) => index,
            None => {
                self.providers.push(ProviderModels {
                    provider,
                    entries: Vec::new(),
                });
                self.providers.len() - 1
            }
        };

        let group = &mut self.providers[index];
        if group.entries.iter().any(|entry| entry.name == name) {
            tracing::warn!(provider = %provider, model = %name, "Ignoring duplicate catalog entry");
            return self;
        }
        group.entries.push(CatalogEntry {
            provider,
            name,
            backend,
        });
        self
    }

    pub fn build(self) -> ModelCatalog {
        ModelCatalog {
            providers: self.providers,
        }
    }
}
