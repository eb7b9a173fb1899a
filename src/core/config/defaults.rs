use crate::core::backends::BackendSettings;
use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;
use crate::core::conversation::HistoryLimit;
use crate::core::session::{SessionOptions, DEFAULT_COMMAND_MARKER, DEFAULT_PROMPT_TEXT};
use std::path::{Path, PathBuf};

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant who remembers every message I send.";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

impl Config {
    pub fn provider(&self) -> &str {
        self.default_provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn log_dir(&self) -> &Path {
        self.log_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_LOG_DIR))
    }

    pub fn set_log_dir(&mut self, dir: PathBuf) {
        self.log_dir = Some(dir);
    }

    pub fn history_limit(&self) -> Result<HistoryLimit, ConfigError> {
        match self.history_size {
            None => Ok(HistoryLimit::default()),
            Some(size) => HistoryLimit::new(size).ok_or_else(|| ConfigError::Invalid {
                key: "history_size",
                reason: "must be 1 or greater".to_string(),
            }),
        }
    }

    pub fn command_marker(&self) -> Result<char, ConfigError> {
        let Some(marker) = self.command_marker.as_deref() else {
            return Ok(DEFAULT_COMMAND_MARKER);
        };
        let mut chars = marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() && !c.is_control() => Ok(c),
            _ => Err(ConfigError::Invalid {
                key: "command_marker",
                reason: format!("expected a single visible character, got {:?}", marker),
            }),
        }
    }

    pub fn session_options(&self) -> Result<SessionOptions, ConfigError> {
        Ok(SessionOptions {
            history_limit: self.history_limit()?,
            command_marker: self.command_marker()?,
            prompt_text: self
                .prompt_text
                .clone()
                .unwrap_or_else(|| DEFAULT_PROMPT_TEXT.to_string()),
        })
    }

    /// An empty `system_prompt` disables the system message.
    pub fn backend_settings(&self) -> BackendSettings {
        let system_prompt = match self.system_prompt.as_deref() {
            Some(prompt) if prompt.trim().is_empty() => None,
            Some(prompt) => Some(prompt.to_string()),
            None => Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        };
        BackendSettings {
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            system_prompt,
            base_urls: self.base_urls.clone(),
        }
    }
}
