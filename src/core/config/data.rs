use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// On-disk settings. Every key is optional; `defaults.rs` fills the gaps.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    /// Number of turns kept in the history window.
    pub history_size: Option<usize>,
    /// Single character that introduces a command, `/` unless set.
    pub command_marker: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub prompt_text: Option<String>,
    /// Sent ahead of every request; never part of the history window.
    pub system_prompt: Option<String>,
    pub temperature: Option<f32>,
    /// Provider id → base URL replacing the built-in endpoint.
    #[serde(default)]
    pub base_urls: HashMap<String, String>,
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
