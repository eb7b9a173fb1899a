#[cfg(test)]
use crate::core::catalog::{ChatBackend, ModelCatalog, ProviderId, Selection};
#[cfg(test)]
use crate::core::conversation::HistoryLimit;
#[cfg(test)]
use crate::core::error::BackendError;
#[cfg(test)]
use crate::core::message::Turn;
#[cfg(test)]
use crate::core::session::{Session, SessionOptions};
#[cfg(test)]
use crate::utils::logging::AuditLogger;
#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::time::Duration;
#[cfg(test)]
use tempfile::TempDir;

/// Backend stub that answers from a queue and records what it was sent.
///
/// An empty queue answers with a failure so a forgotten script shows up as a
/// failed turn rather than a hang.
#[cfg(test)]
pub struct ScriptedBackend {
    model_id: String,
    system_prompt: Option<String>,
    delay: Option<Duration>,
    script: Mutex<VecDeque<Result<String, BackendError>>>,
    received: Mutex<Vec<Vec<Turn>>>,
}

#[cfg(test)]
impl ScriptedBackend {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            system_prompt: None,
            delay: None,
            script: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(model_id: &str) -> Arc<dyn ChatBackend> {
        Arc::new(Self::new(model_id))
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = Some(prompt.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, err: BackendError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// Every turn list passed to `invoke`, in call order.
    pub fn received(&self) -> Vec<Vec<Turn>> {
        self.received.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    async fn invoke(&self, turns: &[Turn]) -> Result<String, BackendError> {
        self.received.lock().unwrap().push(turns.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::new("no scripted reply")))
    }
}

/// A session wired to stub backends and a temporary log directory.
#[cfg(test)]
pub struct TestSession {
    pub session: Session,
    pub gpt4: Arc<ScriptedBackend>,
    pub gpt4o_mini: Arc<ScriptedBackend>,
    pub logs: TempDir,
}

/// Catalog: openai/{gpt-4, gpt-4o-mini}, google/gemini-1.5-pro. Starts on
/// openai/gpt-4 with a history limit of 10.
#[cfg(test)]
pub fn create_test_session() -> TestSession {
    let gpt4 = Arc::new(ScriptedBackend::new("gpt-4"));
    let gpt4o_mini = Arc::new(ScriptedBackend::new("gpt-4o-mini"));
    let catalog = ModelCatalog::builder()
        .register(ProviderId::OpenAi, "gpt-4", gpt4.clone())
        .register(ProviderId::OpenAi, "gpt-4o-mini", gpt4o_mini.clone())
        .register(
            ProviderId::Google,
            "gemini-1.5-pro",
            ScriptedBackend::shared("gemini-1.5-pro"),
        )
        .build();

    let logs = TempDir::new().unwrap();
    let audit = AuditLogger::provision(logs.path().join("logs")).unwrap();
    let session = Session::new(
        Arc::new(catalog),
        Selection::new(ProviderId::OpenAi, "gpt-4"),
        audit,
        SessionOptions {
            history_limit: HistoryLimit::default(),
            ..SessionOptions::default()
        },
    )
    .unwrap();

    TestSession {
        session,
        gpt4,
        gpt4o_mini,
        logs,
    }
}
