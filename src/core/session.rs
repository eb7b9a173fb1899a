//! The interactive session: selection, history window, audit logs, and the
//! message-turn protocol.
//!
//! A [`Session`] is owned by whoever drives the loop and is only ever mutated
//! through `&mut self`, one dispatch at a time.

use std::sync::Arc;

use crate::core::catalog::{ModelCatalog, Selection};
use crate::core::conversation::{Conversation, HistoryLimit};
use crate::core::error::SessionError;
use crate::core::measured::measured_call;
use crate::core::message::Turn;
use crate::utils::logging::{AuditLogger, RasEntry};

pub const DEFAULT_COMMAND_MARKER: char = '/';
pub const DEFAULT_PROMPT_TEXT: &str = "Enter your message";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub history_limit: HistoryLimit,
    pub command_marker: char,
    pub prompt_text: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_limit: HistoryLimit::default(),
            command_marker: DEFAULT_COMMAND_MARKER,
            prompt_text: DEFAULT_PROMPT_TEXT.to_string(),
        }
    }
}

pub struct Session {
    catalog: Arc<ModelCatalog>,
    selection: Selection,
    conversation: Conversation,
    audit: AuditLogger,
    options: SessionOptions,
    output: Vec<String>,
}

impl Session {
    /// Start a session on `selection`, which must exist in the catalog.
    pub fn new(
        catalog: Arc<ModelCatalog>,
        selection: Selection,
        audit: AuditLogger,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let selection = catalog.resolve(selection.provider.as_str(), &selection.model)?;
        Ok(Self {
            catalog,
            selection,
            conversation: Conversation::new(options.history_limit),
            audit,
            options,
            output: Vec::new(),
        })
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn command_marker(&self) -> char {
        self.options.command_marker
    }

    /// Prompt shown before each input line, e.g. `[openai/gpt-4] Enter your message > `.
    pub fn prompt(&self) -> String {
        format!("[{}] {} > ", self.selection, self.options.prompt_text)
    }

    /// Switch provider and model together. On error nothing changes.
    pub fn set_selection(&mut self, provider: &str, model: &str) -> Result<(), SessionError> {
        let selection = self.catalog.resolve(provider, model)?;
        tracing::info!(from = %self.selection, to = %selection, "Switching model");
        self.selection = selection;
        Ok(())
    }

    /// Parse and apply a new history limit, trimming immediately.
    pub fn set_history_limit(&mut self, input: &str) -> Result<HistoryLimit, SessionError> {
        let limit = HistoryLimit::parse(input)?;
        self.conversation.set_history_limit(limit);
        Ok(limit)
    }

    /// Queue a line for the console.
    pub fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    /// Drain everything queued for the console since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Write a `system` notice to the transcript.
    pub fn log_notice(&mut self, content: impl Into<String>) {
        let turn = Turn::system(content);
        self.record_turn(&turn);
    }

    /// Run one message turn against the selected backend.
    ///
    /// On success the reply is appended and returned. On failure the user
    /// turn is rolled back, an `error` transcript record and a failed
    /// request/response record are written, and the backend error is
    /// returned for display.
    pub async fn send_message(&mut self, text: &str) -> Result<String, SessionError> {
        let backend = self
            .catalog
            .get(&self.selection)
            .map(|entry| entry.backend.clone())
            .ok_or_else(|| SessionError::UnknownModel {
                provider: self.selection.provider.to_string(),
                model: self.selection.model.clone(),
            })?;

        let user = self.conversation.append_user_turn(text);
        self.record_turn(&user);

        let context = self.conversation.context();
        let call = measured_call(backend.as_ref(), &context).await;
        let entry = call.to_ras_entry(&self.selection);

        match call.result {
            Ok(reply) => {
                let assistant = self.conversation.append_assistant_turn(reply.clone());
                self.emit(format!("AI Assistant: {reply}"));
                self.record_turn(&assistant);
                self.record_ras(&entry);
                Ok(reply)
            }
            Err(err) => {
                self.conversation.rollback_last_user_turn();
                tracing::warn!(model = %self.selection, error = %err, "Model call failed");
                let notice = Turn::error(err.message.clone());
                self.record_turn(&notice);
                self.record_ras(&entry);
                Err(SessionError::BackendFailure(err))
            }
        }
    }

    fn record_turn(&mut self, turn: &Turn) {
        let model_name = self.selection.to_string();
        if let Err(err) = self.audit.log_turn(turn, &model_name) {
            self.report_log_failure(SessionError::from(err));
        }
    }

    fn record_ras(&mut self, entry: &RasEntry) {
        if let Err(err) = self.audit.log_ras(entry) {
            self.report_log_failure(SessionError::from(err));
        }
    }

    fn report_log_failure(&mut self, err: SessionError) {
        tracing::warn!(error = %err, "Audit log write failed");
        self.emit(format!("❌ {err}"));
    }
}
