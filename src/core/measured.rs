//! Timed backend invocation.
//!
//! [`measured_call`] snapshots the request, times the call, and hands back
//! everything needed for a request/response log record. Nothing is shared
//! between calls, so each measurement is self-contained.

use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::api::{api_messages, ChatMessage};
use crate::core::catalog::{ChatBackend, Selection};
use crate::core::error::BackendError;
use crate::core::message::Turn;
use crate::utils::logging::{RasEntry, RasRequest, RasResponse};

#[derive(Debug)]
pub struct MeasuredCall {
    pub request: RasRequest,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub result: Result<String, BackendError>,
}

impl MeasuredCall {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Correlate the request snapshot with its outcome.
    pub fn to_ras_entry(&self, selection: &Selection) -> RasEntry {
        let response = match &self.result {
            Ok(output) => RasResponse::Success {
                timestamp: self.finished_at,
                duration_ms: self.duration_ms,
                output: output.clone(),
            },
            Err(err) => RasResponse::Failure {
                timestamp: self.finished_at,
                error: err.message.clone(),
                trace: err.trace().to_string(),
            },
        };
        RasEntry {
            timestamp: self.finished_at,
            model: selection.clone(),
            request: self.request.clone(),
            response,
        }
    }
}

/// The prompts a backend will see: its system prompt, then the history window.
pub fn request_snapshot(backend: &dyn ChatBackend, turns: &[Turn]) -> RasRequest {
    let mut prompts = Vec::with_capacity(turns.len() + 1);
    if let Some(system) = backend.system_prompt() {
        prompts.push(ChatMessage::new("system", system));
    }
    prompts.extend(api_messages(turns));
    RasRequest {
        timestamp: Utc::now(),
        model: backend.model_id().to_string(),
        prompts,
    }
}

pub async fn measured_call(backend: &dyn ChatBackend, turns: &[Turn]) -> MeasuredCall {
    let request = request_snapshot(backend, turns);
    let started = Instant::now();
    let result = backend.invoke(turns).await;
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    tracing::debug!(
        model = %request.model,
        duration_ms,
        success = result.is_ok(),
        "Backend call finished"
    );

    MeasuredCall {
        request,
        finished_at: Utc::now(),
        duration_ms,
        result,
    }
}
