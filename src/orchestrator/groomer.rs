//! The grooming orchestrator: drives one merge request through the backend
//! session lifecycle (create → prompt → cleanup) with staged progress,
//! cooperative cancellation, and a cleanup guarantee on every exit path.

use crate::context::{LogEntry, MergeRequest};
use crate::errors::GroomError;
use crate::format::format_sources;
use crate::gateway::SessionGateway;
use crate::parse::parse_groomed_response;
use crate::prompt::{DEFAULT_INSTRUCTIONS, build_prompt};
use crate::tokens::tokens_saved;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::progress::{GroomProgress, GroomStage, emit};
use super::state::{GroomState, OperationSlot};

/// Construction-time configuration for a [`Groomer`].
#[derive(Debug, Clone)]
pub struct GroomerConfig {
    /// Grooming instruction template sent ahead of the source block.
    pub instructions: String,
    /// Agent identity used when a request does not name one.
    pub default_agent: String,
    /// Ceiling on how long one send-prompt call may run.
    pub prompt_timeout: Duration,
}

impl Default for GroomerConfig {
    fn default() -> Self {
        Self {
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            default_agent: "claude".to_string(),
            prompt_timeout: Duration::from_secs(600),
        }
    }
}

/// Outcome of one grooming operation. The orchestrator never panics or
/// returns an error past this type: callers branch on `success`.
#[derive(Debug, Clone)]
pub struct GroomResult {
    pub success: bool,
    /// Groomed entries; empty whenever `success` is false.
    pub groomed_logs: Vec<LogEntry>,
    pub error: Option<String>,
    /// Estimated context-size reduction in tokens. May be negative.
    pub tokens_saved: i64,
}

impl GroomResult {
    fn failure(error: String, tokens_saved: i64) -> Self {
        Self {
            success: false,
            groomed_logs: Vec::new(),
            error: Some(error),
            tokens_saved,
        }
    }
}

/// Long-lived orchestrator owning the single active grooming operation.
pub struct Groomer {
    gateway: Arc<dyn SessionGateway>,
    config: GroomerConfig,
    slot: OperationSlot,
}

impl Groomer {
    pub fn new(gateway: Arc<dyn SessionGateway>) -> Self {
        Self::with_config(gateway, GroomerConfig::default())
    }

    pub fn with_config(gateway: Arc<dyn SessionGateway>, config: GroomerConfig) -> Self {
        Self {
            gateway,
            config,
            slot: OperationSlot::new(),
        }
    }

    /// Whether a grooming operation is currently in flight.
    pub fn is_grooming_active(&self) -> bool {
        self.slot.is_active()
    }

    /// Current lifecycle state, for display purposes.
    pub fn state(&self) -> GroomState {
        self.slot.state()
    }

    /// Groom the request's sources into a condensed context.
    ///
    /// Single-flight: if an operation is already active the call returns a
    /// failed result immediately, without touching the gateway or the
    /// progress sink. Otherwise the sink sees exactly
    /// collecting → grooming → creating → complete, ending at 100% whether
    /// the operation succeeded or not, and any backend session created is
    /// destroyed before the final callback.
    pub async fn groom_contexts(
        &self,
        request: &MergeRequest,
        on_progress: impl Fn(GroomProgress),
    ) -> GroomResult {
        let Some(guard) = self.slot.try_acquire() else {
            debug!("rejecting merge request: operation already active");
            return GroomResult::failure(GroomError::AlreadyActive.to_string(), 0);
        };
        // Tags every slot access below; once a cancellation hands the slot to
        // a successor, this operation's writes become no-ops.
        let generation = guard.generation();

        self.slot.set_state(generation, GroomState::Collecting);
        emit(&on_progress, GroomProgress::at(GroomStage::Collecting));
        let sources_block = format_sources(&request.sources);

        self.slot.set_state(generation, GroomState::Grooming);
        emit(&on_progress, GroomProgress::at(GroomStage::Grooming));

        let agent = if request.target_agent.is_empty() {
            self.config.default_agent.as_str()
        } else {
            request.target_agent.as_str()
        };

        let mut session_id: Option<String> = None;
        let mut error: Option<GroomError> = None;
        let mut groomed: Vec<LogEntry> = Vec::new();

        match self
            .gateway
            .create_session(&request.target_project_root, agent)
            .await
        {
            Ok(id) => {
                // Recorded before any further await so a concurrent
                // cancellation can reach it.
                self.slot.record_session(generation, &id);
                session_id = Some(id);
            }
            Err(e) => {
                error = Some(GroomError::SessionCreateFailed {
                    agent: agent.to_string(),
                    source: e,
                });
            }
        }

        if let Some(id) = &session_id {
            let prompt = build_prompt(
                &self.config.instructions,
                request.grooming_prompt.as_deref(),
                &sources_block,
            );
            debug!(prompt_chars = prompt.len(), "sending grooming prompt");

            match timeout(self.config.prompt_timeout, self.gateway.send_prompt(id, &prompt)).await {
                Ok(Ok(response)) => {
                    groomed = parse_groomed_response(&response);
                    debug!(entries = groomed.len(), "parsed groomed response");
                }
                Ok(Err(e)) => error = Some(GroomError::PromptFailed(e)),
                Err(_) => {
                    error = Some(GroomError::PromptTimeout {
                        seconds: self.config.prompt_timeout.as_secs(),
                    });
                }
            }
        }

        self.slot.set_state(generation, GroomState::Creating);
        emit(&on_progress, GroomProgress::at(GroomStage::Creating));

        // Teardown happens exactly once per created session, on every path.
        // A cleanup failure is a log-level concern only.
        if let Some(id) = &session_id {
            if let Err(e) = self.gateway.cleanup_session(id).await {
                warn!(session_id = %id, error = %format!("{e:#}"), "session cleanup failed");
            }
        }

        let tokens_saved = tokens_saved(&request.sources, &groomed);

        // Clear transient state even if a cancellation raced us; the guard
        // releases the slot when it drops, after teardown. Ownership-checked,
        // so a successor's session and state are left untouched.
        let _ = self.slot.take_session(generation);

        let result = match error {
            None => {
                self.slot.set_state(generation, GroomState::Complete);
                info!(
                    entries = groomed.len(),
                    tokens_saved, "grooming operation complete"
                );
                GroomResult {
                    success: true,
                    groomed_logs: groomed,
                    error: None,
                    tokens_saved,
                }
            }
            Some(err) => {
                self.slot.set_state(generation, GroomState::Failed);
                warn!(error = %err, "grooming operation failed");
                GroomResult::failure(err.to_string(), tokens_saved)
            }
        };

        // The stage name communicates "pipeline finished"; the result's
        // success flag communicates the outcome.
        emit(&on_progress, GroomProgress::at(GroomStage::Complete));
        result
    }

    /// Cooperatively cancel the active operation, if any.
    ///
    /// Tears down the recorded backend session (best effort, errors
    /// swallowed) and clears the active state. Does not abort an in-flight
    /// prompt: the original `groom_contexts` call runs to completion and its
    /// own redundant cleanup must be tolerated by the gateway.
    pub async fn cancel_grooming(&self) {
        let generation = self.slot.current_generation();
        if generation == 0 {
            return;
        }

        if let Some(id) = self.slot.take_session(generation) {
            info!(session_id = %id, "cancelling grooming operation");
            if let Err(e) = self.gateway.cleanup_session(&id).await {
                warn!(session_id = %id, error = %format!("{e:#}"), "cleanup during cancellation failed");
            }
        }

        // Both writes are no-ops if the operation settled while the cleanup
        // above was in flight and the slot moved on.
        self.slot.set_state(generation, GroomState::Cancelled);
        self.slot.release(generation);
    }
}
