//! Data model for context sources and merge requests.
//!
//! A context source is one prior agent conversation (its logs plus metadata)
//! that the orchestrator folds into a condensed context. Sources are built by
//! the caller and are read-only here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Who produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    User,
    /// The wire format calls this `ai`.
    #[serde(rename = "ai", alias = "agent")]
    Agent,
    Other,
}

impl fmt::Display for LogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOrigin::User => write!(f, "user"),
            LogOrigin::Agent => write!(f, "ai"),
            LogOrigin::Other => write!(f, "other"),
        }
    }
}

/// One line of a conversation log. Text may be arbitrarily long; no size cap
/// is enforced at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub origin: LogOrigin,
    pub text: String,
}

impl LogEntry {
    /// Create an agent-originated entry with a fresh id, stamped now.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            origin: LogOrigin::Agent,
            text: text.into(),
        }
    }
}

/// Recorded usage statistics for a source's backing session, when known.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_tokens: u64,
    #[serde(default)]
    pub cost_usd: f64,
}

impl SessionUsage {
    /// Total tokens that counted against the source's context window.
    pub fn context_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Where a context source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Tab,
    Conversation,
}

/// One conversation's logs plus metadata, immutable once handed to the
/// orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSource {
    pub kind: SourceKind,
    pub session_id: String,
    pub project_root: PathBuf,
    pub display_name: String,
    pub logs: Vec<LogEntry>,
    /// Identity of the agent that produced this conversation.
    pub agent: String,
    #[serde(default)]
    pub usage: Option<SessionUsage>,
}

/// The orchestrator's sole input: which sources to groom and where the result
/// is headed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// May be empty; grooming nothing is degenerate but valid.
    pub sources: Vec<ContextSource>,
    pub target_agent: String,
    pub target_project_root: PathBuf,
    /// Custom instruction overriding the default grooming template.
    #[serde(default)]
    pub grooming_prompt: Option<String>,
}
