//! Backend session gateway: the seam between the orchestrator and the text
//! generation backend.
//!
//! The orchestrator consumes exactly three operations through this trait.
//! Real implementation: [`cli::CliSessionGateway`], which drives a local agent
//! CLI binary. Tests substitute their own mock.

mod cli;
mod stream;

pub use cli::{CliGatewayConfig, CliSessionGateway};
pub use stream::{AssistantMessage, ContentBlock, ResponseAccumulator, StreamEvent};

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// A stateful handle on the external generation backend, created per grooming
/// operation and destroyed when done.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Create a backend session rooted at `project_root` for `agent`.
    /// Fails if the agent or root is invalid or the backend is unreachable.
    async fn create_session(&self, project_root: &Path, agent: &str) -> Result<String>;

    /// Send a prompt and await the raw text response. May take arbitrarily
    /// long; the orchestrator applies its own timeout ceiling.
    async fn send_prompt(&self, session_id: &str, prompt: &str) -> Result<String>;

    /// Destroy a session. Must be safe to call on an unknown or
    /// already-cleaned id.
    async fn cleanup_session(&self, session_id: &str) -> Result<()>;
}
