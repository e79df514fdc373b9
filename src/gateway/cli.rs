//! Session gateway backed by a local agent CLI binary.
//!
//! A "session" here is an in-memory record of the agent and project root it
//! was created for; each prompt spawns one process with the prompt on stdin
//! and collects the response from stdout. This mirrors how agent CLIs are
//! driven in print mode: the process is the unit of work, the session is the
//! bookkeeping around it.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use super::SessionGateway;
use super::stream::ResponseAccumulator;

/// Flags that put the claude CLI into non-interactive streaming mode.
const CLAUDE_STREAM_FLAGS: &[&str] = &["--print", "--output-format", "stream-json", "--verbose"];

/// Configuration for [`CliSessionGateway`].
///
/// By default the agent identity doubles as the binary name, and claude gets
/// its streaming flags. Both can be overridden, which is what lets tests use
/// `cat` as a stand-in backend.
#[derive(Debug, Clone, Default)]
pub struct CliGatewayConfig {
    /// Run this binary regardless of the requested agent identity.
    pub command_override: Option<String>,
    /// Use these flags instead of the per-agent defaults.
    pub flags_override: Option<Vec<String>>,
}

impl CliGatewayConfig {
    fn resolve(&self, agent: &str) -> (String, Vec<String>) {
        let command = self
            .command_override
            .clone()
            .unwrap_or_else(|| agent.to_string());

        let flags = match &self.flags_override {
            Some(flags) => flags.clone(),
            None if command == "claude" => {
                CLAUDE_STREAM_FLAGS.iter().map(|s| s.to_string()).collect()
            }
            None => Vec::new(),
        };

        (command, flags)
    }
}

#[derive(Debug, Clone)]
struct CliSession {
    project_root: PathBuf,
    command: String,
    flags: Vec<String>,
}

/// Gateway that spawns a local agent CLI per prompt.
pub struct CliSessionGateway {
    config: CliGatewayConfig,
    sessions: Mutex<HashMap<String, CliSession>>,
}

impl CliSessionGateway {
    pub fn new(config: CliGatewayConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn session(&self, session_id: &str) -> Option<CliSession> {
        self.sessions
            .lock()
            .expect("session table lock poisoned")
            .get(session_id)
            .cloned()
    }
}

#[async_trait]
impl SessionGateway for CliSessionGateway {
    async fn create_session(&self, project_root: &Path, agent: &str) -> Result<String> {
        if !project_root.is_dir() {
            bail!(
                "project root {} does not exist or is not a directory",
                project_root.display()
            );
        }

        let (command, flags) = self.config.resolve(agent);
        let session_id = uuid::Uuid::new_v4().to_string();

        debug!(%session_id, %agent, %command, "created backend session");
        self.sessions
            .lock()
            .expect("session table lock poisoned")
            .insert(
                session_id.clone(),
                CliSession {
                    project_root: project_root.to_path_buf(),
                    command,
                    flags,
                },
            );

        Ok(session_id)
    }

    async fn send_prompt(&self, session_id: &str, prompt: &str) -> Result<String> {
        let Some(session) = self.session(session_id) else {
            bail!("unknown session id {session_id}");
        };

        let mut child = Command::new(&session.command)
            .args(&session.flags)
            .current_dir(&session.project_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn agent backend '{}'", session.command))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await.context("failed to close stdin")?;
        }

        // Drain stderr concurrently so a chatty backend cannot deadlock us.
        let mut stderr = child.stderr.take().context("failed to take stderr")?;
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let stdout = child.stdout.take().context("failed to take stdout")?;
        let mut lines = BufReader::new(stdout).lines();
        let mut acc = ResponseAccumulator::new();
        while let Some(line) = lines.next_line().await? {
            acc.push_line(&line);
        }

        let status = child.wait().await?;
        let stderr_text = stderr_task.await.unwrap_or_default();

        if acc.is_error() {
            bail!("backend reported an error: {}", acc.into_response());
        }
        let response = acc.into_response();
        if !status.success() && response.trim().is_empty() {
            bail!(
                "agent backend '{}' exited with {}: {}",
                session.command,
                status,
                stderr_text.trim()
            );
        }

        Ok(response)
    }

    async fn cleanup_session(&self, session_id: &str) -> Result<()> {
        let removed = self
            .sessions
            .lock()
            .expect("session table lock poisoned")
            .remove(session_id);

        match removed {
            Some(_) => debug!(%session_id, "backend session destroyed"),
            // Tolerated: cancellation and normal completion may both try.
            None => warn!(%session_id, "cleanup for unknown session id"),
        }
        Ok(())
    }
}
