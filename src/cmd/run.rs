//! `groom run` — drive one grooming operation against the CLI gateway.

use anyhow::{Context, Result};
use groom::context::MergeRequest;
use groom::gateway::{CliGatewayConfig, CliSessionGateway};
use groom::orchestrator::{Groomer, GroomerConfig};
use groom::ui::GroomingUI;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct RunArgs<'a> {
    pub request_file: &'a Path,
    /// Override the agent binary (the agent identity is the default).
    pub agent_cmd: Option<String>,
    /// Extra flags for the agent binary; overrides the per-agent defaults.
    pub agent_flags: Option<Vec<String>>,
    pub timeout_secs: u64,
    /// Write the groomed entries here as markdown instead of stdout.
    pub output: Option<&'a Path>,
}

pub async fn cmd_run(args: RunArgs<'_>) -> Result<()> {
    let raw = std::fs::read_to_string(args.request_file)
        .with_context(|| format!("failed to read request file {}", args.request_file.display()))?;
    let request: MergeRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid merge request in {}", args.request_file.display()))?;

    let gateway = Arc::new(CliSessionGateway::new(CliGatewayConfig {
        command_override: args.agent_cmd,
        flags_override: args.agent_flags,
    }));
    let groomer = Groomer::with_config(
        gateway,
        GroomerConfig {
            prompt_timeout: Duration::from_secs(args.timeout_secs),
            ..Default::default()
        },
    );

    let ui = Arc::new(GroomingUI::new());
    let progress_ui = ui.clone();
    let result = groomer
        .groom_contexts(&request, move |p| progress_ui.observe(p))
        .await;
    ui.finish(&result);

    if !result.success {
        anyhow::bail!(
            "grooming failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    let mut rendered = String::new();
    for entry in &result.groomed_logs {
        rendered.push_str(&entry.text);
        rendered.push_str("\n\n");
    }

    match args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write groomed context to {}", path.display()))?;
            println!("Groomed context written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
