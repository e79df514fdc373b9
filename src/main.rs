use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "groom")]
#[command(version, about = "Consolidate agent conversation histories into one condensed context")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a grooming operation for a merge request file
    Run {
        /// Path to the merge request JSON file
        #[arg(long)]
        request: PathBuf,

        /// Agent CLI binary to spawn (defaults to the request's target agent)
        #[arg(long)]
        agent_cmd: Option<String>,

        /// Flag passed to the agent binary; repeatable, replaces the defaults
        #[arg(long = "agent-flag")]
        agent_flags: Option<Vec<String>>,

        /// Ceiling on how long the backend may take for the prompt
        #[arg(long, default_value = "600")]
        timeout_secs: u64,

        /// Write the groomed context to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a merge request file and report its statistics
    Check {
        /// Path to the merge request JSON file
        #[arg(long)]
        request: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "groom=debug" } else { "groom=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Run {
            request,
            agent_cmd,
            agent_flags,
            timeout_secs,
            output,
        } => {
            cmd::cmd_run(cmd::run::RunArgs {
                request_file: request,
                agent_cmd: agent_cmd.clone(),
                agent_flags: agent_flags.clone(),
                timeout_secs: *timeout_secs,
                output: output.as_deref(),
            })
            .await?
        }
        Commands::Check { request } => cmd::cmd_check(request)?,
    }

    Ok(())
}
