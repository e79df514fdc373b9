//! `groom check` — validate a merge request file and report what a grooming
//! run would consolidate, without touching any backend.

use anyhow::{Context, Result};
use console::style;
use groom::context::MergeRequest;
use groom::format::format_sources;
use groom::tokens::estimate_tokens;
use std::path::Path;

pub fn cmd_check(request_file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(request_file)
        .with_context(|| format!("failed to read request file {}", request_file.display()))?;
    let request: MergeRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid merge request in {}", request_file.display()))?;

    let log_count: usize = request.sources.iter().map(|s| s.logs.len()).sum();
    let recorded_tokens: u64 = request
        .sources
        .iter()
        .filter_map(|s| s.usage.as_ref())
        .map(|u| u.context_tokens())
        .sum();
    let block = format_sources(&request.sources);

    println!("{} merge request is valid", style("✓").green().bold());
    println!("  Sources:         {}", request.sources.len());
    println!("  Log entries:     {}", log_count);
    println!("  Recorded tokens: {}", recorded_tokens);
    println!("  Prompt estimate: ~{} tokens", estimate_tokens(block.len()));
    println!("  Target agent:    {}", request.target_agent);
    println!(
        "  Target project:  {}",
        request.target_project_root.display()
    );

    Ok(())
}
