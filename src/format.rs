//! Renders context sources into a single text block for the backend prompt.

use crate::context::ContextSource;

/// Turn a list of context sources into one instruction-ready text block.
///
/// Per source, in input order: display name, originating agent, project root,
/// then the logs as origin-tagged lines. Nothing is truncated; callers that
/// need limits must pre-filter. An empty slice yields an empty string.
pub fn format_sources(sources: &[ContextSource]) -> String {
    let mut block = String::new();

    for source in sources {
        block.push_str(&format!("## Context: {}\n", source.display_name));
        block.push_str(&format!("Agent: {}\n", source.agent));
        block.push_str(&format!("Project: {}\n\n", source.project_root.display()));

        for entry in &source.logs {
            block.push_str(&format!("[{}] {}\n", entry.origin, entry.text));
        }
        block.push('\n');
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LogEntry, LogOrigin, SourceKind};
    use chrono::Utc;
    use std::path::PathBuf;

    fn source(name: &str, logs: Vec<LogEntry>) -> ContextSource {
        ContextSource {
            kind: SourceKind::Tab,
            session_id: "s-1".into(),
            project_root: PathBuf::from("/work/app"),
            display_name: name.into(),
            logs,
            agent: "claude".into(),
            usage: None,
        }
    }

    fn entry(origin: LogOrigin, text: &str) -> LogEntry {
        LogEntry {
            id: "e".into(),
            timestamp: Utc::now(),
            origin,
            text: text.into(),
        }
    }

    #[test]
    fn test_empty_sources_yield_empty_block() {
        assert_eq!(format_sources(&[]), "");
    }

    #[test]
    fn test_block_carries_source_metadata() {
        let block = format_sources(&[source("Auth work", vec![])]);
        assert!(block.contains("## Context: Auth work"));
        assert!(block.contains("Agent: claude"));
        assert!(block.contains("Project: /work/app"));
    }

    #[test]
    fn test_logs_are_origin_tagged_in_order() {
        let block = format_sources(&[source(
            "Session",
            vec![
                entry(LogOrigin::User, "please add login"),
                entry(LogOrigin::Agent, "done, see auth.rs"),
            ],
        )]);
        let user_pos = block.find("[user] please add login").unwrap();
        let agent_pos = block.find("[ai] done, see auth.rs").unwrap();
        assert!(user_pos < agent_pos);
    }

    #[test]
    fn test_sources_keep_input_order() {
        let block = format_sources(&[source("First", vec![]), source("Second", vec![])]);
        assert!(block.find("First").unwrap() < block.find("Second").unwrap());
    }

    #[test]
    fn test_long_text_passes_through_verbatim() {
        let long = "x".repeat(50_000);
        let block = format_sources(&[source("Big", vec![entry(LogOrigin::Agent, &long)])]);
        assert!(block.contains(&long));
    }
}
