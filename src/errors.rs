//! Typed error taxonomy for the grooming orchestrator.
//!
//! None of these escape the orchestrator's public operations: they are
//! captured into `GroomResult::error` as display strings. Gateway internals
//! use `anyhow` with context; this enum names the failure classes the caller
//! can observe.

use thiserror::Error;

/// Failure classes surfaced in a grooming result's error field.
#[derive(Debug, Error)]
pub enum GroomError {
    #[error("a grooming operation is already active")]
    AlreadyActive,

    #[error("failed to create backend session for agent '{agent}': {source}")]
    SessionCreateFailed {
        agent: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("prompt failed: {0}")]
    PromptFailed(#[source] anyhow::Error),

    #[error("prompt timed out after {seconds}s")]
    PromptTimeout { seconds: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_messages_name_the_failure_class() {
        let err = GroomError::SessionCreateFailed {
            agent: "claude".into(),
            source: anyhow!("backend unreachable"),
        };
        let msg = err.to_string();
        assert!(msg.contains("claude"));
        assert!(msg.contains("backend unreachable"));

        assert!(
            GroomError::PromptTimeout { seconds: 600 }
                .to_string()
                .contains("600")
        );
        assert!(
            GroomError::AlreadyActive
                .to_string()
                .contains("already active")
        );
    }

    #[test]
    fn test_variants_implement_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&GroomError::AlreadyActive);
        assert_std_error(&GroomError::PromptFailed(anyhow!("boom")));
    }
}
