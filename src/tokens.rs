//! Token accounting for the grooming result.
//!
//! Exact token counts are not available for groomed text, so a fixed
//! character-per-token ratio stands in. Source-side counts come from the
//! sources' recorded usage statistics when present.

use crate::context::{ContextSource, LogEntry};

/// Estimated characters per backend token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a text of the given character length.
pub fn estimate_tokens(chars: usize) -> u64 {
    (chars / CHARS_PER_TOKEN) as u64
}

/// Context-size reduction achieved by grooming, in tokens.
///
/// Sum of each source's recorded input+output tokens (sources without usage
/// statistics contribute 0) minus the estimate for the groomed entries.
/// Negative results are reported as-is; callers decide how to display them.
pub fn tokens_saved(sources: &[ContextSource], groomed: &[LogEntry]) -> i64 {
    let source_tokens: u64 = sources
        .iter()
        .filter_map(|s| s.usage.as_ref())
        .map(|u| u.context_tokens())
        .sum();

    let groomed_chars: usize = groomed.iter().map(|e| e.text.len()).sum();

    source_tokens as i64 - estimate_tokens(groomed_chars) as i64
}
