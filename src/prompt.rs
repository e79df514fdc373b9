//! Outbound prompt assembly for the grooming session.

/// Default grooming instructions. The section list is the invariant contract
/// with the parser: groomed output is expected under these headers.
pub const DEFAULT_INSTRUCTIONS: &str = r#"You are consolidating several prior coding conversations into one condensed context for a fresh agent session.

Produce a structured markdown summary with these sections:

## Context Overview
What the conversations were about and how they relate.

## Key Decisions
Decisions made and the reasoning that still matters.

## Code Changes
Files touched and what changed, at the level a new session needs.

## Current State
Where the work stands right now.

## Next Steps
What remains to be done, in priority order.

Be concise. Drop pleasantries, dead ends that taught nothing, and tool noise. Preserve file paths, identifiers, and constraints exactly."#;

/// Build the full outbound prompt: instructions, an optional custom override
/// section, then the formatted source block.
pub fn build_prompt(instructions: &str, custom: Option<&str>, sources_block: &str) -> String {
    let mut prompt = String::with_capacity(
        instructions.len() + custom.map_or(0, str::len) + sources_block.len() + 128,
    );

    prompt.push_str(instructions);
    prompt.push_str("\n\n");

    if let Some(custom) = custom {
        prompt.push_str("## Additional Instructions\n");
        prompt.push_str("These override the defaults above where they conflict.\n\n");
        prompt.push_str(custom);
        prompt.push_str("\n\n");
    }

    prompt.push_str("# CONVERSATIONS TO CONSOLIDATE\n\n");
    prompt.push_str(sources_block);
    prompt
}
