//! Parses the backend's raw grooming response into groomed log entries.

use crate::context::LogEntry;

/// Split a raw backend response into groomed log entries.
///
/// Sections are cut at top-level markdown headers (`# ` or `## `); each
/// section, header included, becomes one entry. Preamble text before the
/// first header is kept as its own entry so nothing is dropped. A response
/// with no recognizable headers becomes a single entry. An empty or
/// whitespace-only response yields an empty vec, not an error.
pub fn parse_groomed_response(response: &str) -> Vec<LogEntry> {
    if response.trim().is_empty() {
        return Vec::new();
    }

    let mut sections: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in response.lines() {
        if is_section_header(line) && !current.trim().is_empty() {
            sections.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        sections.push(current);
    }

    sections
        .into_iter()
        .map(|text| LogEntry::agent(text.trim_end().to_string()))
        .collect()
}

fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    (1..=2).contains(&hashes) && trimmed[hashes..].starts_with(' ')
}
