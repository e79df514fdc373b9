//! Stream-JSON event model for agent CLI backends.
//!
//! Agent CLIs in `--output-format stream-json` mode emit one JSON event per
//! line. The gateway only needs the assistant text and the final result; tool
//! use and system events are recognized so they can be skipped cleanly.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "assistant")]
    Assistant { message: AssistantMessage },

    #[serde(rename = "result")]
    Result {
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        is_error: bool,
    },

    #[serde(rename = "user")]
    User {},

    #[serde(rename = "system")]
    System {
        #[serde(default)]
        subtype: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "tool_use")]
    ToolUse {
        name: String,
        #[serde(default)]
        input: Value,
    },
}

/// Accumulates a backend response line by line.
///
/// Lines that parse as stream events contribute assistant text and the final
/// result; anything else is treated as plain output, so backends that do not
/// speak stream-JSON still produce a usable response.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    text: String,
    final_result: Option<String>,
    is_error: bool,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        match serde_json::from_str::<StreamEvent>(line) {
            Ok(StreamEvent::Assistant { message }) => {
                for block in message.content {
                    if let ContentBlock::Text { text } = block {
                        self.text.push_str(&text);
                        self.text.push('\n');
                    }
                }
            }
            Ok(StreamEvent::Result { result, is_error }) => {
                self.final_result = result;
                self.is_error = is_error;
            }
            Ok(StreamEvent::User {}) | Ok(StreamEvent::System { .. }) => {}
            Err(_) => {
                self.text.push_str(line);
                self.text.push('\n');
            }
        }
    }

    /// Whether the backend reported its final result as an error.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// The response text: the final result event when present, otherwise
    /// everything accumulated.
    pub fn into_response(self) -> String {
        self.final_result.unwrap_or(self.text)
    }
}
