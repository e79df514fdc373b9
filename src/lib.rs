pub mod context;
pub mod errors;
pub mod format;
pub mod gateway;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod tokens;
pub mod ui;
