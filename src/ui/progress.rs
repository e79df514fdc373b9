//! Terminal rendering of grooming progress, via `indicatif`.

use crate::orchestrator::{GroomProgress, GroomResult, GroomStage};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// A single progress bar driven by the orchestrator's progress sink.
pub struct GroomingUI {
    bar: ProgressBar,
}

impl GroomingUI {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .expect("progress bar template is a valid static string")
                .progress_chars("█▓▒░"),
        );
        bar.set_prefix("Groom");
        Self { bar }
    }

    /// Feed one progress callback value into the bar.
    pub fn observe(&self, progress: GroomProgress) {
        self.bar.set_position(progress.percent as u64);
        let label = match progress.stage {
            GroomStage::Collecting => "collecting sources",
            GroomStage::Grooming => "grooming context",
            GroomStage::Creating => "assembling result",
            GroomStage::Complete => "done",
        };
        self.bar.set_message(label.to_string());
    }

    /// Finish the bar and print the outcome line.
    pub fn finish(&self, result: &GroomResult) {
        self.bar.finish_and_clear();
        if result.success {
            println!(
                "{} groomed into {} entries ({} tokens saved)",
                style("✓").green().bold(),
                result.groomed_logs.len(),
                result.tokens_saved
            );
        } else {
            println!(
                "{} grooming failed: {}",
                style("✗").red().bold(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

impl Default for GroomingUI {
    fn default() -> Self {
        Self::new()
    }
}
