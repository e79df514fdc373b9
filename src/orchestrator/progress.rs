//! Progress reporting for a grooming operation.
//!
//! The caller supplies a synchronous callback; the orchestrator invokes it at
//! each stage transition. For one operation the stages arrive strictly in
//! order collecting → grooming → creating → complete, percent never
//! decreases, and the final callback always carries `Complete` at 100 —
//! whether the operation succeeded or not.

use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::warn;

/// Pipeline stage of the in-flight grooming operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroomStage {
    Collecting,
    Grooming,
    Creating,
    Complete,
}

impl GroomStage {
    /// Default percent for this stage. Strictly increasing so a callback
    /// stream is monotonic without any bookkeeping.
    pub fn percent(self) -> u8 {
        match self {
            GroomStage::Collecting => 5,
            GroomStage::Grooming => 25,
            GroomStage::Creating => 80,
            GroomStage::Complete => 100,
        }
    }
}

/// One progress callback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroomProgress {
    pub stage: GroomStage,
    pub percent: u8,
}

impl GroomProgress {
    pub fn at(stage: GroomStage) -> Self {
        Self {
            stage,
            percent: stage.percent(),
        }
    }
}

/// Invoke the progress sink, isolating a panicking sink from the pipeline.
/// A sink failure must never corrupt cleanup ordering or flip the outcome.
pub(crate) fn emit(sink: &dyn Fn(GroomProgress), progress: GroomProgress) {
    if catch_unwind(AssertUnwindSafe(|| sink(progress))).is_err() {
        warn!(stage = ?progress.stage, "progress sink panicked; continuing");
    }
}
