//! Context grooming orchestration: state machine, progress, cancellation.

mod groomer;
mod progress;
mod state;

pub use groomer::{GroomResult, Groomer, GroomerConfig};
pub use progress::{GroomProgress, GroomStage};
pub use state::GroomState;
