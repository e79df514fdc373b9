pub mod progress;

pub use progress::GroomingUI;
