//! CLI command implementations.
//!
//! | Module  | Commands handled |
//! |---------|------------------|
//! | `run`   | `Run`            |
//! | `check` | `Check`          |

pub mod check;
pub mod run;

pub use check::cmd_check;
pub use run::cmd_run;
