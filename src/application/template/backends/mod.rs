//! Execution units that host the template engine.

mod process;
mod thread;

pub use process::{ProcessLauncher, WORKER_SUBCOMMAND};
pub use thread::ThreadLauncher;
