//! Sandboxed template rendering.
//!
//! The host serializes `[template, view, helpers]`, hands it to a fresh
//! single-use unit, and turns the unit's `[err, result]` reply into a
//! [`RenderOutcome`]. [`RenderSession`] owns the timeout and cancellation rules.

mod backends;
mod engine;
mod presets;
mod protocol;
mod session;
mod types;
mod worker;

pub use backends::{ProcessLauncher, ThreadLauncher, WORKER_SUBCOMMAND};
pub use presets::BuiltinTemplate;
pub use protocol::{interpret_reply, is_truthy, stringify};
pub use session::{RenderSession, RenderUnit, UnitLauncher};
pub use types::{
    DEFAULT_RENDER_TIMEOUT, DEFAULT_TEMPLATE, RenderFailure, RenderFailureKind, RenderOutcome,
    TIMEOUT_MESSAGE, TemplateSpec,
};
pub use worker::serve_stdio;
