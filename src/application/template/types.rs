use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template used when the caller does not supply one: the raw markdown text.
pub const DEFAULT_TEMPLATE: &str = "{{{files.0.content.text}}}";

/// How long a render unit may take before it is torn down.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(10);

pub const TIMEOUT_MESSAGE: &str = "Template generation timeout.";

/// Template source plus optional script helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub value: String,
    pub helpers: String,
}

impl TemplateSpec {
    pub fn new(value: impl Into<String>, helpers: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            helpers: helpers.into(),
        }
    }
}

impl Default for TemplateSpec {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderFailureKind {
    /// No reply arrived before the deadline.
    Timeout,
    /// The template engine reported an error.
    TemplateError,
    /// The caller cancelled the render.
    Cancelled,
    /// The unit could not be started, died, or sent an unreadable reply.
    Worker,
}

impl RenderFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::TemplateError => "template_error",
            Self::Cancelled => "cancelled",
            Self::Worker => "worker",
        }
    }
}

/// A render that produced no text. Displays as its plain message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderFailure {
    pub kind: RenderFailureKind,
    pub message: String,
}

impl RenderFailure {
    pub fn new(kind: RenderFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(RenderFailureKind::Timeout, TIMEOUT_MESSAGE)
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::new(RenderFailureKind::TemplateError, message)
    }

    pub fn cancelled() -> Self {
        Self::new(RenderFailureKind::Cancelled, "Template generation cancelled.")
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::new(RenderFailureKind::Worker, message)
    }
}

/// Result of one render session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Success(String),
    Failure(RenderFailure),
}

impl RenderOutcome {
    pub fn into_result(self) -> Result<String, RenderFailure> {
        match self {
            Self::Success(text) => Ok(text),
            Self::Failure(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_renders_raw_text() {
        let spec = TemplateSpec::default();
        assert_eq!(spec.value, "{{{files.0.content.text}}}");
        assert!(spec.helpers.is_empty());
    }

    #[test]
    fn failures_display_their_plain_message() {
        assert_eq!(RenderFailure::timeout().to_string(), "Template generation timeout.");
        assert_eq!(RenderFailure::template("boom").to_string(), "boom");
    }
}
