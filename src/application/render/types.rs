use thiserror::Error;

use super::extensions::ConverterOptions;

/// Start of a top-level heading in the markdown source (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBoundary {
    pub level: u8,
    pub line: usize,
    pub column: usize,
}

/// Markdown split at its top-level headings, ready for conversion.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub(crate) options: ConverterOptions,
    pub(crate) text: String,
    pub(crate) boundaries: Vec<SectionBoundary>,
}

impl ParseContext {
    pub fn boundaries(&self) -> &[SectionBoundary] {
        &self.boundaries
    }
}

/// Converter output: one HTML fragment per markdown section, unsanitised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionContext {
    pub html_section_list: Vec<String>,
}

/// Structured errors surfaced by the conversion pipeline.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("markdown conversion failed: {message}")]
    Markdown { message: String },
    #[error("document processing failed: {message}")]
    Document { message: String },
}

impl RenderError {
    pub(crate) fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}
