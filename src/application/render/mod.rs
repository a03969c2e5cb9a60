//! Markdown conversion pipeline.
//!
//! Converting is kept pure: markdown in, sanitised HTML fragments and heading
//! records out. Loading content and rendering templates happen in the caller.

mod extensions;
mod service;
mod types;

pub use extensions::{ConverterOptions, Preset};
pub use service::{
    Converter, convert, create_converter, extract_headings, parse_sections, sanitize_html,
    unwrap_table_wrappers,
};
pub use types::{ConversionContext, ParseContext, RenderError, SectionBoundary};
