mod anchors;
mod config;
mod markup;

use comrak::{Arena, format_html, parse_document};
use once_cell::sync::Lazy;

use crate::application::render::extensions::ConverterOptions;
use crate::application::render::types::{
    ConversionContext, ParseContext, RenderError, SectionBoundary,
};
use crate::domain::headings::HeadingRecord;

use anchors::{collect_anchors, section_boundaries};
use config::{build_sanitizer, comrak_options};

static SANITIZER: Lazy<ammonia::Builder<'static>> = Lazy::new(build_sanitizer);

/// Comrak-backed markdown converter configured for one set of extensions.
#[derive(Debug, Clone)]
pub struct Converter {
    flags: ConverterOptions,
}

pub fn create_converter(options: ConverterOptions) -> Converter {
    Converter { flags: options }
}

/// Locate the top-level headings that split `text` into sections.
pub fn parse_sections(converter: &Converter, text: &str) -> ParseContext {
    let options = comrak_options(&converter.flags);
    let arena = Arena::new();
    let root = parse_document(&arena, text, &options);

    ParseContext {
        options: converter.flags,
        text: text.to_string(),
        boundaries: section_boundaries(root),
    }
}

/// Render the parsed document to HTML, one fragment per section. The whole
/// document is rendered at once so references and footnotes resolve across
/// sections.
pub fn convert(context: &ParseContext) -> Result<ConversionContext, RenderError> {
    let options = comrak_options(&context.options);
    let arena = Arena::new();
    let root = parse_document(&arena, &context.text, &options);
    markup::strip_raw_sourcepos(root)?;
    let anchors = collect_anchors(root);

    let mut html = String::new();
    format_html(root, &options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;

    let decorated = markup::decorate(&html, anchors)?;
    let html_section_list = split_sections(&decorated, &context.boundaries)?;
    Ok(ConversionContext { html_section_list })
}

/// Sanitise one HTML fragment.
pub fn sanitize_html(raw: &str) -> String {
    SANITIZER.clean(raw).to_string()
}

/// Promote the children of converter-inserted table wrappers into their place.
pub fn unwrap_table_wrappers(html: &str) -> Result<String, RenderError> {
    markup::unwrap_table_wrappers(html)
}

/// All heading elements of `html`, in document order.
pub fn extract_headings(html: &str) -> Result<Vec<HeadingRecord>, RenderError> {
    markup::extract_headings(html)
}

fn split_sections(html: &str, boundaries: &[SectionBoundary]) -> Result<Vec<String>, RenderError> {
    let mut sections = Vec::with_capacity(boundaries.len() + 1);
    let mut cursor = 0;

    for boundary in boundaries {
        let marker = format!(
            "<h{} data-sourcepos=\"{}:{}-",
            boundary.level, boundary.line, boundary.column
        );
        let start = html[cursor..]
            .find(&marker)
            .map(|idx| idx + cursor)
            .ok_or_else(|| {
                RenderError::document(format!(
                    "unable to locate section heading at {}:{}",
                    boundary.line, boundary.column
                ))
            })?;
        sections.push(html[cursor..start].to_string());
        cursor = start;
    }
    sections.push(html[cursor..].to_string());

    sections.retain(|section| !section.trim().is_empty());
    Ok(sections)
}
