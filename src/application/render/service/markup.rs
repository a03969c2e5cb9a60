//! Streaming passes over rendered HTML.

use std::{cell::RefCell, rc::Rc};

use comrak::nodes::{AstNode, NodeValue};
use lol_html::{RewriteStrSettings, element, html_content::ContentType, rewrite_str, text};
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use tracing::debug;

use crate::application::render::types::RenderError;
use crate::domain::headings::HeadingRecord;

use super::anchors::AnchorMap;

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
const TABLE_WRAPPER_CLASS: &str = "table-wrapper";
const SOURCEPOS_ATTRIBUTE: &str = "data-sourcepos";

/// Remove `data-sourcepos` from raw HTML in the tree so only headings the
/// converter emits can claim an anchor or start a section.
pub(crate) fn strip_raw_sourcepos<'a>(root: &'a AstNode<'a>) -> Result<(), RenderError> {
    for node in root.descendants() {
        let mut data = node.data.borrow_mut();
        let literal = match &mut data.value {
            NodeValue::HtmlBlock(block) => &mut block.literal,
            NodeValue::HtmlInline(raw) => raw,
            _ => continue,
        };
        if literal.contains(SOURCEPOS_ATTRIBUTE) {
            *literal = remove_sourcepos(literal)?;
        }
    }
    Ok(())
}

fn remove_sourcepos(fragment: &str) -> Result<String, RenderError> {
    rewrite_str(
        fragment,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[data-sourcepos]", |el| {
                el.remove_attribute(SOURCEPOS_ATTRIBUTE);
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::document(err.to_string()))
}

/// Give converted headings their anchors and wrap tables for scrolling.
/// Each anchor is handed out once.
pub(crate) fn decorate(html: &str, mut anchors: AnchorMap) -> Result<String, RenderError> {
    let wrapper_open = format!("<div class=\"{TABLE_WRAPPER_CLASS}\">");

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!(HEADING_SELECTOR, |el| {
                    let Some(sourcepos) = el.get_attribute(SOURCEPOS_ATTRIBUTE) else {
                        return Ok(());
                    };
                    let start = sourcepos.split('-').next().unwrap_or_default();
                    if let Some(slug) = anchors.remove(start) {
                        el.set_attribute("id", &slug)?;
                    }
                    Ok(())
                }),
                element!("table", |el| {
                    el.before(&wrapper_open, ContentType::Html);
                    el.after("</div>", ContentType::Html);
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::document(err.to_string()))
}

/// Replace every table wrapper with its own children, in place.
pub(crate) fn unwrap_table_wrappers(html: &str) -> Result<String, RenderError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("div.table-wrapper", |el| {
                el.remove_and_keep_content();
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::document(err.to_string()))
}

/// Heading elements in document order with their text content, id and level.
pub(crate) fn extract_headings(html: &str) -> Result<Vec<HeadingRecord>, RenderError> {
    let headings = Rc::new(RefCell::new(Vec::<HeadingRecord>::new()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!(HEADING_SELECTOR, {
                    let headings = Rc::clone(&headings);
                    move |el| {
                        let level = el
                            .tag_name()
                            .strip_prefix('h')
                            .and_then(|value| value.parse::<u8>().ok())
                            .unwrap_or(0);
                        let anchor = el.get_attribute("id").unwrap_or_default();
                        headings
                            .borrow_mut()
                            .push(HeadingRecord::new(String::new(), anchor, level));
                        Ok(())
                    }
                }),
                text!(HEADING_SELECTOR, {
                    let headings = Rc::clone(&headings);
                    move |chunk| {
                        if let Some(current) = headings.borrow_mut().last_mut() {
                            current.title.push_str(chunk.as_str());
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::document(err.to_string()))?;

    let mut headings = Rc::try_unwrap(headings)
        .map(RefCell::into_inner)
        .unwrap_or_else(|rc| rc.borrow().clone());
    for heading in &mut headings {
        heading.title = decode_entities(&heading.title);
    }
    Ok(headings)
}

/// Decode the character references a serializer emits in text content.
/// Text the decoder rejects is kept as serialized.
fn decode_entities(raw: &str) -> String {
    match unescape_with(raw, resolve_html5_entity) {
        Ok(text) => text.into_owned(),
        Err(err) => {
            debug!(
                target = "application::render::markup",
                error = %err,
                "Heading text kept undecoded"
            );
            raw.to_string()
        }
    }
}
