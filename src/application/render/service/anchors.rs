use std::collections::HashMap;

use comrak::nodes::{AstNode, NodeValue, Sourcepos};

use crate::application::render::types::SectionBoundary;
use crate::domain::slug::AnchorSlugger;

/// Heading anchors keyed by the heading's source start (`line:column`),
/// matching the prefix of the `data-sourcepos` attribute comrak emits.
pub(crate) type AnchorMap = HashMap<String, String>;

fn source_start(sourcepos: &Sourcepos) -> String {
    format!("{}:{}", sourcepos.start.line, sourcepos.start.column)
}

/// Assign a unique slug to every markdown heading, in document order.
pub(crate) fn collect_anchors<'a>(root: &'a AstNode<'a>) -> AnchorMap {
    let mut slugger = AnchorSlugger::new();
    let mut anchors = AnchorMap::new();

    for node in root.descendants() {
        let start = {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Heading(_) => source_start(&data.sourcepos),
                _ => continue,
            }
        };
        let text = collect_inline_text(node);
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        anchors.insert(start, slugger.anchor_for(&normalized));
    }

    anchors
}

/// Top-level headings, which delimit sections.
pub(crate) fn section_boundaries<'a>(root: &'a AstNode<'a>) -> Vec<SectionBoundary> {
    root.children()
        .filter_map(|node| {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Heading(heading) => Some(SectionBoundary {
                    level: heading.level,
                    line: data.sourcepos.start.line,
                    column: data.sourcepos.start.column,
                }),
                _ => None,
            }
        })
        .collect()
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::Math(math) => buffer.push_str(&math.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use comrak::{Arena, parse_document};

    use crate::application::render::extensions::ConverterOptions;
    use crate::application::render::service::config::comrak_options;

    #[test]
    fn anchors_cover_nested_headings_and_deduplicate() {
        let options = comrak_options(&ConverterOptions::default());
        let arena = Arena::new();
        let markdown = "# Intro\n\n> ## Intro\n\n## `code` *and* text\n";
        let root = parse_document(&arena, markdown, &options);

        let anchors = collect_anchors(root);
        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors.get("1:1").map(String::as_str), Some("intro"));
        assert_eq!(anchors.get("5:1").map(String::as_str), Some("code-and-text"));
        assert!(anchors.values().any(|slug| slug == "intro-2"));
    }

    #[test]
    fn inline_math_contributes_to_the_anchor() {
        let options = comrak_options(&ConverterOptions::default());
        let arena = Arena::new();
        let root = parse_document(&arena, "# Math $x^2$\n", &options);

        let anchors = collect_anchors(root);
        assert_eq!(anchors.get("1:1").map(String::as_str), Some("math-x-2"));
    }

    #[test]
    fn boundaries_skip_nested_headings() {
        let options = comrak_options(&ConverterOptions::default());
        let arena = Arena::new();
        let markdown = "intro\n\n# One\n\n> ## Quoted\n\n## Two\n";
        let root = parse_document(&arena, markdown, &options);

        let boundaries = section_boundaries(root);
        assert_eq!(boundaries.len(), 2);
        assert_eq!((boundaries[0].level, boundaries[0].line), (1, 3));
        assert_eq!((boundaries[1].level, boundaries[1].line), (2, 7));
    }
}
