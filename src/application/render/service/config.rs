use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;
use comrak::options::{ListStyleType, Options};

use crate::application::render::extensions::ConverterOptions;

/// Comrak options for the selected extensions. Source positions are always
/// emitted; the markup passes rely on them and the sanitizer strips them.
pub(crate) fn comrak_options(flags: &ConverterOptions) -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.table = flags.table;
    ext.strikethrough = flags.del;
    ext.tasklist = flags.tasklist;
    ext.footnotes = flags.footnote;
    ext.autolink = flags.linkify;
    ext.subscript = flags.sub;
    ext.superscript = flags.sup;
    ext.description_lists = flags.dl;
    ext.math_dollars = flags.math;
    ext.math_code = flags.math;

    options.parse.smart = flags.typographer;

    let render = &mut options.render;
    render.hardbreaks = flags.breaks;
    render.r#unsafe = flags.html;
    render.github_pre_lang = true;
    render.tasklist_classes = flags.tasklist;
    render.list_style = ListStyleType::Dash;
    render.sourcepos = true;

    options
}

pub(crate) fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "abbr",
        "blockquote",
        "br",
        "code",
        "dd",
        "del",
        "div",
        "dl",
        "dt",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "i",
        "img",
        "input",
        "ins",
        "kbd",
        "li",
        "mark",
        "ol",
        "p",
        "pre",
        "s",
        "section",
        "span",
        "strong",
        "sub",
        "sup",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "u",
        "ul",
    ]);
    builder.tags(tags);

    let generic: HashSet<&'static str> = HashSet::from([
        "class",
        "id",
        "title",
        "lang",
        "dir",
        "aria-hidden",
        "aria-label",
        "role",
        "data-footnote-ref",
        "data-footnotes",
        "data-footnote-backref",
        "data-footnote-backref-idx",
        "data-math-style",
    ]);
    builder.generic_attributes(generic);

    builder.add_tag_attributes("img", &["width", "height", "alt"]);
    builder.add_tag_attributes("pre", &["lang"]);
    builder.add_tag_attributes("th", &["align", "colspan", "rowspan"]);
    builder.add_tag_attributes("td", &["align", "colspan", "rowspan"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);
    builder.add_tag_attributes("ol", &["start"]);

    builder
}
