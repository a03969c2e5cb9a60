//! Templates shipped with the binary.

use super::types::{DEFAULT_TEMPLATE, TemplateSpec};

const PLAIN_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{files.0.name}}</title>
</head>
<body>
{{{files.0.content.html}}}
</body>
</html>
"#;

const STYLED_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{#if files.0.content.properties.title}}{{files.0.content.properties.title}}{{else}}{{files.0.name}}{{/if}}</title>
<style>
body { margin: 0 auto; max-width: 48rem; padding: 2rem 1rem; font: 16px/1.6 system-ui, sans-serif; color: #222; }
nav.toc { border-left: 3px solid #ddd; margin-bottom: 2rem; padding-left: 1rem; }
nav.toc ul { list-style: none; padding-left: 1rem; }
pre { background: #f6f8fa; overflow-x: auto; padding: 0.75rem; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 0.25rem 0.5rem; }
</style>
</head>
<body>
{{#if files.0.content.toc}}
<nav class="toc">{{tocToHtml files.0.content.toc depth=3}}</nav>
{{/if}}
<main>
{{{files.0.content.html}}}
</main>
</body>
</html>
"#;

/// Named templates selectable without supplying template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTemplate {
    PlainText,
    PlainHtml,
    StyledHtml,
}

impl BuiltinTemplate {
    pub const ALL: [BuiltinTemplate; 3] = [Self::PlainText, Self::PlainHtml, Self::StyledHtml];

    pub fn name(self) -> &'static str {
        match self {
            Self::PlainText => "plain-text",
            Self::PlainHtml => "plain-html",
            Self::StyledHtml => "styled-html",
        }
    }

    /// File extension conventionally used for this template's output.
    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "md",
            Self::PlainHtml | Self::StyledHtml => "html",
        }
    }

    pub fn spec(self) -> TemplateSpec {
        let value = match self {
            Self::PlainText => DEFAULT_TEMPLATE,
            Self::PlainHtml => PLAIN_HTML,
            Self::StyledHtml => STYLED_HTML,
        };
        TemplateSpec::new(value, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::template::engine;
    use serde_json::json;

    #[test]
    fn plain_text_is_the_default_template() {
        assert_eq!(BuiltinTemplate::PlainText.spec(), TemplateSpec::default());
    }

    #[test]
    fn styled_html_prefers_the_title_property_and_includes_the_toc() {
        let view = json!({
            "files": [{
                "name": "notes",
                "content": {
                    "text": "",
                    "properties": { "title": "Field <Notes>" },
                    "yamlProperties": "",
                    "html": "<h1 id=\"a\">A</h1>",
                    "toc": [{ "title": "A", "anchor": "a", "level": 1, "children": [] }]
                }
            }]
        });
        let spec = BuiltinTemplate::StyledHtml.spec();
        let rendered = engine::render(&spec.value, &view, &spec.helpers).expect("render");

        assert!(rendered.contains("<title>Field &lt;Notes&gt;</title>"));
        assert!(rendered.contains("<nav class=\"toc\"><ul><li><a href=\"#a\">A</a></li></ul></nav>"));
        assert!(rendered.contains("<h1 id=\"a\">A</h1>"));
    }

    #[test]
    fn styled_html_omits_an_empty_toc() {
        let view = json!({
            "files": [{ "name": "notes", "content": { "html": "<p>x</p>", "toc": [] } }]
        });
        let spec = BuiltinTemplate::StyledHtml.spec();
        let rendered = engine::render(&spec.value, &view, &spec.helpers).expect("render");

        assert!(!rendered.contains("<nav"));
        assert!(rendered.contains("<title>notes</title>"));
    }
}
