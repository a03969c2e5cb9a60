//! Handlebars rendering performed inside a render unit.
//!
//! Helpers arrive as one string holding any number of Rhai script helpers,
//! each introduced by a marker line:
//!
//! ```text
//! // @helper shout
//! params[0].to_upper() + "!"
//! ```

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
    html_escape,
};
use serde_json::Value;

const HELPER_MARKER: &str = "// @helper";

/// Render `template` against `view`. Errors are reported as plain messages
/// because they cross the unit boundary as text.
pub(crate) fn render(template: &str, view: &Value, helpers: &str) -> Result<String, String> {
    let mut registry = Handlebars::new();
    registry.register_helper("tocToHtml", Box::new(toc_to_html));

    for (name, script) in parse_helpers(helpers)? {
        registry
            .register_script_helper(&name, &script)
            .map_err(|err| format!("helper `{name}` failed to compile: {err}"))?;
    }

    registry
        .render_template(template, view)
        .map_err(|err| err.to_string())
}

/// Split a helpers string into `(name, script)` pairs.
pub(crate) fn parse_helpers(source: &str) -> Result<Vec<(String, String)>, String> {
    let mut helpers: Vec<(String, String)> = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        if let Some(rest) = line.trim_start().strip_prefix(HELPER_MARKER) {
            let name = rest.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(format!("line {}: invalid helper name `{name}`", idx + 1));
            }
            if helpers.iter().any(|(existing, _)| existing == name) {
                return Err(format!("line {}: helper `{name}` defined twice", idx + 1));
            }
            helpers.push((name.to_string(), String::new()));
            continue;
        }

        match helpers.last_mut() {
            Some((_, script)) => {
                script.push_str(line);
                script.push('\n');
            }
            None if line.trim().is_empty() => {}
            None => {
                return Err(format!(
                    "line {}: helper code must follow a `{HELPER_MARKER} <name>` line",
                    idx + 1
                ));
            }
        }
    }

    Ok(helpers)
}

/// `{{tocToHtml files.0.content.toc depth=2}}`
fn toc_to_html(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let toc = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("tocToHtml", 0))?;
    let depth = h
        .hash_get("depth")
        .and_then(|value| value.value().as_u64())
        .map(|depth| depth as usize)
        .unwrap_or(usize::MAX);

    let mut html = String::new();
    write_toc(toc.value(), depth, &mut html);
    out.write(&html)?;
    Ok(())
}

fn write_toc(nodes: &Value, depth: usize, html: &mut String) {
    let Some(nodes) = nodes.as_array() else {
        return;
    };
    if depth == 0 || nodes.is_empty() {
        return;
    }

    html.push_str("<ul>");
    for node in nodes {
        let title = node.get("title").and_then(Value::as_str).unwrap_or_default();
        let anchor = node.get("anchor").and_then(Value::as_str).unwrap_or_default();

        html.push_str("<li>");
        if anchor.is_empty() {
            html.push_str(&html_escape(title));
        } else {
            html.push_str("<a href=\"#");
            html.push_str(&html_escape(anchor));
            html.push_str("\">");
            html.push_str(&html_escape(title));
            html.push_str("</a>");
        }
        if let Some(children) = node.get("children") {
            write_toc(children, depth - 1, html);
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}
