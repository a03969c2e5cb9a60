//! Markdown extension selection driven by file properties.
//!
//! Files choose a preset under `extensions.preset` and may flip individual
//! flags under `extensions.markdown`:
//!
//! ```yaml
//! extensions:
//!   preset: gfm
//!   markdown:
//!     footnote: true
//!     breaks: false
//! ```

use serde_json::Value;
use tracing::warn;

use crate::application::properties::Properties;

/// Named starting points for [`ConverterOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Everything off, raw HTML escaped.
    Zero,
    /// Plain CommonMark with raw HTML passed to the sanitizer.
    CommonMark,
    /// GitHub flavoured: tables, strikethrough, task lists, autolinks, hard breaks.
    Gfm,
    /// The editor's default: GFM tables plus footnotes, sub/sup, definition lists and math.
    #[default]
    Default,
}

impl Preset {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zero" => Some(Self::Zero),
            "commonmark" => Some(Self::CommonMark),
            "gfm" => Some(Self::Gfm),
            "default" => Some(Self::Default),
            _ => None,
        }
    }
}

/// Markdown features enabled for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterOptions {
    pub html: bool,
    pub table: bool,
    pub del: bool,
    pub tasklist: bool,
    pub footnote: bool,
    pub linkify: bool,
    pub sub: bool,
    pub sup: bool,
    pub breaks: bool,
    pub typographer: bool,
    pub dl: bool,
    pub math: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self::preset(Preset::Default)
    }
}

impl ConverterOptions {
    pub fn preset(preset: Preset) -> Self {
        let off = Self {
            html: false,
            table: false,
            del: false,
            tasklist: false,
            footnote: false,
            linkify: false,
            sub: false,
            sup: false,
            breaks: false,
            typographer: false,
            dl: false,
            math: false,
        };

        match preset {
            Preset::Zero => off,
            Preset::CommonMark => Self { html: true, ..off },
            Preset::Gfm => Self {
                html: true,
                table: true,
                del: true,
                tasklist: true,
                linkify: true,
                breaks: true,
                ..off
            },
            Preset::Default => Self {
                html: true,
                table: true,
                del: true,
                tasklist: true,
                footnote: true,
                linkify: true,
                sub: true,
                sup: true,
                dl: true,
                math: true,
                ..off
            },
        }
    }

    /// Resolve the options declared by a file's properties.
    pub fn from_properties(properties: &Properties) -> Self {
        let Some(extensions) = properties.get("extensions").and_then(Value::as_object) else {
            return Self::default();
        };

        let preset = match extensions.get("preset").and_then(Value::as_str) {
            Some(name) => Preset::parse(name).unwrap_or_else(|| {
                warn!(
                    target = "application::render::extensions",
                    preset = name,
                    "Unknown markdown preset; using default"
                );
                Preset::Default
            }),
            None => Preset::Default,
        };

        let mut options = Self::preset(preset);
        if let Some(flags) = extensions.get("markdown").and_then(Value::as_object) {
            for (name, value) in flags {
                let Some(enabled) = value.as_bool() else {
                    continue;
                };
                if !options.set_flag(name, enabled) {
                    warn!(
                        target = "application::render::extensions",
                        flag = name.as_str(),
                        "Ignoring unknown markdown extension flag"
                    );
                }
            }
        }
        options
    }

    fn set_flag(&mut self, name: &str, enabled: bool) -> bool {
        let slot = match name {
            "html" => &mut self.html,
            "table" => &mut self.table,
            "del" => &mut self.del,
            "tasklist" => &mut self.tasklist,
            "footnote" => &mut self.footnote,
            "linkify" => &mut self.linkify,
            "sub" => &mut self.sub,
            "sup" => &mut self.sup,
            "breaks" => &mut self.breaks,
            "typographer" => &mut self.typographer,
            "dl" => &mut self.dl,
            "math" => &mut self.math,
            _ => return false,
        };
        *slot = enabled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::properties::compute_properties;

    #[test]
    fn missing_extensions_use_default_preset() {
        let options = ConverterOptions::from_properties(&Properties::new());
        assert_eq!(options, ConverterOptions::preset(Preset::Default));
        assert!(options.table && options.footnote && !options.breaks);
    }

    #[test]
    fn preset_and_flag_overrides_combine() {
        let properties = compute_properties(
            "extensions:\n  preset: gfm\n  markdown:\n    breaks: false\n    footnote: true\n",
        );
        let options = ConverterOptions::from_properties(&properties);

        assert!(options.table);
        assert!(options.footnote);
        assert!(!options.breaks);
        assert!(!options.math);
    }

    #[test]
    fn zero_preset_disables_raw_html() {
        let properties = compute_properties("extensions:\n  preset: zero\n");
        let options = ConverterOptions::from_properties(&properties);
        assert!(!options.html);
        assert!(!options.table);
    }

    #[test]
    fn unknown_preset_and_flags_are_ignored() {
        let properties = compute_properties(
            "extensions:\n  preset: fancy\n  markdown:\n    sparkles: true\n    table: maybe\n",
        );
        let options = ConverterOptions::from_properties(&properties);
        assert_eq!(options, ConverterOptions::default());
    }
}
