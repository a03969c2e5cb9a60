//! YAML file properties parsed into the JSON shape templates consume.

use serde_json::{Map, Value};
use tracing::warn;

/// Mapping of property name to value, as exposed to templates.
pub type Properties = Map<String, Value>;

/// Parse a YAML properties block. Blank, malformed or non-mapping input
/// yields an empty mapping rather than failing the export.
pub fn compute_properties(yaml: &str) -> Properties {
    if yaml.trim().is_empty() {
        return Properties::new();
    }

    let parsed: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                target = "application::properties",
                error = %err,
                "Ignoring malformed properties block"
            );
            return Properties::new();
        }
    };

    match serde_json::to_value(parsed) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Properties::new(),
        Ok(other) => {
            warn!(
                target = "application::properties",
                kind = value_kind(&other),
                "Ignoring properties block that is not a mapping"
            );
            Properties::new()
        }
        Err(err) => {
            warn!(
                target = "application::properties",
                error = %err,
                "Ignoring properties block with non-string keys"
            );
            Properties::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_mappings() {
        let properties = compute_properties(
            "title: Release notes\ntags: [a, b]\nextensions:\n  preset: gfm\n",
        );

        assert_eq!(properties["title"], json!("Release notes"));
        assert_eq!(properties["tags"], json!(["a", "b"]));
        assert_eq!(properties["extensions"]["preset"], json!("gfm"));
    }

    #[test]
    fn blank_and_malformed_input_yield_empty_mapping() {
        assert!(compute_properties("").is_empty());
        assert!(compute_properties("  \n").is_empty());
        assert!(compute_properties("title: [unclosed").is_empty());
    }

    #[test]
    fn scalar_documents_are_ignored() {
        assert!(compute_properties("just a string").is_empty());
        assert!(compute_properties("- a\n- b\n").is_empty());
    }
}
