//! The data model handed to templates.

use serde::{Deserialize, Serialize};

use crate::application::properties::Properties;
use crate::domain::headings::HeadingNode;

/// Everything a template can see. Serialized field names are part of the
/// template contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    pub files: Vec<FileView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileView {
    pub name: String,
    pub content: FileContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub text: String,
    pub properties: Properties,
    pub yaml_properties: String,
    pub html: String,
    pub toc: Vec<HeadingNode>,
}

/// Build the single-file view for one export.
pub fn assemble(
    file_name: &str,
    text: String,
    properties: Properties,
    yaml_properties: String,
    html: String,
    toc: Vec<HeadingNode>,
) -> RenderView {
    RenderView {
        files: vec![FileView {
            name: file_name.to_string(),
            content: FileContent {
                text,
                properties,
                yaml_properties,
                html,
                toc,
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_template_field_names() {
        let mut properties = Properties::new();
        properties.insert("title".to_string(), json!("Notes"));
        let toc = vec![HeadingNode {
            title: "Intro".to_string(),
            anchor: "intro".to_string(),
            level: 1,
            children: Vec::new(),
        }];

        let view = assemble(
            "notes",
            "# Intro".to_string(),
            properties,
            "title: Notes".to_string(),
            "<h1 id=\"intro\">Intro</h1>".to_string(),
            toc,
        );

        assert_eq!(
            serde_json::to_value(&view).expect("serialize"),
            json!({
                "files": [{
                    "name": "notes",
                    "content": {
                        "text": "# Intro",
                        "properties": { "title": "Notes" },
                        "yamlProperties": "title: Notes",
                        "html": "<h1 id=\"intro\">Intro</h1>",
                        "toc": [{ "title": "Intro", "anchor": "intro", "level": 1, "children": [] }]
                    }
                }]
            })
        );
    }

    #[test]
    fn empty_inputs_still_produce_one_file() {
        let view = assemble("", String::new(), Properties::new(), String::new(), String::new(), Vec::new());
        assert_eq!(view.files.len(), 1);
        assert!(view.files[0].content.toc.is_empty());
    }
}
