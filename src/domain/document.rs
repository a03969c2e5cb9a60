//! Stored documents as the export pipeline sees them.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

const CONTENT_KEY_SUFFIX: &str = "/content";

/// File metadata needed to name exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: String,
    pub name: String,
}

/// Stored content of a file: markdown text plus its YAML properties block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub text: String,
    pub properties: String,
}

/// Storage key of the content item belonging to `file_id`.
pub fn content_key(file_id: &str) -> String {
    format!("{file_id}{CONTENT_KEY_SUFFIX}")
}

/// Inverse of [`content_key`].
pub fn file_id_from_content_key(key: &str) -> Result<&str, DomainError> {
    match key.strip_suffix(CONTENT_KEY_SUFFIX) {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(DomainError::validation(format!(
            "`{key}` is not a content key"
        ))),
    }
}
