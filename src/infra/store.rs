//! Content store adapters.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::RwLock,
};

use async_trait::async_trait;
use tracing::debug;

use crate::application::repos::{ContentStore, RepoError};
use crate::domain::document::{ContentItem, FileItem, file_id_from_content_key};

const MARKDOWN_EXTENSION: &str = "md";
const FRONT_MATTER_FENCE: &str = "---";

/// Markdown files under a root directory. File `notes/today` lives at
/// `<root>/notes/today.md`; a leading `---` fenced YAML block is its
/// properties.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, RepoError> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.{MARKDOWN_EXTENSION}")))
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn file(&self, id: &str) -> Result<FileItem, RepoError> {
        let path = self.path_for(id)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(RepoError::not_found(id)),
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(RepoError::not_found(id)),
            Err(err) => return Err(RepoError::from_persistence(err)),
        }

        let name = Path::new(id)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(id)
            .to_string();
        Ok(FileItem {
            id: id.to_string(),
            name,
        })
    }

    async fn load_item(&self, key: &str) -> Result<ContentItem, RepoError> {
        let id = file_id_from_content_key(key)
            .map_err(|err| RepoError::invalid_input(err.to_string()))?;
        let path = self.path_for(id)?;

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => RepoError::not_found(key),
                _ => RepoError::from_persistence(err),
            })?;

        let (properties, text) = split_front_matter(&raw);
        debug!(
            target = "infra::store",
            op = "load_item",
            path = %path.display(),
            text_bytes = text.len(),
            properties_bytes = properties.len(),
            "Loaded document content"
        );
        Ok(ContentItem {
            text: text.to_string(),
            properties: properties.to_string(),
        })
    }
}

fn validate_id(id: &str) -> Result<(), RepoError> {
    if id.trim().is_empty() {
        return Err(RepoError::invalid_input("file id must not be empty"));
    }
    let escapes = Path::new(id)
        .components()
        .any(|component| !matches!(component, Component::Normal(_)));
    if escapes || id.contains('\\') {
        return Err(RepoError::invalid_input(format!(
            "file id `{id}` must be a relative path without `..`"
        )));
    }
    Ok(())
}

/// Split a leading fenced YAML block off `raw`, returning `(yaml, body)`.
pub fn split_front_matter(raw: &str) -> (&str, &str) {
    let Some(rest) = strip_fence_line(raw) else {
        return ("", raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FRONT_MATTER_FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (yaml, body);
        }
        offset += line.len();
    }
    ("", raw)
}

fn strip_fence_line(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix(FRONT_MATTER_FENCE)?;
    rest.strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
}

/// In-memory store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    entries: RwLock<HashMap<String, (FileItem, ContentItem)>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: &str, name: &str, text: &str, properties: &str) {
        let file = FileItem {
            id: id.to_string(),
            name: name.to_string(),
        };
        let content = ContentItem {
            text: text.to_string(),
            properties: properties.to_string(),
        };
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(id.to_string(), (file, content));
    }

    fn get(&self, id: &str) -> Option<(FileItem, ContentItem)> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(id).cloned()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn file(&self, id: &str) -> Result<FileItem, RepoError> {
        self.get(id)
            .map(|(file, _)| file)
            .ok_or_else(|| RepoError::not_found(id))
    }

    async fn load_item(&self, key: &str) -> Result<ContentItem, RepoError> {
        let id = file_id_from_content_key(key)
            .map_err(|err| RepoError::invalid_input(err.to_string()))?;
        self.get(id)
            .map(|(_, content)| content)
            .ok_or_else(|| RepoError::not_found(key))
    }
}
