//! Collaborator traits describing storage and output adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::document::{ContentItem, FileItem};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource `{key}` not found")]
    NotFound { key: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Read access to stored files and their content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn file(&self, id: &str) -> Result<FileItem, RepoError>;

    /// Load the content item stored under a key from
    /// [`crate::domain::document::content_key`].
    async fn load_item(&self, key: &str) -> Result<ContentItem, RepoError>;
}

/// Destination for exported bytes. Saving is fire-and-forget: adapters report
/// their own failures.
pub trait FileSaver: Send + Sync {
    fn save(&self, bytes: Vec<u8>, mime: &str, suggested_name: &str);
}
