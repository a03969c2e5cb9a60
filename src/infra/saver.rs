//! File saver writing exports into a directory.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::application::repos::FileSaver;

#[derive(Debug, Clone)]
pub struct FsFileSaver {
    output_dir: PathBuf,
}

impl FsFileSaver {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn target_for(&self, suggested_name: &str) -> Option<PathBuf> {
        let name = Path::new(suggested_name).file_name()?;
        Some(self.output_dir.join(name))
    }
}

impl FileSaver for FsFileSaver {
    fn save(&self, bytes: Vec<u8>, mime: &str, suggested_name: &str) {
        let Some(target) = self.target_for(suggested_name) else {
            warn!(
                target = "infra::saver",
                op = "save",
                result = "error",
                name = suggested_name,
                "Refusing to save export without a file name"
            );
            return;
        };

        let written = std::fs::create_dir_all(&self.output_dir)
            .and_then(|()| std::fs::write(&target, &bytes));
        match written {
            Ok(()) => info!(
                target = "infra::saver",
                op = "save",
                result = "success",
                path = %target.display(),
                mime,
                bytes = bytes.len(),
                "Export saved"
            ),
            Err(err) => warn!(
                target = "infra::saver",
                op = "save",
                result = "error",
                path = %target.display(),
                error = %err,
                "Failed to save export"
            ),
        }
    }
}
