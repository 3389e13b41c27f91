//! Finding the markdown sources under the discovery root.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tokio::fs;

use crate::error::{Error, Result};

pub const MARKDOWN_EXTENSION: &str = "md";

/// walks a directory tree collecting markdown files
#[derive(Debug, Clone)]
pub struct Discoverer {
    root: PathBuf,
    excluded: HashSet<String>,
}

impl Discoverer {
    pub fn new<T: AsRef<Path>>(root: T, excluded: impl IntoIterator<Item = String>) -> Self {
        Self {
            root: root.as_ref().into(),
            excluded: excluded.into_iter().collect(),
        }
    }

    /// hidden entries and excluded directory names are never visited
    pub fn is_excluded(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded.contains(name)
    }

    /// every markdown file below the root, in no particular order
    ///
    /// Fails on the first directory that can't be listed, no partial result is returned.
    /// Symbolic links are not followed.
    pub async fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut pending = vec![self.root.clone()];
        let mut found = Vec::new();
        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| Error::read_dir(&dir, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::read_dir(&dir, e))?
            {
                let name = entry.file_name();
                if self.is_excluded(&name.to_string_lossy()) {
                    tracing::debug!("Skipping `{:?}`", entry.path());
                    continue;
                }
                let path = entry.path();
                let ty = entry
                    .file_type()
                    .await
                    .map_err(|e| Error::read(&path, e))?;
                if ty.is_dir() {
                    pending.push(path);
                } else if ty.is_file() && is_markdown(&path) {
                    found.push(path);
                }
            }
        }
        tracing::debug!("Found {} markdown files in `{:?}`", found.len(), self.root);
        Ok(found)
    }
}

pub fn is_markdown<T: AsRef<Path>>(path: T) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}
