//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── {id}.md      # Hugo content file (front matter + body)
//! └── {id}.json    # Raw snapshot written by `fetch`
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Toot, compare_ids};
use crate::storage::{TootStorage, frontmatter};

const CONTENT_EXT: &str = "md";
const SNAPSHOT_EXT: &str = "json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Path of a file named after a toot id.
    ///
    /// Ids become file names, so anything that could escape the root is
    /// rejected.
    fn path(&self, id: &str, ext: &str) -> Result<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(AppError::validation(format!(
                "toot id '{id}' is not usable as a file name"
            )));
        }
        Ok(self.root_dir.join(format!("{id}.{ext}")))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Stems of the files in the root with the given extension.
    ///
    /// A missing root directory holds nothing.
    async fn stems(&self, ext: &str) -> Result<Vec<(String, PathBuf)>> {
        let mut entries = match tokio::fs::read_dir(&self.root_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut stems = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file()
                || path.extension().is_none_or(|e| e != ext)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push((stem.to_string(), path.clone()));
            }
        }
        Ok(stems)
    }

    /// Write a toot as a pretty-printed JSON snapshot.
    pub async fn save_snapshot(&self, toot: &Toot) -> Result<()> {
        let path = self.path(toot.id(), SNAPSHOT_EXT)?;
        let bytes = serde_json::to_vec_pretty(toot)?;
        self.write_bytes(&path, &bytes).await
    }

    /// Load every JSON snapshot in the root, newest first.
    ///
    /// Snapshots that are not readable toots are logged and skipped.
    pub async fn load_snapshots(&self) -> Result<Vec<Toot>> {
        let mut toots = Vec::new();
        for (stem, path) in self.stems(SNAPSHOT_EXT).await? {
            let bytes = tokio::fs::read(&path).await?;
            let parsed = serde_json::from_slice::<Value>(&bytes)
                .map_err(AppError::from)
                .and_then(Toot::from_value);

            match parsed {
                Ok(toot) => toots.push(toot),
                Err(e) => log::warn!("Skipping snapshot {} ({}): {}", stem, path.display(), e),
            }
        }

        toots.sort_by(|a, b| compare_ids(b.id(), a.id()));
        Ok(toots)
    }
}

#[async_trait]
impl TootStorage for LocalStorage {
    async fn known_ids(&self) -> Result<HashSet<String>> {
        Ok(self
            .stems(CONTENT_EXT)
            .await?
            .into_iter()
            .map(|(stem, _)| stem)
            .collect())
    }

    async fn load_toot(&self, id: &str) -> Result<Option<Map<String, Value>>> {
        let path = self.path(id, CONTENT_EXT)?;
        let text = tokio::fs::read_to_string(&path).await?;
        Ok(frontmatter::parse(&text))
    }

    async fn save_toot(&self, toot: &Toot) -> Result<()> {
        let path = self.path(toot.id(), CONTENT_EXT)?;
        let text = frontmatter::render(toot.as_map())?;
        self.write_bytes(&path, text.as_bytes()).await
    }
}
