//! Storage abstractions for toot persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── 110123456789012345.md    # One Hugo content file per toot
//! └── 110123456789012346.md
//! ```
//!
//! Snapshots written by `fetch` use the same naming with a `.json` extension.

pub mod frontmatter;
pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::Toot;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for toot storage backends.
#[async_trait]
pub trait TootStorage: Send + Sync {
    /// Ids of every toot already stored.
    async fn known_ids(&self) -> Result<HashSet<String>>;

    /// Load a stored toot with its body under `content`.
    ///
    /// `Ok(None)` means the file exists but has no readable front matter.
    async fn load_toot(&self, id: &str) -> Result<Option<Map<String, Value>>>;

    /// Write a toot, replacing any stored version.
    async fn save_toot(&self, toot: &Toot) -> Result<()>;
}
