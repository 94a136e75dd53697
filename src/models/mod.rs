// src/models/mod.rs

//! Domain models for the sync application.

mod config;
mod toot;

// Re-export all public types
pub use config::{
    Config, FetchConfig, MAX_PAGE_SIZE, OutputConfig, ServerConfig, TransformConfig,
};
pub use toot::{Toot, compare_ids};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timing and volume of a single sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub pages_requested: usize,
    pub toot_count: usize,
}

impl SyncStats {
    /// Wall time of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}
