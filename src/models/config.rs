//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Largest page the statuses endpoint will return.
pub const MAX_PAGE_SIZE: usize = 40;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Which server and account to read from
    #[serde(default)]
    pub server: ServerConfig,

    /// Pagination and HTTP client settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Where content files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Front matter shaping rules
    #[serde(default)]
    pub transform: TransformConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults if the file does not exist.
    ///
    /// A file that exists but fails to read or parse is an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Config not found at {:?}. Using defaults.",
                    path.as_ref()
                );
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.server.base_url).map_err(|e| {
            AppError::validation(format!(
                "server.base_url '{}' is not a valid URL: {}",
                self.server.base_url, e
            ))
        })?;
        if self.server.account_id.trim().is_empty() {
            return Err(AppError::validation("server.account_id is empty"));
        }
        if !self.server.account_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "server.account_id must be a numeric account id",
            ));
        }
        if self.fetch.page_max == 0 || self.fetch.page_max > MAX_PAGE_SIZE {
            return Err(AppError::validation(format!(
                "fetch.page_max must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == Some(0) {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Mastodon server and account settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server, e.g. `https://fosstodon.org`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Numeric account id whose statuses are synced
    #[serde(default = "defaults::account_id")]
    pub account_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            account_id: defaults::account_id(),
        }
    }
}

/// Pagination and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Number of toots to walk back through
    #[serde(default = "defaults::total")]
    pub total: usize,

    /// Page size requested from the server (capped at 40 server-side)
    #[serde(default = "defaults::page_max")]
    pub page_max: usize,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; unset leaves the client default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            total: defaults::total(),
            page_max: defaults::page_max(),
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Output location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory holding `{id}.md` content files
    #[serde(default = "defaults::content_dir")]
    pub content_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            content_dir: defaults::content_dir(),
        }
    }
}

/// Front matter shaping rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Volatile `account` sub-fields dropped before persisting
    #[serde(default = "defaults::strip_account_fields")]
    pub strip_account_fields: Vec<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            strip_account_fields: defaults::strip_account_fields(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Server defaults
    pub fn base_url() -> String {
        "https://fosstodon.org".into()
    }
    pub fn account_id() -> String {
        "108219415927856966".into()
    }

    // Fetch defaults
    pub fn total() -> usize {
        1000
    }
    pub fn page_max() -> usize {
        super::MAX_PAGE_SIZE
    }
    pub fn user_agent() -> String {
        concat!("tootsync/", env!("CARGO_PKG_VERSION")).into()
    }

    // Output defaults
    pub fn content_dir() -> PathBuf {
        PathBuf::from("./")
    }

    // Transform defaults
    pub fn strip_account_fields() -> Vec<String> {
        [
            "locked",
            "bot",
            "discoverable",
            "group",
            "created_at",
            "note",
            "followers_count",
            "following_count",
            "statuses_count",
            "last_status_at",
            "emojis",
            "fields",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
