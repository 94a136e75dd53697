// src/services/statuses.rs

//! Account statuses service.
//!
//! Walks `GET /api/v1/accounts/{id}/statuses` from newest to oldest using the
//! `max_id` cursor, collecting every page into memory.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FetchConfig, ServerConfig, Toot, compare_ids};

/// How many toots to walk back through, and in what page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub total: usize,
    pub page_max: usize,
}

impl PagePlan {
    pub fn new(total: usize, page_max: usize) -> Self {
        Self { total, page_max }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.total, config.page_max)
    }

    /// Upper bound on requests: `ceil(total / page_max)`.
    pub fn page_count(&self) -> usize {
        if self.page_max == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_max)
    }

    /// `limit` sent with every request.
    pub fn limit(&self) -> usize {
        self.total.min(self.page_max)
    }
}

/// Query parameters for one page. Unset fields are left off the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub max_id: Option<String>,
}

/// A source of status pages.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch one page, newest first.
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Toot>>;
}

/// Statuses fetched by [`fetch_all`].
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub toots: Vec<Toot>,
    pub pages_requested: usize,
}

/// Fetch pages until the server runs dry or the plan is exhausted.
///
/// Stops early on an empty page or on a page shorter than the requested
/// limit. Any error aborts the walk and discards what was collected.
pub async fn fetch_all(source: &dyn StatusSource, plan: &PagePlan) -> Result<FetchOutcome> {
    let limit = plan.limit();
    let mut outcome = FetchOutcome::default();
    let mut cursor: Option<String> = None;

    for _ in 0..plan.page_count() {
        let query = PageQuery {
            limit: Some(limit),
            max_id: cursor.clone(),
        };
        let page = source.fetch_page(&query).await?;
        outcome.pages_requested += 1;

        // No more to retrieve
        if page.is_empty() {
            break;
        }

        log::info!("Retrieved {} toots from server", page.len());
        let exhausted = page.len() < limit;
        cursor = oldest_id(&page);
        outcome.toots.extend(page);

        if exhausted {
            log::debug!("Short page, reached the end of the timeline");
            break;
        }
    }

    log::info!(
        "Successfully grabbed a total of {} toots from server",
        outcome.toots.len()
    );
    Ok(outcome)
}

/// Smallest id on a page, used as the next `max_id`.
fn oldest_id(page: &[Toot]) -> Option<String> {
    page.iter()
        .map(Toot::id)
        .min_by(|a, b| compare_ids(a, b))
        .map(str::to_string)
}

/// Decode a statuses response body into toots.
pub fn parse_page(url: &str, body: &str) -> Result<Vec<Toot>> {
    let value: Value = serde_json::from_str(body).map_err(|e| AppError::decode(url, e))?;

    let Value::Array(items) = value else {
        return Err(AppError::unexpected_response(
            url,
            "expected a JSON array of statuses",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Toot::from_value(item)
                .map_err(|e| AppError::unexpected_response(url, format!("item {index}: {e}")))
        })
        .collect()
}

/// HTTP client for a Mastodon-compatible server.
pub struct MastodonClient {
    client: Client,
    endpoint: Url,
}

impl MastodonClient {
    pub fn new(server: &ServerConfig, client: Client) -> Result<Self> {
        let endpoint = Self::statuses_url(&server.base_url, &server.account_id)?;
        Ok(Self { client, endpoint })
    }

    /// `{base_url}/api/v1/accounts/{account_id}/statuses`
    pub fn statuses_url(base_url: &str, account_id: &str) -> Result<Url> {
        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|_| AppError::config(format!("'{base_url}' cannot be used as a base URL")))?
            .pop_if_empty()
            .extend(["api", "v1", "accounts", account_id, "statuses"]);
        Ok(url)
    }

    pub fn page_url(&self, query: &PageQuery) -> Url {
        let mut url = self.endpoint.clone();
        if query.limit.is_some() || query.max_id.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(max_id) = &query.max_id {
                pairs.append_pair("max_id", max_id);
            }
        }
        url
    }
}

#[async_trait]
impl StatusSource for MastodonClient {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Toot>> {
        let url = self.page_url(query);
        log::debug!("GET {}", url);

        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_page(url.as_str(), &body)
    }
}
