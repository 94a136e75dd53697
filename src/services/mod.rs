//! Service layer for talking to the Mastodon server.

pub mod statuses;

pub use statuses::{
    FetchOutcome, MastodonClient, PagePlan, PageQuery, StatusSource, fetch_all, parse_page,
};
