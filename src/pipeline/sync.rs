// src/pipeline/sync.rs

//! Sync pipelines: fetch -> transform -> reconcile.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, SyncStats, Toot};
use crate::pipeline::reconcile::{ReconcileReport, Reconciler};
use crate::pipeline::transform::Transformer;
use crate::services::{PagePlan, StatusSource, fetch_all};
use crate::storage::{LocalStorage, TootStorage};

/// Result of a full sync run.
#[derive(Debug)]
pub struct SyncSummary {
    pub stats: SyncStats,
    pub report: ReconcileReport,
}

/// Fetch the account's toots and reconcile them into storage.
///
/// Fetch errors abort the run before anything is written.
pub async fn run_sync(
    config: &Config,
    source: &dyn StatusSource,
    storage: &dyn TootStorage,
    dry_run: bool,
) -> Result<SyncSummary> {
    let start_time = Utc::now();

    // Read in saved toot ids
    let known = storage.known_ids().await?;
    log::info!("Found {} saved toots", known.len());

    let outcome = fetch_all(source, &PagePlan::from_config(&config.fetch)).await?;
    let toots = transform_all(config, &outcome.toots);

    let report = Reconciler::new(storage)
        .dry_run(dry_run)
        .reconcile(&known, &toots)
        .await;

    let stats = SyncStats {
        start_time,
        end_time: Utc::now(),
        pages_requested: outcome.pages_requested,
        toot_count: toots.len(),
    };

    Ok(SyncSummary { stats, report })
}

/// Fetch the account's toots and write them as JSON snapshots.
///
/// Returns the number of snapshots written. Write failures are logged and
/// skipped.
pub async fn run_fetch(
    config: &Config,
    source: &dyn StatusSource,
    snapshots: &LocalStorage,
) -> Result<usize> {
    let outcome = fetch_all(source, &PagePlan::from_config(&config.fetch)).await?;

    let mut written = 0;
    for toot in transform_all(config, &outcome.toots) {
        match snapshots.save_snapshot(&toot).await {
            Ok(()) => written += 1,
            Err(e) => log::error!("Failed to write snapshot {}: {}", toot.id(), e),
        }
    }

    log::info!(
        "Wrote {} snapshots to {}",
        written,
        snapshots.root().display()
    );
    Ok(written)
}

/// Reconcile previously fetched JSON snapshots into storage.
pub async fn run_render(
    config: &Config,
    snapshots: &LocalStorage,
    storage: &dyn TootStorage,
    dry_run: bool,
) -> Result<ReconcileReport> {
    let known = storage.known_ids().await?;
    let loaded = snapshots.load_snapshots().await?;
    log::info!(
        "Loaded {} snapshots from {}",
        loaded.len(),
        snapshots.root().display()
    );

    let toots = transform_all(config, &loaded);
    Ok(Reconciler::new(storage)
        .dry_run(dry_run)
        .reconcile(&known, &toots)
        .await)
}

fn transform_all(config: &Config, toots: &[Toot]) -> Vec<Toot> {
    let transformer = Transformer::new(&config.transform);
    toots.iter().map(|toot| transformer.apply(toot)).collect()
}
