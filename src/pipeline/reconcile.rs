//! Reconcile fetched toots against the content directory.
//!
//! Each toot is handled on its own: new ids are written, changed toots are
//! rewritten, unchanged ones are left alone. Boosts never touch disk. A
//! toot that fails to read or write is reported and the run moves on, so an
//! interrupted run converges on the next one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Toot;
use crate::storage::TootStorage;

/// What is on disk for a toot id.
#[derive(Debug, Clone, PartialEq)]
pub enum Stored {
    Missing,
    Unreadable,
    Found(Map<String, Value>),
}

/// What to do with one toot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    SkipBoost,
    Create,
    Update,
    Unchanged,
    Unreadable,
}

/// Decide the action for a toot with content, given its stored state.
pub fn decide(toot: &Toot, stored: &Stored) -> Decision {
    match stored {
        Stored::Missing => Decision::Create,
        Stored::Unreadable => Decision::Unreadable,
        Stored::Found(saved) if saved == toot.as_map() => Decision::Unchanged,
        Stored::Found(_) => Decision::Update,
    }
}

/// Outcome of a reconcile pass.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: usize,
    pub boosts: usize,
    pub unreadable: Vec<String>,
    pub failed: Vec<String>,
    pub dry_run: bool,
}

impl ReconcileReport {
    /// Number of files written (or that would be, in a dry run).
    pub fn writes(&self) -> usize {
        self.created.len() + self.updated.len()
    }

    pub fn has_changes(&self) -> bool {
        self.writes() > 0
    }

    pub fn log_summary(&self) {
        log::info!(
            "{}{} created, {} updated, {} unchanged, {} boosts skipped",
            if self.dry_run { "[dry run] " } else { "" },
            self.created.len(),
            self.updated.len(),
            self.unchanged,
            self.boosts
        );
        if !self.unreadable.is_empty() {
            log::warn!("Unreadable toot files: {}", self.unreadable.join(", "));
        }
        if !self.failed.is_empty() {
            log::error!("Failed to write toots: {}", self.failed.join(", "));
        }
    }
}

/// Applies [`Decision`]s to a storage backend.
pub struct Reconciler<'a> {
    storage: &'a dyn TootStorage,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(storage: &'a dyn TootStorage) -> Self {
        Self {
            storage,
            dry_run: false,
        }
    }

    /// Decide everything but write nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    async fn stored(&self, id: &str, known: &HashSet<String>) -> Stored {
        if !known.contains(id) {
            return Stored::Missing;
        }
        match self.storage.load_toot(id).await {
            Ok(Some(saved)) => Stored::Found(saved),
            Ok(None) => Stored::Unreadable,
            Err(e) => {
                log::debug!("Reading toot {} failed: {}", id, e);
                Stored::Unreadable
            }
        }
    }

    /// Bring storage in line with `toots`.
    ///
    /// `known` is the set of ids stored before the run started.
    pub async fn reconcile(&self, known: &HashSet<String>, toots: &[Toot]) -> ReconcileReport {
        let mut report = ReconcileReport {
            dry_run: self.dry_run,
            ..ReconcileReport::default()
        };

        for toot in toots {
            let id = toot.id();
            let decision = if toot.is_boost() {
                Decision::SkipBoost
            } else {
                decide(toot, &self.stored(id, known).await)
            };

            match decision {
                Decision::SkipBoost => report.boosts += 1,
                Decision::Unchanged => report.unchanged += 1,
                Decision::Unreadable => {
                    log::warn!("Unable to read saved toot id {}", id);
                    report.unreadable.push(id.to_string());
                }
                Decision::Create | Decision::Update => {
                    let creating = decision == Decision::Create;
                    log::info!(
                        "{} toot id {}",
                        if creating { "Creating" } else { "Updating" },
                        id
                    );

                    if !self.dry_run {
                        if let Err(e) = self.storage.save_toot(toot).await {
                            log::error!("Failed to write toot {}: {}", id, e);
                            report.failed.push(id.to_string());
                            continue;
                        }
                    }

                    if creating {
                        report.created.push(id.to_string());
                    } else {
                        report.updated.push(id.to_string());
                    }
                }
            }
        }

        report
    }
}
