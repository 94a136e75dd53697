//! Pipeline entry points for sync operations.
//!
//! - `run_sync`: Fetch toots and reconcile them into the content directory
//! - `run_fetch`: Fetch toots into JSON snapshots
//! - `run_render`: Reconcile JSON snapshots into the content directory

pub mod reconcile;
pub mod sync;
pub mod transform;

pub use reconcile::{Decision, ReconcileReport, Reconciler, Stored, decide};
pub use sync::{SyncSummary, run_fetch, run_render, run_sync};
pub use transform::Transformer;
