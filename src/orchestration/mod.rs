//! Background jobs: snapshot polling and history retention.

pub mod poller;
pub mod retention;

pub use poller::{CycleReport, HttpSnapshotFeed, PollError, Poller, Snapshot, SnapshotFeed};
pub use retention::RetentionSweeper;
