pub mod accounting;
pub mod growth;
pub mod snapshot;

pub use snapshot::{SkipReason, SnapshotOutcome, SnapshotRecorder};
