pub mod config;
mod deadline;
mod snapshot;

pub use deadline::DeadlineProvider;
pub use snapshot::SnapshotProvider;
