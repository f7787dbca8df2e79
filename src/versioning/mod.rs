//! Append-only version chains shared by every per-client record kind.

pub mod kind;
pub mod record;
mod repo;
pub mod store;

pub use kind::{EditPolicy, RecordKind};
pub use record::{Versioned, VersionedRecord};
pub use store::RecordStore;
