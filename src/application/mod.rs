//! Application layer: snapshot intake, live synchronization and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod services;
pub mod snapshot;
pub mod sync;

pub use error::{ApplicationError, ApplicationResult};
pub use snapshot::{parse_snapshot, SnapshotError};
pub use sync::{
    ConnectionStatus, LiveTreeSync, RetentionPolicy, SyncEvent, SyncOptions, TransportEvent,
};
