//! Shared record store backing every registry.
//!
//! The store is a concurrent map keyed by `(RecordKind, key)` holding
//! versioned values. It is the only shared mutable state in the crate: each
//! registry owns a disjoint [`RecordKind`] namespace inside one store
//! instance, which is created once and passed to every registry constructor.
//!
//! Upserts enforce identity-based ownership: a key first written by one
//! identity can only be replaced by that identity. Locking is per shard, so
//! a writer never blocks readers of unrelated keys.

mod error;
mod memory;
mod record;

pub use error::{StoreError, StoreResult};
pub use memory::RecordStore;
pub use record::{RecordKind, Registered, StoreRecord, UpsertOutcome, Versioned};
