//! Sharded in-memory record store.

use super::{RecordKind, StoreError, StoreRecord, StoreResult, UpsertOutcome, Versioned};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mockable::{Clock, DefaultClock};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    kind: RecordKind,
    key: String,
}

impl RecordKey {
    fn new(kind: RecordKind, key: &str) -> Self {
        Self {
            kind,
            key: key.to_owned(),
        }
    }
}

struct StoredEntry {
    record: Arc<dyn Any + Send + Sync>,
    identity: String,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredEntry {
    fn typed<R: StoreRecord>(&self) -> Option<Versioned<R>> {
        self.record.downcast_ref::<R>().map(|record| {
            Versioned::new(
                record.clone(),
                self.identity.clone(),
                self.version,
                self.created_at,
                self.updated_at,
            )
        })
    }
}

/// Concurrent record store with identity-checked, versioned upserts.
///
/// Backed by a sharded map: each operation locks only the shard holding its
/// key, so registrations for distinct keys proceed in parallel and reads
/// never wait on an unrelated write.
pub struct RecordStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    entries: DashMap<RecordKey, StoredEntry>,
    clock: Arc<C>,
    closed: AtomicBool,
}

impl RecordStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn with_default_clock() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl Default for RecordStore<DefaultClock> {
    fn default() -> Self {
        Self::with_default_clock()
    }
}

impl<C> fmt::Debug for RecordStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("entries", &self.entries.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<C> RecordStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping entries with `clock`.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            closed: AtomicBool::new(false),
        }
    }

    /// Inserts or replaces the record at `key` on behalf of `identity`.
    ///
    /// A vacant key is created at version 1. An occupied key owned by the
    /// same identity is replaced and its version incremented.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the key is owned by another
    /// identity, or [`StoreError::Closed`] after [`RecordStore::close`].
    pub fn upsert<R: StoreRecord>(
        &self,
        key: &str,
        record: R,
        identity: &str,
    ) -> StoreResult<UpsertOutcome> {
        self.ensure_open()?;
        let now = self.clock.utc();

        let entry = self.entries.entry(RecordKey::new(R::KIND, key));
        // Shard lock held: `close` sets the flag before clearing this shard.
        self.ensure_open()?;
        match entry {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.identity != identity {
                    return Err(StoreError::Conflict {
                        kind: R::KIND,
                        key: key.to_owned(),
                        owner: entry.identity.clone(),
                        attempted: identity.to_owned(),
                    });
                }
                entry.record = Arc::new(record);
                entry.version = entry.version.saturating_add(1);
                entry.updated_at = now;
                Ok(UpsertOutcome::Updated {
                    version: entry.version,
                })
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredEntry {
                    record: Arc::new(record),
                    identity: identity.to_owned(),
                    version: 1,
                    created_at: now,
                    updated_at: now,
                });
                Ok(UpsertOutcome::Created)
            }
        }
    }

    /// Replaces the record at `key` with `apply(current)` under the shard
    /// lock, so no concurrent write interleaves between read and write.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when `identity` does not own the key,
    /// or [`StoreError::Closed`] after [`RecordStore::close`].
    pub fn update<R, F>(
        &self,
        key: &str,
        identity: &str,
        apply: F,
    ) -> StoreResult<Option<Versioned<R>>>
    where
        R: StoreRecord,
        F: FnOnce(&R) -> R,
    {
        self.ensure_open()?;
        let Some(mut entry) = self.entries.get_mut(&RecordKey::new(R::KIND, key)) else {
            return Ok(None);
        };
        self.ensure_open()?;
        if entry.identity != identity {
            return Err(StoreError::Conflict {
                kind: R::KIND,
                key: key.to_owned(),
                owner: entry.identity.clone(),
                attempted: identity.to_owned(),
            });
        }
        let Some(current) = entry.record.downcast_ref::<R>() else {
            return Ok(None);
        };
        let next = apply(current);
        entry.record = Arc::new(next);
        entry.version = entry.version.saturating_add(1);
        entry.updated_at = self.clock.utc();
        Ok(entry.typed::<R>())
    }

    /// Returns the record stored at `key`, if any.
    #[must_use]
    pub fn get<R: StoreRecord>(&self, key: &str) -> Option<R> {
        self.get_versioned::<R>(key).map(Versioned::into_record)
    }

    /// Returns the record at `key` with its ownership metadata.
    #[must_use]
    pub fn get_versioned<R: StoreRecord>(&self, key: &str) -> Option<Versioned<R>> {
        self.entries
            .get(&RecordKey::new(R::KIND, key))
            .and_then(|entry| entry.typed::<R>())
    }

    /// Returns every record of type `R` accepted by `predicate`.
    ///
    /// Order is unspecified; callers sort when they need determinism.
    pub fn list<R, P>(&self, predicate: P) -> Vec<R>
    where
        R: StoreRecord,
        P: Fn(&R) -> bool,
    {
        self.list_versioned::<R, _>(predicate)
            .into_iter()
            .map(Versioned::into_record)
            .collect()
    }

    /// Returns every record of type `R` accepted by `predicate`, with
    /// metadata.
    pub fn list_versioned<R, P>(&self, predicate: P) -> Vec<Versioned<R>>
    where
        R: StoreRecord,
        P: Fn(&R) -> bool,
    {
        self.entries
            .iter()
            .filter(|item| item.key().kind == R::KIND)
            .filter_map(|item| item.value().typed::<R>())
            .filter(|versioned| predicate(versioned.record()))
            .collect()
    }

    /// Removes the record at `key`.
    ///
    /// When `identity` is given the removal only succeeds for the owning
    /// identity; `None` removes unconditionally. Returns `Ok(None)` when the
    /// key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when `identity` does not own the key.
    pub fn remove<R: StoreRecord>(
        &self,
        key: &str,
        identity: Option<&str>,
    ) -> StoreResult<Option<R>> {
        let record_key = RecordKey::new(R::KIND, key);
        let removed = match identity {
            Some(expected) => self
                .entries
                .remove_if(&record_key, |_, entry| entry.identity == expected),
            None => self.entries.remove(&record_key),
        };

        if let Some((_, entry)) = removed {
            return Ok(entry.record.downcast_ref::<R>().cloned());
        }

        match (identity, self.entries.get(&record_key)) {
            (Some(attempted), Some(existing)) => Err(StoreError::Conflict {
                kind: R::KIND,
                key: key.to_owned(),
                owner: existing.identity.clone(),
                attempted: attempted.to_owned(),
            }),
            _ => Ok(None),
        }
    }

    /// Returns the number of records in `kind`'s namespace.
    #[must_use]
    pub fn count(&self, kind: RecordKind) -> usize {
        self.entries
            .iter()
            .filter(|item| item.key().kind == kind)
            .count()
    }

    /// Drops every record. The store stays open.
    pub fn reset(&self) {
        self.entries.clear();
    }

    /// Drops every record and rejects further writes.
    ///
    /// Writers re-check the flag while holding their shard lock, so a write
    /// racing with `close` is either rejected or cleared.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.entries.clear();
    }

    /// Returns whether [`RecordStore::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Returns the current time from the store's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}
