//! Memoized lookup tables for small, rarely-changing collections.
//!
//! Continents, countries, leagues and bookmakers are cheap to fetch in full and
//! are often looked up by id. A resource family that can index such collections
//! implements [`SupportsLookup`]; the indexed tables are kept in a [`LookupCache`]
//! that the caller creates, shares and invalidates explicitly.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::Result;
use crate::error::Error;
use crate::normalize::{Object, json_type};
use crate::request::Includes;

/// Default number of tables a [`LookupCache`] keeps.
pub const DEFAULT_CAPACITY: usize = 32;

/// Collections that can be indexed by id.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LookupKind {
    Continent,
    Country,
    League,
    Bookmaker,
}

/// Canonical cache key: the collection and the sorted includes it was fetched with.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub kind: LookupKind,
    pub includes: Includes,
}

impl LookupKey {
    #[must_use]
    pub fn new<I: Into<Includes>>(kind: LookupKind, includes: I) -> Self {
        Self {
            kind,
            includes: includes.into(),
        }
    }
}

/// Records of one collection, by id.
pub type LookupTable = HashMap<u64, Object>;

#[derive(Debug)]
struct Entry {
    table: Arc<LookupTable>,
    inserted: u64,
}

/// Bounded cache of [`LookupTable`]s. When full, the oldest table is evicted.
#[derive(Debug)]
pub struct LookupCache {
    capacity: usize,
    entries: DashMap<LookupKey, Entry>,
    clock: AtomicU64,
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LookupCache {
    /// A cache holding at most `capacity` tables; `0` disables caching.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: DashMap::new(),
            clock: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &LookupKey) -> Option<Arc<LookupTable>> {
        self.entries.get(key).map(|entry| Arc::clone(&entry.table))
    }

    /// Stores `table` under `key` and returns the shared handle.
    pub fn insert(&self, key: LookupKey, table: LookupTable) -> Arc<LookupTable> {
        let table = Arc::new(table);
        if self.capacity == 0 {
            return table;
        }

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|entry| entry.value().inserted)
                    .map(|entry| entry.key().clone());
                match oldest {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        let inserted = self.clock.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key,
            Entry {
                table: Arc::clone(&table),
                inserted,
            },
        );
        table
    }

    /// Drops the table stored under `key`, if any.
    pub fn invalidate(&self, key: &LookupKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every table of `kind`, whatever includes it was fetched with.
    pub fn invalidate_kind(&self, kind: LookupKind) {
        self.entries.retain(|key, _| key.kind != kind);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Indexes records by their numeric `id`.
pub fn index_by_id(records: Vec<Value>) -> Result<LookupTable> {
    records
        .into_iter()
        .map(|record| match record {
            Value::Object(map) => {
                let id = map.get("id").and_then(Value::as_u64).ok_or_else(|| {
                    Error::schema("lookup record without a numeric `id`")
                })?;
                Ok((id, map))
            }
            other => Err(Error::schema(format!(
                "lookup records must be objects, got {}",
                json_type(&other)
            ))),
        })
        .collect()
}

/// A resource family whose collections can be served from a [`LookupCache`].
#[async_trait]
pub trait SupportsLookup: Sync {
    /// Fetches every record of `kind`, normalized.
    async fn fetch_collection(&self, kind: LookupKind, includes: &Includes) -> Result<Vec<Value>>;

    /// The cache tables are memoized in; `None` fetches on every call.
    fn lookup_cache(&self) -> Option<&LookupCache>;

    /// Returns the indexed table for `kind`, from the cache when present.
    async fn lookup_table(&self, kind: LookupKind, includes: &Includes) -> Result<Arc<LookupTable>> {
        let key = LookupKey::new(kind, includes);

        if let Some(table) = self.lookup_cache().and_then(|cache| cache.get(&key)) {
            #[cfg(feature = "tracing")]
            tracing::trace!(kind = %kind, includes = %includes, "cache hit: lookup table");
            return Ok(table);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(kind = %kind, includes = %includes, "cache miss: lookup table");

        let table = index_by_id(self.fetch_collection(kind, includes).await?)?;

        Ok(match self.lookup_cache() {
            Some(cache) => cache.insert(key, table),
            None => Arc::new(table),
        })
    }

    /// Returns the record of `kind` with `id`, or `None` when there is no such record.
    async fn lookup(&self, kind: LookupKind, id: u64, includes: &Includes) -> Result<Option<Object>> {
        let table = self.lookup_table(kind, includes).await?;
        Ok(table.get(&id).cloned())
    }
}
