//! In-memory table implementation using `DashMap`.
//!
//! This is the default backend - data is lost on process restart.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use super::{Entity, Table};
use crate::Result;

/// In-memory table using a lock-free concurrent hashmap.
///
/// Thread-safe and optimized for high-concurrency read/write workloads.
/// Ids come from an atomic sequence and are never reused, even after a
/// delete.
///
/// # Example
///
/// ```rust
/// use triangler::table::{MemoryTable, Table};
///
/// # fn example() -> triangler::Result<()> {
/// let table = MemoryTable::new();
/// let row = table.insert("hello")?;
/// assert_eq!(table.get(row.id())?.map(|e| *e.record()), Some("hello"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct MemoryTable<T> {
    rows: DashMap<u64, Entity<T>, FxBuildHasher>,
    next_id: AtomicU64,
}

impl<T> MemoryTable<T> {
    /// Create a new in-memory table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            next_id: AtomicU64::new(1),
        }
    }

    /// Clear all rows. The id sequence keeps counting.
    pub fn clear(&self) {
        self.rows.clear();
    }
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> Table<T> for MemoryTable<T> {
    fn insert(&self, record: T) -> Result<Entity<T>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entity = Entity::new(id, record);
        self.rows.insert(id, entity.clone());
        Ok(entity)
    }

    fn get(&self, id: u64) -> Result<Option<Entity<T>>> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    fn update(&self, id: u64, record: T) -> Result<Option<Entity<T>>> {
        Ok(self.rows.get_mut(&id).map(|mut row| {
            row.replace(record);
            row.value().clone()
        }))
    }

    fn modify<F>(&self, id: u64, change: F) -> Result<Option<Entity<T>>>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let Some(mut row) = self.rows.get_mut(&id) else {
            return Ok(None);
        };
        let mut record = row.record().clone();
        change(&mut record)?;
        row.replace(record);
        Ok(Some(row.value().clone()))
    }

    fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.rows.remove(&id).is_some())
    }

    fn all(&self) -> Result<Vec<Entity<T>>> {
        let mut rows: Vec<Entity<T>> = self.rows.iter().map(|row| row.value().clone()).collect();
        rows.sort_by_key(Entity::id);
        Ok(rows)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.rows.len())
    }
}
