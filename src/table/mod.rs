//! Record tables
//!
//! Provides a small typed table abstraction used by the experiment store and
//! the user directory:
//! - Auto-incrementing `u64` primary keys starting at 1
//! - `created_at`/`updated_at` bookkeeping via [`Entity`]
//! - Lock-free in-memory backend
//!
//! # Example
//!
//! ```rust
//! use triangler::table::{MemoryTable, Table};
//!
//! # fn example() -> triangler::Result<()> {
//! let table = MemoryTable::new();
//!
//! let row = table.insert("first".to_string())?;
//! assert_eq!(row.id(), 1);
//! assert_eq!(table.get(1)?.map(|e| e.into_record()), Some("first".to_string()));
//!
//! assert!(table.delete(1)?);
//! assert!(table.is_empty()?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod entity;
mod memory;

pub use entity::Entity;
pub use memory::MemoryTable;

use crate::Result;

/// Typed table of records keyed by a generated id.
///
/// Fallible so that non-memory backends can report I/O failures.
pub trait Table<T>: Send + Sync {
    /// Store a new record under the next id.
    fn insert(&self, record: T) -> Result<Entity<T>>;

    /// Get a row by id.
    ///
    /// Returns `None` if the id doesn't exist.
    fn get(&self, id: u64) -> Result<Option<Entity<T>>>;

    /// Replace the record stored under `id`.
    ///
    /// Returns `None` (and stores nothing) if the id doesn't exist.
    fn update(&self, id: u64, record: T) -> Result<Option<Entity<T>>>;

    /// Change the record stored under `id` in place.
    ///
    /// `change` works on a copy while the row is locked; the copy is stored
    /// only if it returns `Ok`. Concurrent writers to the same row are
    /// serialized, so none of their changes is lost. `change` must not
    /// access the same table.
    ///
    /// Returns `None` if the id doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns the error from `change`; the row is left untouched then.
    fn modify<F>(&self, id: u64, change: F) -> Result<Option<Entity<T>>>
    where
        F: FnOnce(&mut T) -> Result<()>;

    /// Delete a row.
    ///
    /// Returns whether a row was removed.
    fn delete(&self, id: u64) -> Result<bool>;

    /// All rows, ordered by id.
    fn all(&self) -> Result<Vec<Entity<T>>>;

    /// Number of rows.
    fn len(&self) -> Result<usize>;

    /// Rows whose record matches `predicate`, ordered by id.
    fn filter<F>(&self, predicate: F) -> Result<Vec<Entity<T>>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self
            .all()?
            .into_iter()
            .filter(|entity| predicate(entity.record()))
            .collect())
    }

    /// Check if the table has no rows.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
