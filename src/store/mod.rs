//! Entity store - durable keyed storage for departments and courses.
//!
//! The store is the only component that owns atomicity. It exposes two
//! conditional primitives that the guards build on:
//!
//! - [`EntityStore::update_department_if_version`]: compare-and-set on the
//!   department's version column.
//! - [`EntityStore::delete_department_unreferenced`]: dependency count and
//!   delete evaluated as one unit.
//!
//! Handles are explicitly constructed and cheap to clone; clones share the
//! same underlying storage.
//!
//! ## Example
//!
//! ```ignore
//! use academic_registry::{EntityStore, InMemoryEntityStore};
//!
//! let store = InMemoryEntityStore::new();
//! let dept = store.insert_department(&fields)?;
//! let updated = store.update_department_if_version(dept.department_id, 1, &new_fields)?;
//! ```

mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

use thiserror::Error;

use crate::domain::Record;

/// Result of a guarded department delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedDelete {
    /// The department row was removed.
    Deleted,
    /// No department with that id exists.
    Missing,
    /// The department is still referenced by this many courses; nothing changed.
    Referenced(u64),
}

/// Error type for entity store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A row with the same primary key already exists.
    #[error("{collection}:{id} already exists")]
    Duplicate { collection: &'static str, id: i64 },
    /// A foreign key points at a row that does not exist.
    #[error("referenced {collection}:{id} does not exist")]
    MissingReference { collection: &'static str, id: i64 },
    /// The store's internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Backend-specific failure (I/O, SQL, corrupt row).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn duplicate<R: Record>(id: i64) -> Self {
        StoreError::Duplicate {
            collection: R::COLLECTION,
            id,
        }
    }

    pub fn missing_reference<R: Record>(id: i64) -> Self {
        StoreError::MissingReference {
            collection: R::COLLECTION,
            id,
        }
    }
}

pub use in_memory::InMemoryEntityStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEntityStore;
pub use store::EntityStore;
