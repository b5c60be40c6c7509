//! ConcurrencyGuard - compare-and-set updates keyed on the department version.

use crate::domain::{Department, DepartmentFields, DepartmentId};
use crate::error::RegistryError;
use crate::store::{EntityStore, StoreError};

/// Tagged outcome of a versioned update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The write applied. Carries the stored record with its new version.
    Updated(Department),
    /// No department with that id exists.
    NotFound(DepartmentId),
    /// The stored version differs from the caller's. Carries the server's
    /// current record, never the submitted values.
    Conflict(Department),
}

impl UpdateOutcome {
    /// Convert to a `Result`, mapping the failure tags to [`RegistryError`].
    pub fn into_result(self) -> Result<Department, RegistryError> {
        match self {
            UpdateOutcome::Updated(department) => Ok(department),
            UpdateOutcome::NotFound(id) => Err(RegistryError::department_not_found(id)),
            UpdateOutcome::Conflict(current) => Err(RegistryError::ConcurrencyConflict {
                current: Box::new(current),
            }),
        }
    }
}

/// Wraps an [`EntityStore`] with optimistic concurrency control for
/// department updates.
///
/// This is a compare-and-swap, not a lock: no caller ever holds the row.
/// Of several callers racing on the same expected version exactly one
/// wins; the rest see [`UpdateOutcome::Conflict`].
pub struct ConcurrencyGuard<'a, S> {
    store: &'a S,
}

impl<'a, S: EntityStore> ConcurrencyGuard<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Apply `fields` if the stored version still equals `expected_version`.
    pub fn update(
        &self,
        id: DepartmentId,
        expected_version: u64,
        fields: &DepartmentFields,
    ) -> Result<UpdateOutcome, StoreError> {
        if let Some(updated) = self
            .store
            .update_department_if_version(id, expected_version, fields)?
        {
            return Ok(UpdateOutcome::Updated(updated));
        }

        // Zero rows affected: either the row is gone or another writer
        // moved the version on. Only a fresh read can tell which.
        match self.store.get_department(id)? {
            None => Ok(UpdateOutcome::NotFound(id)),
            Some(current) => {
                tracing::debug!(
                    department_id = id,
                    expected_version,
                    current_version = current.version,
                    "conditional update affected no rows"
                );
                Ok(UpdateOutcome::Conflict(current))
            }
        }
    }
}
