//! DeletionGuard - refuses to delete a department that still has courses.

use crate::domain::DepartmentId;
use crate::error::RegistryError;
use crate::store::{EntityStore, GuardedDelete, StoreError};

/// Tagged outcome of a guarded department delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The department row is gone.
    Deleted(DepartmentId),
    /// No department with that id exists.
    NotFound(DepartmentId),
    /// Courses still reference the department. Nothing was mutated.
    Blocked {
        department_id: DepartmentId,
        course_count: u64,
    },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted(_))
    }

    /// Convert to a `Result`, mapping the failure tags to [`RegistryError`].
    pub fn into_result(self) -> Result<DepartmentId, RegistryError> {
        match self {
            DeleteOutcome::Deleted(id) => Ok(id),
            DeleteOutcome::NotFound(id) => Err(RegistryError::department_not_found(id)),
            DeleteOutcome::Blocked {
                department_id,
                course_count,
            } => Err(RegistryError::DependencyExists {
                department_id,
                course_count,
            }),
        }
    }
}

/// Wraps an [`EntityStore`] with a referential-integrity check for
/// department deletes.
///
/// The dependency count and the delete are a single store primitive, so a
/// course inserted concurrently either lands before the check (and blocks
/// the delete) or fails because its department is gone.
pub struct DeletionGuard<'a, S> {
    store: &'a S,
}

impl<'a, S: EntityStore> DeletionGuard<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn delete(&self, id: DepartmentId) -> Result<DeleteOutcome, StoreError> {
        let outcome = match self.store.delete_department_unreferenced(id)? {
            GuardedDelete::Deleted => DeleteOutcome::Deleted(id),
            GuardedDelete::Missing => DeleteOutcome::NotFound(id),
            GuardedDelete::Referenced(course_count) => DeleteOutcome::Blocked {
                department_id: id,
                course_count,
            },
        };
        Ok(outcome)
    }
}
