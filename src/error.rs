use thiserror::Error;

use crate::domain::{Course, Department, DepartmentId, Record};
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Errors surfaced by [`Registry`](crate::Registry) operations.
///
/// None of these are retried inside the crate. Each one needs a new
/// decision from the caller: a fresh version, removing dependents, or
/// fixing the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The target row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    /// The submitted version is stale. `current` is the authoritative record.
    #[error(
        "department {} was modified by another user (current version {})",
        .current.department_id,
        .current.version
    )]
    ConcurrencyConflict { current: Box<Department> },
    /// Courses still reference the department.
    #[error("cannot delete department with existing courses")]
    DependencyExists {
        department_id: DepartmentId,
        course_count: u64,
    },
    /// Malformed input, rejected before reaching the guards.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn department_not_found(id: DepartmentId) -> Self {
        Self::not_found::<Department>(id)
    }

    pub fn course_not_found(id: i64) -> Self {
        Self::not_found::<Course>(id)
    }

    fn not_found<R: Record>(id: i64) -> Self {
        RegistryError::NotFound {
            entity: singular(R::COLLECTION),
            id,
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::NotFound { .. } => 404,
            RegistryError::ConcurrencyConflict { .. } => 409,
            RegistryError::DependencyExists { .. } => 400,
            RegistryError::Validation(_) => 400,
            RegistryError::Store(StoreError::Duplicate { .. }) => 409,
            RegistryError::Store(StoreError::MissingReference { .. }) => 404,
            RegistryError::Store(_) => 500,
        }
    }
}

fn singular(collection: &'static str) -> &'static str {
    collection.strip_suffix('s').unwrap_or(collection)
}
