//! Registry - the mutation orchestrator and public operation surface.
//!
//! `Registry<S>` owns an entity store handle and is the only caller of the
//! store's conditional primitives. Department updates go through the
//! [`ConcurrencyGuard`], department deletes through the [`DeletionGuard`].
//! The remaining operations are plain pass-through CRUD.
//!
//! ## Example
//!
//! ```ignore
//! use academic_registry::{InMemoryEntityStore, Registry, UpdateDepartment, UpdateOutcome};
//!
//! let registry = Registry::new(InMemoryEntityStore::new());
//! let dept = registry.create_department(fields)?;
//!
//! match registry.update_department(dept.department_id, UpdateDepartment::new(new_fields, dept.version))? {
//!     UpdateOutcome::Updated(d) => println!("now at version {}", d.version),
//!     UpdateOutcome::Conflict(current) => { /* show "yours vs. current" */ }
//!     UpdateOutcome::NotFound(_) => { /* gone */ }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Course, CourseId, Department, DepartmentFields, DepartmentId, NewDepartment};
use crate::error::RegistryError;
use crate::guard::{ConcurrencyGuard, DeleteOutcome, DeletionGuard, UpdateOutcome};
use crate::store::EntityStore;
use crate::validation::{check_version, sanitize_course, sanitize_department};

/// A department update request: the full field set plus the version the
/// caller last observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDepartment {
    #[serde(flatten)]
    pub fields: DepartmentFields,
    pub version: u64,
}

impl UpdateDepartment {
    pub fn new(fields: DepartmentFields, version: u64) -> Self {
        Self { fields, version }
    }
}

/// Orchestrates guarded mutations over an [`EntityStore`].
///
/// Never retries a conflict or a blocked delete; both are returned to the
/// caller as tagged outcomes.
pub struct Registry<S> {
    store: S,
}

impl<S: EntityStore> Registry<S> {
    /// Create a registry over an explicitly constructed store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // =========================================================================
    // Guarded mutations
    // =========================================================================

    /// Update a department if `request.version` is still the stored version.
    ///
    /// Input is sanitized first; a validation failure never reaches the
    /// store. Validation and store failures are the only `Err`; every other
    /// outcome is a variant of [`UpdateOutcome`].
    pub fn update_department(
        &self,
        id: DepartmentId,
        request: UpdateDepartment,
    ) -> Result<UpdateOutcome, RegistryError> {
        let version = check_version(request.version)?;
        let fields = sanitize_department(request.fields)?;

        let outcome = ConcurrencyGuard::new(&self.store).update(id, version, &fields)?;
        match &outcome {
            UpdateOutcome::Updated(d) => {
                tracing::info!(department_id = id, version = d.version, "department updated");
            }
            UpdateOutcome::Conflict(current) => {
                tracing::info!(
                    department_id = id,
                    submitted_version = version,
                    current_version = current.version,
                    "department update rejected: version conflict"
                );
            }
            UpdateOutcome::NotFound(_) => {
                tracing::debug!(department_id = id, "department update: not found");
            }
        }
        Ok(outcome)
    }

    /// Delete a department unless courses still reference it.
    pub fn delete_department(&self, id: DepartmentId) -> Result<DeleteOutcome, RegistryError> {
        let outcome = DeletionGuard::new(&self.store).delete(id)?;
        match &outcome {
            DeleteOutcome::Deleted(_) => {
                tracing::info!(department_id = id, "department deleted");
            }
            DeleteOutcome::Blocked { course_count, .. } => {
                tracing::info!(
                    department_id = id,
                    course_count,
                    "department delete blocked by existing courses"
                );
            }
            DeleteOutcome::NotFound(_) => {
                tracing::debug!(department_id = id, "department delete: not found");
            }
        }
        Ok(outcome)
    }

    // =========================================================================
    // Pass-through CRUD
    // =========================================================================

    pub fn create_department(&self, fields: NewDepartment) -> Result<Department, RegistryError> {
        let fields = sanitize_department(fields)?;
        let department = self.store.insert_department(&fields)?;
        tracing::info!(
            department_id = department.department_id,
            version = department.version,
            "department created"
        );
        Ok(department)
    }

    pub fn get_department(&self, id: DepartmentId) -> Result<Department, RegistryError> {
        tracing::debug!(department_id = id, "get department");
        self.store
            .get_department(id)?
            .ok_or_else(|| RegistryError::department_not_found(id))
    }

    pub fn list_departments(&self) -> Result<Vec<Department>, RegistryError> {
        Ok(self.store.list_departments()?)
    }

    pub fn create_course(&self, course: Course) -> Result<Course, RegistryError> {
        let course = sanitize_course(course)?;
        let course = self.store.insert_course(&course)?;
        tracing::info!(
            course_id = course.course_id,
            department_id = course.department_id,
            "course created"
        );
        Ok(course)
    }

    pub fn get_course(&self, id: CourseId) -> Result<Course, RegistryError> {
        self.store
            .get_course(id)?
            .ok_or_else(|| RegistryError::course_not_found(id))
    }

    pub fn list_courses(
        &self,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Course>, RegistryError> {
        Ok(self.store.list_courses(department_id)?)
    }

    pub fn delete_course(&self, id: CourseId) -> Result<CourseId, RegistryError> {
        if !self.store.delete_course(id)? {
            return Err(RegistryError::course_not_found(id));
        }
        tracing::info!(course_id = id, "course deleted");
        Ok(id)
    }
}
