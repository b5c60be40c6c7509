//! EntityStore - Abstract storage for departments and courses.

use super::{GuardedDelete, StoreError};
use crate::domain::{Course, CourseId, Department, DepartmentFields, DepartmentId, NewDepartment};

/// Abstract storage for departments and courses.
///
/// Every method is a single atomic operation against the backend. Callers
/// never hold a store resource across calls.
pub trait EntityStore: Send + Sync {
    /// Get a department by ID. Returns None if not found.
    fn get_department(&self, id: DepartmentId) -> Result<Option<Department>, StoreError>;

    /// All departments, ordered by ID.
    fn list_departments(&self) -> Result<Vec<Department>, StoreError>;

    /// Insert a new department. The store assigns the ID; version starts at 1.
    fn insert_department(&self, fields: &NewDepartment) -> Result<Department, StoreError>;

    /// Persist `fields` and bump the version to `expected_version + 1`, but
    /// only where `department_id = id AND version = expected_version`.
    ///
    /// Returns `None` when no row was affected, without saying whether the
    /// row is missing or its version moved on.
    fn update_department_if_version(
        &self,
        id: DepartmentId,
        expected_version: u64,
        fields: &DepartmentFields,
    ) -> Result<Option<Department>, StoreError>;

    /// Delete a department only if no course references it. The dependency
    /// count and the delete happen as one unit, so no course insert can land
    /// in between.
    fn delete_department_unreferenced(&self, id: DepartmentId) -> Result<GuardedDelete, StoreError>;

    /// Number of courses whose department is `department_id`.
    fn count_courses_for(&self, department_id: DepartmentId) -> Result<u64, StoreError>;

    /// Insert a course. Fails with `MissingReference` if its department does
    /// not exist and with `Duplicate` if the course ID is taken.
    fn insert_course(&self, course: &Course) -> Result<Course, StoreError>;

    /// Get a course by ID. Returns None if not found.
    fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    /// Courses ordered by ID, optionally restricted to one department.
    fn list_courses(&self, department_id: Option<DepartmentId>) -> Result<Vec<Course>, StoreError>;

    /// Delete a course by ID. Returns true if it existed.
    fn delete_course(&self, id: CourseId) -> Result<bool, StoreError>;
}
