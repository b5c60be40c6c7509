//! InMemoryEntityStore - BTreeMap-backed entity store for testing and development.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{EntityStore, GuardedDelete, StoreError};
use crate::domain::{Course, CourseId, Department, DepartmentFields, DepartmentId, NewDepartment};

/// Both tables live behind one lock so that cross-table checks (course
/// count before a department delete, department existence before a course
/// insert) are atomic with the write that depends on them.
#[derive(Default)]
struct Tables {
    departments: BTreeMap<DepartmentId, Department>,
    courses: BTreeMap<CourseId, Course>,
    last_department_id: DepartmentId,
}

impl Tables {
    fn course_count(&self, department_id: DepartmentId) -> u64 {
        self.courses
            .values()
            .filter(|c| c.department_id == department_id)
            .count() as u64
    }
}

/// In-memory entity store.
///
/// Clone-friendly via Arc; clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryEntityStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEntityStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn write(&self, operation: &'static str) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }
}

impl EntityStore for InMemoryEntityStore {
    fn get_department(&self, id: DepartmentId) -> Result<Option<Department>, StoreError> {
        let tables = self.read("get_department")?;
        Ok(tables.departments.get(&id).cloned())
    }

    fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let tables = self.read("list_departments")?;
        Ok(tables.departments.values().cloned().collect())
    }

    fn insert_department(&self, fields: &NewDepartment) -> Result<Department, StoreError> {
        let mut tables = self.write("insert_department")?;

        tables.last_department_id += 1;
        let department = Department {
            department_id: tables.last_department_id,
            fields: fields.clone(),
            version: Department::INITIAL_VERSION,
        };
        tables
            .departments
            .insert(department.department_id, department.clone());

        Ok(department)
    }

    fn update_department_if_version(
        &self,
        id: DepartmentId,
        expected_version: u64,
        fields: &DepartmentFields,
    ) -> Result<Option<Department>, StoreError> {
        let mut tables = self.write("update_department_if_version")?;

        match tables.departments.get_mut(&id) {
            Some(stored) if stored.version == expected_version => {
                stored.fields = fields.clone();
                stored.version = expected_version + 1;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    fn delete_department_unreferenced(&self, id: DepartmentId) -> Result<GuardedDelete, StoreError> {
        let mut tables = self.write("delete_department_unreferenced")?;

        if !tables.departments.contains_key(&id) {
            return Ok(GuardedDelete::Missing);
        }

        let referencing = tables.course_count(id);
        if referencing > 0 {
            return Ok(GuardedDelete::Referenced(referencing));
        }

        tables.departments.remove(&id);
        Ok(GuardedDelete::Deleted)
    }

    fn count_courses_for(&self, department_id: DepartmentId) -> Result<u64, StoreError> {
        let tables = self.read("count_courses_for")?;
        Ok(tables.course_count(department_id))
    }

    fn insert_course(&self, course: &Course) -> Result<Course, StoreError> {
        let mut tables = self.write("insert_course")?;

        if !tables.departments.contains_key(&course.department_id) {
            return Err(StoreError::missing_reference::<Department>(
                course.department_id,
            ));
        }
        if tables.courses.contains_key(&course.course_id) {
            return Err(StoreError::duplicate::<Course>(course.course_id));
        }

        tables.courses.insert(course.course_id, course.clone());
        Ok(course.clone())
    }

    fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let tables = self.read("get_course")?;
        Ok(tables.courses.get(&id).cloned())
    }

    fn list_courses(&self, department_id: Option<DepartmentId>) -> Result<Vec<Course>, StoreError> {
        let tables = self.read("list_courses")?;
        Ok(tables
            .courses
            .values()
            .filter(|c| department_id.map_or(true, |d| c.department_id == d))
            .cloned()
            .collect())
    }

    fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        let mut tables = self.write("delete_course")?;
        Ok(tables.courses.remove(&id).is_some())
    }
}
