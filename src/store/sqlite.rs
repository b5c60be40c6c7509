//! SqliteEntityStore - rusqlite-backed entity store.
//!
//! The version check is the `WHERE` clause of a single `UPDATE`. The
//! `courses.department_id` foreign key is `ON DELETE RESTRICT`, so the engine
//! itself refuses a delete that would orphan a course; that violation is
//! reported as [`GuardedDelete::Referenced`] with the course count read in
//! the same `BEGIN IMMEDIATE` transaction.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};

use super::{EntityStore, GuardedDelete, StoreError};
use crate::domain::{Course, CourseId, Department, DepartmentFields, DepartmentId, NewDepartment};

const DEPARTMENT_COLUMNS: &str =
    "department_id, name, budget, start_date, instructor_id, version";
const COURSE_COLUMNS: &str = "course_id, title, credits, department_id";

/// SQLite entity store.
///
/// Holds one connection behind a mutex. Each operation acquires it for its
/// own duration and releases it on return. Clones share the connection.
#[derive(Clone)]
pub struct SqliteEntityStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEntityStore {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS departments (
            department_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            budget REAL NOT NULL,
            start_date TEXT NOT NULL,
            instructor_id INTEGER,
            version INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS courses (
            course_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            credits INTEGER NOT NULL,
            department_id INTEGER NOT NULL,
            FOREIGN KEY (department_id) REFERENCES departments(department_id) ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_courses_department
        ON courses(department_id);
    ";

    /// Open or create a store database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::Backend(format!("failed to open database at {}: {e}", path.display()))
        })?;
        Self::initialize(conn)
    }

    /// Open a private in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA synchronous=FULL;")?;
        conn.execute_batch(Self::SCHEMA)?;
        tracing::debug!("sqlite entity store schema ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn acquire(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }
}

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    let version: i64 = row.get(5)?;
    Ok(Department {
        department_id: row.get(0)?,
        fields: DepartmentFields {
            name: row.get(1)?,
            budget: row.get(2)?,
            start_date: row.get(3)?,
            instructor_id: row.get(4)?,
        },
        version: version as u64,
    })
}

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        course_id: row.get(0)?,
        title: row.get(1)?,
        credits: row.get(2)?,
        department_id: row.get(3)?,
    })
}

fn select_department(conn: &Connection, id: DepartmentId) -> rusqlite::Result<Option<Department>> {
    conn.query_row(
        &format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE department_id = ?1"),
        params![id],
        department_from_row,
    )
    .optional()
}

fn course_count(conn: &Connection, department_id: DepartmentId) -> rusqlite::Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM courses WHERE department_id = ?1",
        params![department_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl EntityStore for SqliteEntityStore {
    fn get_department(&self, id: DepartmentId) -> Result<Option<Department>, StoreError> {
        let conn = self.acquire("get_department")?;
        Ok(select_department(&conn, id)?)
    }

    fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let conn = self.acquire("list_departments")?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY department_id ASC"
        ))?;
        let departments = stmt
            .query_map([], department_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(departments)
    }

    fn insert_department(&self, fields: &NewDepartment) -> Result<Department, StoreError> {
        let conn = self.acquire("insert_department")?;
        conn.execute(
            "INSERT INTO departments (name, budget, start_date, instructor_id, version)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &fields.name,
                fields.budget,
                fields.start_date,
                fields.instructor_id,
                Department::INITIAL_VERSION as i64
            ],
        )?;

        Ok(Department {
            department_id: conn.last_insert_rowid(),
            fields: fields.clone(),
            version: Department::INITIAL_VERSION,
        })
    }

    fn update_department_if_version(
        &self,
        id: DepartmentId,
        expected_version: u64,
        fields: &DepartmentFields,
    ) -> Result<Option<Department>, StoreError> {
        let mut conn = self.acquire("update_department_if_version")?;
        let tx = conn.transaction()?;

        let affected = tx.execute(
            "UPDATE departments
             SET name = ?1, budget = ?2, start_date = ?3, instructor_id = ?4,
                 version = version + 1
             WHERE department_id = ?5 AND version = ?6",
            params![
                &fields.name,
                fields.budget,
                fields.start_date,
                fields.instructor_id,
                id,
                expected_version as i64
            ],
        )?;

        if affected == 0 {
            return Ok(None);
        }

        let updated = select_department(&tx, id)?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_department_unreferenced(&self, id: DepartmentId) -> Result<GuardedDelete, StoreError> {
        let mut conn = self.acquire("delete_department_unreferenced")?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The RESTRICT foreign key is the reference check; courses are only
        // counted once it fires.
        match tx.execute("DELETE FROM departments WHERE department_id = ?1", params![id]) {
            Ok(0) => Ok(GuardedDelete::Missing),
            Ok(_) => {
                tx.commit()?;
                Ok(GuardedDelete::Deleted)
            }
            Err(err) if is_constraint_violation(&err) => {
                let referencing = course_count(&tx, id)?;
                Ok(GuardedDelete::Referenced(referencing.max(1)))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn count_courses_for(&self, department_id: DepartmentId) -> Result<u64, StoreError> {
        let conn = self.acquire("count_courses_for")?;
        Ok(course_count(&conn, department_id)?)
    }

    fn insert_course(&self, course: &Course) -> Result<Course, StoreError> {
        let mut conn = self.acquire("insert_course")?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if select_department(&tx, course.department_id)?.is_none() {
            return Err(StoreError::missing_reference::<Department>(
                course.department_id,
            ));
        }

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE course_id = ?1)",
            params![course.course_id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StoreError::duplicate::<Course>(course.course_id));
        }

        tx.execute(
            "INSERT INTO courses (course_id, title, credits, department_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                course.course_id,
                &course.title,
                course.credits,
                course.department_id
            ],
        )?;
        tx.commit()?;

        Ok(course.clone())
    }

    fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let conn = self.acquire("get_course")?;
        let course = conn
            .query_row(
                &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = ?1"),
                params![id],
                course_from_row,
            )
            .optional()?;
        Ok(course)
    }

    fn list_courses(&self, department_id: Option<DepartmentId>) -> Result<Vec<Course>, StoreError> {
        let conn = self.acquire("list_courses")?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses
             WHERE ?1 IS NULL OR department_id = ?1
             ORDER BY course_id ASC"
        ))?;
        let courses = stmt
            .query_map(params![department_id], course_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }

    fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        let conn = self.acquire("delete_course")?;
        let affected = conn.execute("DELETE FROM courses WHERE course_id = ?1", params![id])?;
        Ok(affected > 0)
    }
}
