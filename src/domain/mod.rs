//! Domain records - the rows the registry stores and guards.
//!
//! Departments are versioned for optimistic concurrency control. Courses
//! carry a mandatory reference to their department, which is what the
//! deletion guard checks before a department may be removed.
//!
//! ## Example
//!
//! ```ignore
//! use academic_registry::{DepartmentFields, Record, Department};
//!
//! let fields = DepartmentFields::new("Physics", 100_000.0, start_date);
//! assert_eq!(Department::COLLECTION, "departments");
//! ```

mod course;
mod department;

use serde::{de::DeserializeOwned, Serialize};

pub use course::{Course, CourseId};
pub use department::{Department, DepartmentFields, DepartmentId, InstructorId, NewDepartment};

/// Trait for rows kept by an [`EntityStore`](crate::EntityStore).
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this record type. Maps to a table in SQL.
    const COLLECTION: &'static str;
}
