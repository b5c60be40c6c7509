use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Record;

/// Store-assigned department identifier. Never reused after deletion.
pub type DepartmentId = i64;

/// Weak reference to an instructor. Not checked against any instructor table.
pub type InstructorId = i64;

/// The mutable field set of a department.
///
/// An update always replaces the whole set; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentFields {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Budget")]
    pub budget: f64,
    #[serde(rename = "StartDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "InstructorID", default)]
    pub instructor_id: Option<InstructorId>,
}

impl DepartmentFields {
    pub fn new(name: impl Into<String>, budget: f64, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            budget,
            start_date,
            instructor_id: None,
        }
    }

    pub fn with_instructor(mut self, instructor_id: InstructorId) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }
}

/// Fields for a department that has not been stored yet.
pub type NewDepartment = DepartmentFields;

/// A stored department.
///
/// `version` starts at 1 and grows by exactly one with every successful
/// update. Clients must echo the version they last read when updating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "DepartmentID")]
    pub department_id: DepartmentId,
    #[serde(flatten)]
    pub fields: DepartmentFields,
    pub version: u64,
}

impl Department {
    /// The version every freshly inserted department starts at.
    pub const INITIAL_VERSION: u64 = 1;

    pub fn budget(&self) -> f64 {
        self.fields.budget
    }
}

impl Record for Department {
    const COLLECTION: &'static str = "departments";
}
