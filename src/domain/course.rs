use serde::{Deserialize, Serialize};

use super::department::DepartmentId;
use super::Record;

/// Caller-assigned course number.
pub type CourseId = i64;

/// A course offered by exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "CourseID")]
    pub course_id: CourseId,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Credits")]
    pub credits: u8,
    #[serde(rename = "DepartmentID")]
    pub department_id: DepartmentId,
}

impl Course {
    pub fn new(
        course_id: CourseId,
        title: impl Into<String>,
        credits: u8,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            course_id,
            title: title.into(),
            credits,
            department_id,
        }
    }
}

impl Record for Course {
    const COLLECTION: &'static str = "courses";
}
