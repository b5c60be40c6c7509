//! Input validation and sanitization.
//!
//! Runs before any guard sees the request. Strings are trimmed, numeric
//! ranges checked, and every failing field is reported at once.

use std::fmt;

use serde::Serialize;

use crate::domain::{Course, DepartmentFields};

pub const MAX_DEPARTMENT_NAME_LEN: usize = 50;
pub const MIN_COURSE_TITLE_LEN: usize = 3;
pub const MAX_COURSE_TITLE_LEN: usize = 50;
pub const MAX_COURSE_CREDITS: u8 = 5;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Malformed input. Holds every field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// A single-field error, e.g. for a payload that failed to decode.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.push(field, message);
        err
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{} {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Trim and range-check a department field set.
pub fn sanitize_department(fields: DepartmentFields) -> Result<DepartmentFields, ValidationError> {
    let mut errors = ValidationError::default();

    let name = fields.name.trim().to_string();
    if name.chars().count() > MAX_DEPARTMENT_NAME_LEN {
        errors.push(
            "Name",
            format!("must be at most {MAX_DEPARTMENT_NAME_LEN} characters"),
        );
    }
    if !fields.budget.is_finite() || fields.budget < 0.0 {
        errors.push("Budget", "must be a non-negative amount");
    }
    if matches!(fields.instructor_id, Some(id) if id <= 0) {
        errors.push("InstructorID", "must be a positive id");
    }

    errors.into_result(DepartmentFields { name, ..fields })
}

/// Versions start at 1, so 0 can never match a stored row.
pub fn check_version(version: u64) -> Result<u64, ValidationError> {
    if version == 0 {
        return Err(ValidationError::single("version", "must be at least 1"));
    }
    Ok(version)
}

/// Trim and range-check a course.
pub fn sanitize_course(course: Course) -> Result<Course, ValidationError> {
    let mut errors = ValidationError::default();

    if course.course_id <= 0 {
        errors.push("CourseID", "must be a positive number");
    }
    let title = course.title.trim().to_string();
    let len = title.chars().count();
    if !(MIN_COURSE_TITLE_LEN..=MAX_COURSE_TITLE_LEN).contains(&len) {
        errors.push(
            "Title",
            format!("must be {MIN_COURSE_TITLE_LEN} to {MAX_COURSE_TITLE_LEN} characters"),
        );
    }
    if course.credits > MAX_COURSE_CREDITS {
        errors.push("Credits", format!("must be between 0 and {MAX_COURSE_CREDITS}"));
    }
    if course.department_id <= 0 {
        errors.push("DepartmentID", "must be a positive id");
    }

    errors.into_result(Course { title, ..course })
}
