//! Course routes. Only what is needed to create and remove the dependents
//! the department deletion guard checks for.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, ApiError};
use crate::domain::{Course, CourseId, DepartmentId};
use crate::registry::Registry;
use crate::store::EntityStore;

#[derive(Debug, Default, Deserialize)]
pub(super) struct CourseFilter {
    #[serde(rename = "departmentId")]
    department_id: Option<DepartmentId>,
}

/// `GET /courses?departmentId=N`
pub(super) async fn list<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    filter: Result<Query<CourseFilter>, QueryRejection>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let Query(filter) = filter?;
    Ok(Json(registry.list_courses(filter.department_id)?))
}

/// `POST /courses` - body `{CourseID, Title, Credits, DepartmentID}`.
pub(super) async fn create<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let course: Course = decode(body)?;
    let course = registry.create_course(course)?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// `GET /courses/:id`
pub(super) async fn get_one<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    id: Result<Path<CourseId>, PathRejection>,
) -> Result<Json<Course>, ApiError> {
    let Path(id) = id?;
    Ok(Json(registry.get_course(id)?))
}

/// `DELETE /courses/:id`
pub(super) async fn delete<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    id: Result<Path<CourseId>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let id = registry.delete_course(id)?;
    Ok(Json(json!({
        "message": "course deleted",
        "CourseID": id,
    })))
}
