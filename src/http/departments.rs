//! Department routes.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::{decode, ApiError};
use crate::domain::{Department, DepartmentFields, DepartmentId};
use crate::registry::{Registry, UpdateDepartment};
use crate::store::EntityStore;

/// `GET /departments`
pub(super) async fn list<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
) -> Result<Json<Vec<Department>>, ApiError> {
    Ok(Json(registry.list_departments()?))
}

/// `POST /departments` - body `{Name, Budget, StartDate, InstructorID}`.
pub(super) async fn create<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    let fields: DepartmentFields = decode(body)?;
    let department = registry.create_department(fields)?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// `GET /departments/:id`
pub(super) async fn get_one<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    id: Result<Path<DepartmentId>, PathRejection>,
) -> Result<Json<Department>, ApiError> {
    let Path(id) = id?;
    Ok(Json(registry.get_department(id)?))
}

/// `PUT /departments/:id` - body `{Name, Budget, StartDate, InstructorID, version}`.
pub(super) async fn update<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    id: Result<Path<DepartmentId>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Department>, ApiError> {
    let Path(id) = id?;
    let request: UpdateDepartment = decode(body)?;
    let department = registry.update_department(id, request)?.into_result()?;
    Ok(Json(department))
}

/// `DELETE /departments/:id`
pub(super) async fn delete<S: EntityStore + 'static>(
    State(registry): State<Arc<Registry<S>>>,
    id: Result<Path<DepartmentId>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let id = registry.delete_department(id)?.into_result()?;
    Ok(Json(json!({
        "message": "department deleted",
        "DepartmentID": id,
    })))
}
