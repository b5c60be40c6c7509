//! HTTP boundary - maps registry operations and outcomes onto JSON routes.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health` - `{ "ok": true }`
//! - `GET|POST /departments`, `GET|PUT|DELETE /departments/:id`
//! - `GET|POST /courses` (`?departmentId=N` filter), `GET|DELETE /courses/:id`
//!
//! A stale `version` on `PUT /departments/:id` yields `409` with the current
//! record under `currentData`. Deleting a department that still has courses
//! yields `400`. Bodies or ids that fail to extract are `400` validation
//! errors with the same JSON shape as every other error.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use academic_registry::{http, InMemoryEntityStore, Registry};
//!
//! let registry = Arc::new(Registry::new(InMemoryEntityStore::new()));
//! let app = http::router(registry);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

mod courses;
mod departments;
mod error;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::registry::Registry;
use crate::store::EntityStore;
use crate::validation::ValidationError;

pub use error::ApiError;

/// Build an axum `Router` serving the registry.
pub fn router<S: EntityStore + 'static>(registry: Arc<Registry<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/departments",
            get(departments::list::<S>).post(departments::create::<S>),
        )
        .route(
            "/departments/:id",
            get(departments::get_one::<S>)
                .put(departments::update::<S>)
                .delete(departments::delete::<S>),
        )
        .route(
            "/courses",
            get(courses::list::<S>).post(courses::create::<S>),
        )
        .route(
            "/courses/:id",
            get(courses::get_one::<S>).delete(courses::delete::<S>),
        )
        .with_state(registry)
}

/// `GET /health` - returns `{ "ok": true }`.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Deserialize an extracted JSON body into a typed request.
///
/// Extraction and decode failures are validation errors: the request never
/// reaches the guards.
fn decode<T: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = body?;
    serde_json::from_value(body)
        .map_err(|e| ApiError::from(ValidationError::single("body", e.to_string())))
}
