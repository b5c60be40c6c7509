//! HTTP boundary integration tests.
//!
//! Starts an axum server and exercises it with reqwest.

use std::sync::Arc;

use academic_registry::{http, EntityStore, InMemoryEntityStore, Registry};
use serde_json::{json, Value};

use crate::support::seed_department;

/// Bind to port 0 and return the base URL.
async fn start_server<S: EntityStore + 'static>(registry: Arc<Registry<S>>) -> String {
    let app = http::router(registry);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn registry() -> Arc<Registry<InMemoryEntityStore>> {
    Arc::new(Registry::new(InMemoryEntityStore::new()))
}

fn department_body(budget: f64, version: u64) -> Value {
    json!({
        "Name": "Mathematics",
        "Budget": budget,
        "StartDate": "2007-09-01",
        "InstructorID": null,
        "version": version,
    })
}

#[tokio::test]
async fn health_check() {
    let base = start_server(registry()).await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn create_and_read_department() {
    let base = start_server(registry()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/departments"))
        .json(&json!({ "Name": "  English ", "Budget": 350000, "StartDate": "2007-09-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["Name"], "English");
    assert_eq!(created["version"], 1);
    assert_eq!(created["InstructorID"], Value::Null);

    let id = created["DepartmentID"].as_i64().unwrap();
    let fetched: Value = client
        .get(format!("{base}/departments/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let listed: Value = client
        .get(format!("{base}/departments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn reads_do_not_change_version() {
    let registry = registry();
    seed_department(&registry, 1, 2, 10.0);
    let base = start_server(registry).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let body: Value = client
            .get(format!("{base}/departments/1"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["version"], 2);
    }
}

#[tokio::test]
async fn stale_put_returns_409_with_current_data() {
    let registry = registry();
    seed_department(&registry, 5, 3, 100_000.0);
    let base = start_server(registry).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/departments/5"))
        .json(&department_body(150_000.0, 3))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["version"], 4);
    assert_eq!(updated["Budget"], 150_000.0);

    let resp = client
        .put(format!("{base}/departments/5"))
        .json(&department_body(200_000.0, 3))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
    assert_eq!(body["currentData"], updated);

    // Resubmitting with the current version overwrites.
    let resp = client
        .put(format!("{base}/departments/5"))
        .json(&department_body(200_000.0, 4))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["version"], 5);
    assert_eq!(body["Budget"], 200_000.0);
}

#[tokio::test]
async fn put_missing_department_returns_404() {
    let base = start_server(registry()).await;
    let resp = reqwest::Client::new()
        .put(format!("{base}/departments/42"))
        .json(&department_body(1.0, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn put_without_version_is_a_validation_error() {
    let registry = registry();
    seed_department(&registry, 1, 1, 1.0);
    let base = start_server(registry.clone()).await;

    let resp = reqwest::Client::new()
        .put(format!("{base}/departments/1"))
        .json(&json!({ "Name": "X", "Budget": 1, "StartDate": "2007-09-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["errors"].is_array());
    assert_eq!(registry.get_department(1).unwrap().version, 1);
}

#[tokio::test]
async fn malformed_body_is_a_json_validation_error() {
    let registry = registry();
    seed_department(&registry, 1, 1, 1.0);
    let base = start_server(registry.clone()).await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/departments/1"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
    assert_eq!(body["errors"][0]["field"], "body");

    let resp = client
        .post(format!("{base}/courses"))
        .body(r#"{"CourseID": 1}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());

    assert_eq!(registry.get_department(1).unwrap().version, 1);
}

#[tokio::test]
async fn non_numeric_ids_are_json_validation_errors() {
    let base = start_server(registry()).await;
    let client = reqwest::Client::new();

    for resp in [
        client.get(format!("{base}/departments/abc")).send().await.unwrap(),
        client.delete(format!("{base}/departments/abc")).send().await.unwrap(),
        client
            .put(format!("{base}/departments/abc"))
            .json(&department_body(1.0, 1))
            .send()
            .await
            .unwrap(),
        client.get(format!("{base}/courses/abc")).send().await.unwrap(),
        client.get(format!("{base}/courses?departmentId=abc")).send().await.unwrap(),
    ] {
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert!(body["message"].is_string());
        assert!(body["errors"].is_array());
    }
}

#[tokio::test]
async fn delete_with_course_returns_400() {
    let registry = registry();
    seed_department(&registry, 7, 1, 1.0);
    let base = start_server(registry).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/courses"))
        .json(&json!({ "CourseID": 2100, "Title": "Seminar", "Credits": 3, "DepartmentID": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .delete(format!("{base}/departments/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "cannot delete department with existing courses");
    assert_eq!(body["courseCount"], 1);

    let dept = client.get(format!("{base}/departments/7")).send().await.unwrap();
    assert_eq!(dept.status(), 200);
    let course = client.get(format!("{base}/courses/2100")).send().await.unwrap();
    assert_eq!(course.status(), 200);
}

#[tokio::test]
async fn delete_without_courses_then_404() {
    let registry = registry();
    seed_department(&registry, 8, 1, 1.0);
    let base = start_server(registry).await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{base}/departments/8"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["DepartmentID"], 8);

    let resp = client.get(format!("{base}/departments/8")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{base}/departments/8"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn course_routes() {
    let registry = registry();
    seed_department(&registry, 2, 1, 1.0);
    let base = start_server(registry).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/courses"))
        .json(&json!({ "CourseID": 1, "Title": "Orphan", "Credits": 1, "DepartmentID": 99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    for (course_id, department_id) in [(10, 1), (20, 2), (30, 2)] {
        let resp = client
            .post(format!("{base}/courses"))
            .json(&json!({
                "CourseID": course_id,
                "Title": "Survey Course",
                "Credits": 3,
                "DepartmentID": department_id,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let resp = client
        .post(format!("{base}/courses"))
        .json(&json!({ "CourseID": 10, "Title": "Duplicate", "Credits": 1, "DepartmentID": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let filtered: Value = client
        .get(format!("{base}/courses?departmentId=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = filtered
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["CourseID"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![20, 30]);

    let resp = client.delete(format!("{base}/courses/20")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let resp = client.get(format!("{base}/courses/20")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn sqlite_backend_serves_conflicts() {
    let registry = Arc::new(crate::support::sqlite());
    seed_department(&registry, 1, 1, 10.0);
    let base = start_server(registry).await;
    let client = reqwest::Client::new();

    let first = client
        .put(format!("{base}/departments/1"))
        .json(&department_body(20.0, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);

    let second = client
        .put(format!("{base}/departments/1"))
        .json(&department_body(30.0, 1))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 409);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["currentData"]["version"], 2);
    assert_eq!(body["currentData"]["Budget"], 20.0);
}
