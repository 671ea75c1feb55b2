//! Router tests over an in-memory SQLite store.

use std::sync::Arc;

use adoptme_mock::MockGenerator;
use adoptme_store_sqlite::SqliteStore;
use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn router() -> Router {
  let store = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  api_router(
    Arc::new(store),
    MockGenerator::new(Some(17)).with_max_count(20),
  )
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn create_juan(app: &Router) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/users",
    Some(json!({
      "first_name": "Juan",
      "last_name": "Adoptador",
      "email": "juan@test.com",
      "password": "pw",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["payload"]["_id"].as_str().unwrap().to_owned()
}

async fn create_max(app: &Router) -> String {
  let (status, body) = send(
    app,
    "POST",
    "/pets",
    Some(json!({ "name": "Max", "specie": "dog", "birthDate": "2020-01-15" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["payload"]["_id"].as_str().unwrap().to_owned()
}

fn assert_error(status: StatusCode, body: &Value, expected: StatusCode) {
  assert_eq!(status, expected, "{body}");
  assert_eq!(body["status"], "error");
  assert!(body["error"].is_string());
}

// ── Adoption flow ───────────────────────────────────────────────────────────

#[tokio::test]
async fn adopt_end_to_end() {
  let app = router().await;
  let uid = create_juan(&app).await;
  let pid = create_max(&app).await;

  let (status, body) =
    send(&app, "POST", &format!("/adoptions/{uid}/{pid}"), None).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["status"], "success");
  assert_eq!(body["payload"]["owner"], uid.as_str());
  assert_eq!(body["payload"]["pet"], pid.as_str());
  let aid = body["payload"]["_id"].as_str().unwrap().to_owned();

  let (_, pet) = send(&app, "GET", &format!("/pets/{pid}"), None).await;
  assert_eq!(pet["payload"]["adopted"], true);
  assert_eq!(pet["payload"]["owner"], uid.as_str());

  let (_, user) = send(&app, "GET", &format!("/users/{uid}"), None).await;
  assert_eq!(user["payload"]["pets"], json!([pid]));

  let (status, first) =
    send(&app, "GET", &format!("/adoptions/{aid}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let (_, second) = send(&app, "GET", &format!("/adoptions/{aid}"), None).await;
  assert_eq!(first, second);
}

#[tokio::test]
async fn adopting_twice_is_rejected() {
  let app = router().await;
  let uid = create_juan(&app).await;
  let pid = create_max(&app).await;
  let uri = format!("/adoptions/{uid}/{pid}");

  let (status, _) = send(&app, "POST", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, body) = send(&app, "POST", &uri, None).await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);

  let (_, list) = send(&app, "GET", "/adoptions", None).await;
  assert_eq!(list["payload"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn adoption_error_statuses() {
  let app = router().await;
  let uid = create_juan(&app).await;
  let pid = create_max(&app).await;
  let ghost = Uuid::new_v4();

  let (status, body) =
    send(&app, "POST", &format!("/adoptions/nope/{pid}"), None).await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);

  let (status, body) =
    send(&app, "POST", &format!("/adoptions/{ghost}/{pid}"), None).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "User not found");

  let (status, body) =
    send(&app, "POST", &format!("/adoptions/{uid}/{ghost}"), None).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Pet not found");

  let (status, body) = send(&app, "GET", "/adoptions/123", None).await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);

  let (status, body) =
    send(&app, "GET", &format!("/adoptions/{ghost}"), None).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);

  // Nothing was written by the failed attempts.
  let (_, pet) = send(&app, "GET", &format!("/pets/{pid}"), None).await;
  assert_eq!(pet["payload"]["adopted"], false);
  let (_, user) = send(&app, "GET", &format!("/users/{uid}"), None).await;
  assert_eq!(user["payload"]["pets"], json!([]));
}

#[tokio::test]
async fn adoptions_listed_in_order() {
  let app = router().await;
  let uid = create_juan(&app).await;
  let mut expected = Vec::new();
  for _ in 0..3 {
    let pid = create_max(&app).await;
    send(&app, "POST", &format!("/adoptions/{uid}/{pid}"), None).await;
    expected.push(pid);
  }

  let (status, list) = send(&app, "GET", "/adoptions", None).await;
  assert_eq!(status, StatusCode::OK);
  let pets: Vec<_> = list["payload"]
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["pet"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(pets, expected);
}

// ── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_crud() {
  let app = router().await;
  let uid = create_juan(&app).await;

  let (_, body) = send(&app, "GET", &format!("/users/{uid}"), None).await;
  let user = &body["payload"];
  assert_eq!(user["first_name"], "Juan");
  assert_eq!(user["role"], "user");
  assert!(user.get("password").is_none());
  assert!(user.get("password_hash").is_none());

  let (status, body) = send(
    &app,
    "PUT",
    &format!("/users/{uid}"),
    Some(json!({ "last_name": "Perez", "role": "admin" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "User updated");
  assert_eq!(body["payload"]["last_name"], "Perez");
  assert_eq!(body["payload"]["role"], "admin");
  assert_eq!(body["payload"]["first_name"], "Juan");

  let (status, body) = send(&app, "DELETE", &format!("/users/{uid}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "User deleted");

  let (status, body) = send(&app, "GET", &format!("/users/{uid}"), None).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_validation() {
  let app = router().await;
  create_juan(&app).await;

  let (status, body) = send(
    &app,
    "POST",
    "/users",
    Some(json!({ "first_name": "Ana", "email": "ana@test.com" })),
  )
  .await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Incomplete values");

  let (status, body) = send(
    &app,
    "POST",
    "/users",
    Some(json!({
      "first_name": "Otro",
      "last_name": "Juan",
      "email": "juan@test.com",
      "password": "pw",
    })),
  )
  .await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn user_update_rejects_taken_email() {
  let app = router().await;
  create_juan(&app).await;
  let (_, body) = send(
    &app,
    "POST",
    "/users",
    Some(json!({
      "first_name": "Ana",
      "last_name": "Lopez",
      "email": "ana@test.com",
      "password": "pw",
    })),
  )
  .await;
  let ana = body["payload"]["_id"].as_str().unwrap().to_owned();

  let (status, body) = send(
    &app,
    "PUT",
    &format!("/users/{ana}"),
    Some(json!({ "email": "juan@test.com" })),
  )
  .await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);

  // Re-sending one's own email is fine.
  let (status, _) = send(
    &app,
    "PUT",
    &format!("/users/{ana}"),
    Some(json!({ "email": "ana@test.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_user_and_pet_ids_are_not_found() {
  let app = router().await;
  for uri in ["/users/123", "/pets/not-an-id"] {
    for method in ["GET", "DELETE"] {
      let (status, body) = send(&app, method, uri, None).await;
      assert_error(status, &body, StatusCode::NOT_FOUND);
    }
    let (status, body) = send(&app, "PUT", uri, Some(json!({}))).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
  }
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
  let app = router().await;
  let req = Request::builder()
    .method("POST")
    .uri("/users")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn empty_user_update_returns_current_user() {
  let app = router().await;
  let uid = create_juan(&app).await;
  let (_, before) = send(&app, "GET", &format!("/users/{uid}"), None).await;

  let (status, body) =
    send(&app, "PUT", &format!("/users/{uid}"), Some(json!({}))).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "User updated");
  assert_eq!(body["payload"], before["payload"]);

  let missing = Uuid::new_v4();
  let (status, body) =
    send(&app, "PUT", &format!("/users/{missing}"), Some(json!({}))).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
}

// ── Pets ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pet_crud() {
  let app = router().await;
  let pid = create_max(&app).await;

  let (_, body) = send(&app, "GET", &format!("/pets/{pid}"), None).await;
  let pet = &body["payload"];
  assert_eq!(pet["name"], "Max");
  assert_eq!(pet["specie"], "dog");
  assert_eq!(pet["birthDate"], "2020-01-15");
  assert_eq!(pet["adopted"], false);
  assert_eq!(pet["owner"], Value::Null);

  let (status, body) = send(
    &app,
    "PUT",
    &format!("/pets/{pid}"),
    Some(json!({ "name": "Rocky", "adopted": true, "owner": Uuid::new_v4() })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "pet updated");
  assert_eq!(body["payload"]["name"], "Rocky");
  assert_eq!(body["payload"]["adopted"], false);
  assert_eq!(body["payload"]["owner"], Value::Null);

  let (status, body) = send(&app, "DELETE", &format!("/pets/{pid}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "pet deleted");

  let (status, body) = send(&app, "GET", &format!("/pets/{pid}"), None).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Pet not found");
}

#[tokio::test]
async fn pet_update_ignores_blank_and_empty_bodies() {
  let app = router().await;
  let (_, body) = send(
    &app,
    "POST",
    "/pets",
    Some(json!({
      "name": "Luna",
      "specie": "cat",
      "birthDate": "2021-03-02",
      "image": "https://img.test/luna.png",
    })),
  )
  .await;
  let created = body["payload"].clone();
  let pid = created["_id"].as_str().unwrap().to_owned();

  let (status, body) = send(
    &app,
    "PUT",
    &format!("/pets/{pid}"),
    Some(json!({ "image": "", "name": "  " })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["payload"]["image"], "https://img.test/luna.png");
  assert_eq!(body["payload"]["name"], "Luna");

  let (status, body) =
    send(&app, "PUT", &format!("/pets/{pid}"), Some(json!({}))).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "pet updated");
  assert_eq!(body["payload"], created);

  let missing = Uuid::new_v4();
  let (status, body) =
    send(&app, "PUT", &format!("/pets/{missing}"), Some(json!({}))).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pet_validation() {
  let app = router().await;

  let (status, body) = send(
    &app,
    "POST",
    "/pets",
    Some(json!({ "name": "Max", "specie": "dog" })),
  )
  .await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Incomplete values");

  let (status, body) = send(
    &app,
    "POST",
    "/pets",
    Some(json!({ "name": "Max", "specie": "dog", "birthDate": "yesterday" })),
  )
  .await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pet_birth_date_accepts_http_dates() {
  let app = router().await;
  let (status, body) = send(
    &app,
    "POST",
    "/pets",
    Some(json!({
      "name": "Luna",
      "specie": "cat",
      "birthDate": "Mon, 18 Dec 2023 00:00:00 GMT",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["payload"]["birthDate"], "2023-12-18");
}

#[tokio::test]
async fn deleting_adopted_pet_detaches_it() {
  let app = router().await;
  let uid = create_juan(&app).await;
  let pid = create_max(&app).await;
  send(&app, "POST", &format!("/adoptions/{uid}/{pid}"), None).await;

  send(&app, "DELETE", &format!("/pets/{pid}"), None).await;
  let (_, user) = send(&app, "GET", &format!("/users/{uid}"), None).await;
  assert_eq!(user["payload"]["pets"], json!([]));
}

// ── Mocks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mocking_pets_does_not_store() {
  let app = router().await;

  let (status, body) =
    send(&app, "GET", "/mocks/mockingpets?count=5", None).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["payload"].as_array().unwrap().len(), 5);
  assert!(body["payload"][0]["specie"].is_string());
  assert!(
    body["payload"]
      .as_array()
      .unwrap()
      .iter()
      .all(|pet| pet["adopted"] == false)
  );

  let (status, body) =
    send(&app, "POST", "/mocks/mockingpets?count=20", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["payload"].as_array().unwrap().len(), 20);

  // The default count (100) is above this router's limit.
  let (status, body) = send(&app, "GET", "/mocks/mockingpets", None).await;
  assert_error(status, &body, StatusCode::BAD_REQUEST);

  let (_, pets) = send(&app, "GET", "/pets", None).await;
  assert_eq!(pets["payload"], json!([]));
}

#[tokio::test]
async fn mocking_users_hides_passwords() {
  let app = router().await;
  let (status, body) =
    send(&app, "GET", "/mocks/mockingusers?count=3", None).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  let users = body["payload"].as_array().unwrap();
  assert_eq!(users.len(), 3);
  assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn mock_counts_are_validated() {
  let app = router().await;
  for uri in [
    "/mocks/mockingpets?count=abc",
    "/mocks/mockingpets?count=-1",
    "/mocks/mockingpets?count=21",
    "/mocks/mockingusers?count=21",
  ] {
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);
  }
}

#[tokio::test]
async fn generate_data_inserts() {
  let app = router().await;

  let (status, body) = send(
    &app,
    "POST",
    "/mocks/generateData",
    Some(json!({ "users": 2, "pets": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["payload"], json!({ "usersInserted": 2, "petsInserted": 3 }));
  assert!(body["message"].is_string());

  let (_, users) = send(&app, "GET", "/users", None).await;
  assert_eq!(users["payload"].as_array().unwrap().len(), 2);
  let (_, pets) = send(&app, "GET", "/pets", None).await;
  assert_eq!(pets["payload"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn generate_data_requires_a_count() {
  let app = router().await;
  for body in [json!({}), json!({ "users": 0, "pets": 0 })] {
    let (status, body) =
      send(&app, "POST", "/mocks/generateData", Some(body)).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);
  }
}

// ── Fallbacks ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_path_gets_error_envelope() {
  let app = router().await;
  let (status, body) = send(&app, "GET", "/nonexistent", None).await;
  assert_error(status, &body, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn wrong_method_gets_error_envelope() {
  let app = router().await;
  let (status, body) = send(&app, "PATCH", "/pets", None).await;
  assert_error(status, &body, StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(body["error"], "Method not allowed");

  let (status, body) = send(&app, "DELETE", "/users", None).await;
  assert_error(status, &body, StatusCode::METHOD_NOT_ALLOWED);
}
