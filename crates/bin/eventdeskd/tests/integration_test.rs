//! End-to-end tests for the full eventdeskd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`. No TCP port is bound.

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, HOST, LOCATION};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use eventdesk_adapter_http_axum::router;
use eventdesk_adapter_http_axum::state::AppState;
use eventdesk_adapter_storage_sqlite_sqlx::{
    Config, Database, SqliteEventRepository, SqliteUserRepository,
};
use eventdesk_app::services::event_service::EventService;
use eventdesk_app::services::user_service::UserService;
use eventdesk_domain::id::UserId;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// A wired router plus the database behind it, for out-of-band writes.
struct TestApp {
    router: axum::Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_public_url(None).await
    }

    async fn with_public_url(public_url: Option<&str>) -> Self {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .expect("in-memory database should initialise");
        let pool = db.pool().clone();

        let mut state = AppState::new(
            EventService::new(
                SqliteEventRepository::new(pool.clone()),
                SqliteUserRepository::new(pool.clone()),
            ),
            UserService::new(SqliteUserRepository::new(pool)),
        );
        if let Some(url) = public_url {
            state = state.with_public_url(url);
        }

        Self {
            router: router::build(state),
            db,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        self.router
            .clone()
            .oneshot(request(method, uri, body))
            .await
            .unwrap()
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        read(self.send("GET", uri, None).await).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        read(self.send("POST", uri, Some(body)).await).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        read(self.send("PUT", uri, Some(body)).await).await
    }

    async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        read(self.send("PATCH", uri, Some(body)).await).await
    }

    async fn delete(&self, uri: &str) -> StatusCode {
        self.send("DELETE", uri, None).await.status()
    }

    /// Users have no HTTP delete; remove one the way an admin tool would.
    async fn delete_user(&self, id: i64) {
        UserService::new(SqliteUserRepository::new(self.db.pool().clone()))
            .delete_user(UserId::new(id))
            .await
            .unwrap();
    }

    async fn create_user(&self, username: &str) -> Value {
        let (status, body) = self.post("/users/", json!({ "username": username })).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    async fn create_event(&self, payload: Value) -> Value {
        let (status, body) = self.post("/events/", payload).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, "testserver");
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap()
}

async fn read(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// ---------------------------------------------------------------------------
// Health check and root
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_list_collection_links_at_root() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "users": "http://testserver/users/",
            "events": "http://testserver/events/",
        })
    );
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_event_with_defaults() {
    let app = TestApp::new().await;

    let response = app
        .send(
            "POST",
            "/events/",
            Some(json!({"title": "Intro to Rust", "time": "2024-09-02T18:00:00Z"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[LOCATION], "http://testserver/events/1/");

    let (_, body) = read(response).await;
    assert_eq!(
        body,
        json!({
            "url": "http://testserver/events/1/",
            "id": 1,
            "title": "Intro to Rust",
            "presenter": "",
            "time": "2024-09-02T18:00:00Z",
            "location": "",
            "coordinator": null,
            "description": "",
        })
    );
}

#[tokio::test]
async fn should_default_time_to_now_when_omitted() {
    let app = TestApp::new().await;

    let created = app.create_event(json!({"title": "Standup"})).await;

    let time = created["time"].as_str().unwrap();
    assert!(time.ends_with('Z'), "{time}");
}

#[tokio::test]
async fn should_require_title_on_create() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/events/", json!({"presenter": "Ada"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["title"], json!(["This field is required."]));
}

#[tokio::test]
async fn should_reject_blank_title_and_long_location() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/events/",
            json!({"title": "   ", "location": "x".repeat(257)}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["title"].is_array());
    assert!(body["fields"]["location"].is_array());

    let (_, list) = app.get("/events/").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn should_reject_malformed_time() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post("/events/", json!({"title": "Talk", "time": "next tuesday"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["time"].is_array());
}

#[tokio::test]
async fn should_reject_time_that_leaves_year_9999_in_utc() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "Kickoff"})).await;
    let late = "9999-12-31T23:00:00-05:00";

    let (status, body) = app
        .post("/events/", json!({"title": "Late", "time": late}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["time"].is_array(), "{body}");

    let (status, body) = app.patch("/events/1/", json!({"time": late})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["time"].is_array(), "{body}");

    let (status, body) = app.get("/events/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(app.get("/events/1/").await.0, StatusCode::OK);
}

#[tokio::test]
async fn should_round_trip_last_storable_time() {
    let app = TestApp::new().await;

    let created = app
        .create_event(json!({"title": "Late", "time": "9999-12-31T23:59:59.5Z"}))
        .await;
    assert_eq!(created["time"], "9999-12-31T23:59:59.500000Z");

    let (status, body) = app.get("/events/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["time"], "9999-12-31T23:59:59.500000Z");
}

#[tokio::test]
async fn should_list_events_in_id_order() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "First"})).await;
    app.create_event(json!({"title": "Second"})).await;

    let (status, body) = app.get("/events/").await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn should_replace_event_with_put() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "Draft", "presenter": "Ada", "location": "Room 1"}))
        .await;

    let (status, body) = app
        .put(
            "/events/1/",
            json!({"title": "Final", "time": "2024-10-01T09:30:00Z"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Final");
    assert_eq!(body["time"], "2024-10-01T09:30:00Z");
    // Omitted optional fields keep their stored values.
    assert_eq!(body["presenter"], "Ada");
    assert_eq!(body["location"], "Room 1");
}

#[tokio::test]
async fn should_require_title_on_put_but_not_on_patch() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "Original"})).await;

    let (status, body) = app.put("/events/1/", json!({"location": "Hall"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["title"], json!(["This field is required."]));

    let (status, body) = app.patch("/events/1/", json!({"location": "Hall"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Original");
    assert_eq!(body["location"], "Hall");
}

#[tokio::test]
async fn should_leave_event_unchanged_after_rejected_update() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "Keep me"})).await;

    let (status, _) = app.patch("/events/1/", json!({"title": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/events/1/").await;
    assert_eq!(body["title"], "Keep me");
}

#[tokio::test]
async fn should_delete_event_then_return_404() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "Ephemeral"})).await;

    assert_eq!(app.delete("/events/1/").await, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/events/1/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/events/1/").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_not_reuse_deleted_event_ids() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "One"})).await;
    app.delete("/events/1/").await;

    let created = app.create_event(json!({"title": "Two"})).await;

    assert_eq!(created["id"], 2);
}

#[tokio::test]
async fn should_return_404_for_unknown_or_malformed_event_id() {
    let app = TestApp::new().await;

    assert_eq!(app.get("/events/42/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/events/abc/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        app.patch("/events/42/", json!({"title": "x"})).await.0,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn should_address_events_only_behind_slash_or_json_suffix() {
    let app = TestApp::new().await;
    app.create_event(json!({"title": "Kickoff"})).await;

    assert_eq!(app.get("/events/1/").await.0, StatusCode::OK);
    assert_eq!(app.get("/events/1.json").await.0, StatusCode::OK);
    assert_eq!(app.get("/events/1").await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/events/+1/").await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.delete("/events/1").await, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/events/1/").await.0, StatusCode::OK);
}

#[tokio::test]
async fn should_return_400_for_malformed_json() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events/")
                .header(HOST, "testserver")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Coordinators
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_link_event_and_coordinator_both_ways() {
    let app = TestApp::new().await;
    let user = app.create_user("ada").await;

    let event = app
        .create_event(json!({"title": "Kickoff", "coordinator": user["url"]}))
        .await;
    assert_eq!(event["coordinator"], "http://testserver/users/1/");

    let (status, body) = app.get("/users/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"], json!(["http://testserver/events/1/"]));
}

#[tokio::test]
async fn should_reject_coordinator_that_does_not_exist() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/events/",
            json!({"title": "Orphan", "coordinator": "http://testserver/users/9/"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["coordinator"],
        json!(["Invalid hyperlink - Object does not exist."])
    );
}

#[tokio::test]
async fn should_reject_signed_user_ids_in_paths_and_links() {
    let app = TestApp::new().await;
    app.create_user("ada").await;

    assert_eq!(app.get("/users/1/").await.0, StatusCode::OK);
    assert_eq!(app.get("/users/+1/").await.0, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            "/events/",
            json!({"title": "Signed", "coordinator": "http://testserver/users/+1/"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["coordinator"].is_array(), "{body}");
}

#[tokio::test]
async fn should_reject_coordinator_link_to_wrong_resource() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/events/",
            json!({"title": "Odd", "coordinator": "http://testserver/events/1/"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["coordinator"].is_array());
}

#[tokio::test]
async fn should_move_event_between_coordinators() {
    let app = TestApp::new().await;
    app.create_user("ada").await;
    app.create_user("grace").await;
    app.create_event(json!({"title": "Kickoff", "coordinator": "http://testserver/users/1/"}))
        .await;

    let (status, _) = app
        .patch(
            "/events/1/",
            json!({"coordinator": "http://testserver/users/2/"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.get("/users/1/").await.1["events"], json!([]));
    assert_eq!(
        app.get("/users/2/").await.1["events"],
        json!(["http://testserver/events/1/"])
    );
}

#[tokio::test]
async fn should_clear_coordinator_with_null() {
    let app = TestApp::new().await;
    app.create_user("ada").await;
    app.create_event(json!({"title": "Kickoff", "coordinator": "http://testserver/users/1/"}))
        .await;

    let (_, body) = app.patch("/events/1/", json!({"coordinator": null})).await;

    assert_eq!(body["coordinator"], Value::Null);
    assert_eq!(app.get("/users/1/").await.1["events"], json!([]));
}

#[tokio::test]
async fn should_keep_event_when_coordinator_is_deleted() {
    let app = TestApp::new().await;
    app.create_user("ada").await;
    app.create_event(json!({"title": "Kickoff", "coordinator": "http://testserver/users/1/"}))
        .await;

    app.delete_user(1).await;

    let (status, body) = app.get("/events/1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coordinator"], Value::Null);
    assert_eq!(app.get("/users/1/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_remove_event_from_coordinator_when_deleted() {
    let app = TestApp::new().await;
    app.create_user("ada").await;
    app.create_event(json!({"title": "A", "coordinator": "http://testserver/users/1/"}))
        .await;
    app.create_event(json!({"title": "B", "coordinator": "http://testserver/users/1/"}))
        .await;

    app.delete("/events/1/").await;

    assert_eq!(
        app.get("/users/1/").await.1["events"],
        json!(["http://testserver/events/2/"])
    );
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_user_with_empty_events() {
    let app = TestApp::new().await;

    let response = app
        .send("POST", "/users/", Some(json!({"username": "ada"})))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[LOCATION], "http://testserver/users/1/");

    let (_, body) = read(response).await;
    assert_eq!(
        body,
        json!({
            "url": "http://testserver/users/1/",
            "id": 1,
            "username": "ada",
            "events": [],
        })
    );
}

#[tokio::test]
async fn should_reject_duplicate_username() {
    let app = TestApp::new().await;
    app.create_user("ada").await;

    let (status, body) = app.post("/users/", json!({"username": "ada"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["username"],
        json!(["A user with that username already exists."])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_accept_one_of_concurrent_duplicate_usernames() {
    let app = TestApp::new().await;

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let router = app.router.clone();
            tokio::spawn(async move {
                let request = request("POST", "/users/", Some(json!({"username": "ada"})));
                read(router.oneshot(request).await.unwrap()).await
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        let (status, body) = task.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(
                body["fields"]["username"],
                json!(["A user with that username already exists."])
            );
        }
    }
    assert_eq!(created, 1);

    let (_, users) = app.get("/users/").await;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn should_reject_invalid_usernames() {
    let app = TestApp::new().await;

    for payload in [
        json!({}),
        json!({"username": ""}),
        json!({"username": "has space"}),
        json!({"username": "u".repeat(151)}),
    ] {
        let (status, body) = app.post("/users/", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(body["fields"]["username"].is_array(), "{payload}");
    }
}

#[tokio::test]
async fn should_list_users_with_their_events() {
    let app = TestApp::new().await;
    app.create_user("ada").await;
    app.create_user("grace").await;
    app.create_event(json!({"title": "Kickoff", "coordinator": 2})).await;

    let (status, body) = app.get("/users/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["username"], "ada");
    assert_eq!(body[0]["events"], json!([]));
    assert_eq!(body[1]["username"], "grace");
    assert_eq!(body[1]["events"], json!(["http://testserver/events/1/"]));
}

#[tokio::test]
async fn should_not_allow_updating_or_deleting_users() {
    let app = TestApp::new().await;
    app.create_user("ada").await;

    let put = app
        .send("PUT", "/users/1/", Some(json!({"username": "bob"})))
        .await;
    assert_eq!(put.status(), StatusCode::METHOD_NOT_ALLOWED);
    let delete = app.send("DELETE", "/users/1/", None).await;
    assert_eq!(delete.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Formats and hyperlinks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_carry_json_suffix_into_hyperlinks() {
    let app = TestApp::new().await;
    app.create_user("ada").await;
    app.create_event(json!({"title": "Kickoff", "coordinator": 1})).await;

    let (status, body) = app.get("/events/1.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "http://testserver/events/1.json");
    assert_eq!(body["coordinator"], "http://testserver/users/1.json");

    let (status, body) = app.get("/users.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["events"], json!(["http://testserver/events/1.json"]));
}

#[tokio::test]
async fn should_accept_suffixed_coordinator_links() {
    let app = TestApp::new().await;
    app.create_user("ada").await;

    let event = app
        .create_event(json!({"title": "Kickoff", "coordinator": "http://other.host/users/1.json"}))
        .await;

    assert_eq!(event["coordinator"], "http://testserver/users/1/");
}

#[tokio::test]
async fn should_build_hyperlinks_from_public_url() {
    let app = TestApp::with_public_url(Some("https://events.example.org/api")).await;
    app.create_user("ada").await;

    let (_, body) = app.get("/users/1/").await;

    assert_eq!(body["url"], "https://events.example.org/api/users/1/");

    let event = app
        .create_event(json!({
            "title": "Kickoff",
            "coordinator": "https://events.example.org/api/users/1/"
        }))
        .await;
    assert_eq!(
        event["coordinator"],
        "https://events.example.org/api/users/1/"
    );
}
