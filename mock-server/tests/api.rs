use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use saipd_mock::{app, app_with, new_db, ADMIN_LOGIN, ADMIN_PASSWORD};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn md5_hex(input: &str) -> String {
    saipd_mock::db::md5_hex(input)
}

/// Request with an optional bearer token and optional JSON body.
fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(body.map(|b| b.to_string()).unwrap_or_default())
        .unwrap()
}

async fn send(app: &Router, req: Request<String>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn admin_token(app: &Router) -> String {
    let uri = format!("/auth?login={ADMIN_LOGIN}&password={}", md5_hex(ADMIN_PASSWORD));
    let resp = send(app, request("POST", &uri, None, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let id: i64 = body_json(resp).await;
    format!("token_{id}")
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> Value {
    let resp = send(app, request("POST", uri, Some(token), Some(body))).await;
    assert!(resp.status().is_success(), "{uri}: {}", resp.status());
    body_json(resp).await
}

/// Class with two enrolled users and one dated session. Returns
/// (class id, session id, user ids).
async fn class_with_session(app: &Router, token: &str) -> (i64, i64, Vec<i64>) {
    let mut users = Vec::new();
    for login in ["ann", "ben"] {
        let user = create(
            app,
            token,
            "/user/add",
            json!({
                "login": login,
                "email": format!("{login}@school.test"),
                "first_name": login,
                "last_name": "Pupil",
                "password": md5_hex("pw"),
            }),
        )
        .await;
        users.push(user["id"].as_i64().unwrap());
    }
    let class = create(app, token, "/class/add", json!({ "name": "1A" })).await;
    let class_id = class["id"].as_i64().unwrap();
    for user in &users {
        create(app, token, &format!("/class/add_user/{class_id}?user_id={user}"), Value::Null).await;
    }
    let exercise = create(app, token, "/exercise/add", json!({ "name": "Choir" })).await;
    let exercise_id = exercise["id"].as_i64().unwrap();
    create(
        app,
        token,
        &format!(
            "/class/add_exercise/{class_id}?exercise_id={exercise_id}&teacher_id={}&day_of_week=2&time_of_exercise=08%3A00",
            users[0]
        ),
        Value::Null,
    )
    .await;
    let sessions: Vec<Value> = {
        let resp = send(app, request("POST", &format!("/history/generate/{class_id}"), Some(token), None)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    };
    assert_eq!(sessions.len(), 4);
    (class_id, sessions[0]["id"].as_i64().unwrap(), users)
}

// --- auth ---

#[tokio::test]
async fn login_returns_user_id() {
    let app = app();
    let token = admin_token(&app).await;
    assert!(token.starts_with("token_"));
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = app();
    let uri = format!("/auth?login=admin&password={}", md5_hex("wrong"));
    let resp = send(&app, request("POST", &uri, None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Invalid login or password");
}

#[tokio::test]
async fn routes_require_bearer() {
    let app = app();
    let resp = send(&app, request("GET", "/role/list", None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&app, request("GET", "/role/list", Some("token_999"), None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let token = admin_token(&app).await;
    let resp = send(&app, request("GET", "/role/list", Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let roles: Vec<Value> = body_json(resp).await;
    assert_eq!(roles.len(), 3);
}

#[tokio::test]
async fn deactivated_user_loses_access() {
    let app = app();
    let token = admin_token(&app).await;
    let user = create(
        &app,
        &token,
        "/user/add",
        json!({
            "login": "temp",
            "email": "temp@school.test",
            "first_name": "Temp",
            "last_name": "User",
            "password": md5_hex("pw"),
        }),
    )
    .await;
    let id = user["id"].as_i64().unwrap();
    let user_token = format!("token_{id}");

    let resp = send(&app, request("GET", "/role/list", Some(&user_token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    create(&app, &token, &format!("/user/deactivate/{id}"), Value::Null).await;
    let resp = send(&app, request("GET", "/role/list", Some(&user_token), None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let uri = format!("/auth?login=temp&password={}", md5_hex("pw"));
    let resp = send(&app, request("POST", &uri, None, None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- users ---

#[tokio::test]
async fn user_list_applies_page_and_filters() {
    let app = app();
    let token = admin_token(&app).await;
    for i in 0..3 {
        create(
            &app,
            &token,
            "/user/add",
            json!({
                "login": format!("u{i}"),
                "email": format!("u{i}@school.test"),
                "first_name": "U",
                "last_name": "Ser",
                "password": md5_hex("pw"),
            }),
        )
        .await;
    }

    let resp = send(&app, request("GET", "/user/list?skip=1&limit=2", Some(&token), None)).await;
    let users: Vec<Value> = body_json(resp).await;
    assert_eq!(users.len(), 2);

    let resp = send(&app, request("GET", "/user/list?login=u2", Some(&token), None)).await;
    let users: Vec<Value> = body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "u2@school.test");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_login_is_409() {
    let app = app();
    let token = admin_token(&app).await;
    let resp = send(
        &app,
        request(
            "POST",
            "/user/add",
            Some(&token),
            Some(json!({
                "login": "admin",
                "email": "x@school.test",
                "first_name": "X",
                "last_name": "Y",
                "password": md5_hex("pw"),
            })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_payload_field_is_422() {
    let app = app();
    let token = admin_token(&app).await;
    let resp = send(
        &app,
        request("POST", "/class/add", Some(&token), Some(json!({ "name": "1A", "room": 4 }))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn role_membership() {
    let app = app();
    let token = admin_token(&app).await;
    let roles: Vec<Value> = body_json(send(&app, request("GET", "/role/list", Some(&token), None)).await).await;
    let teacher = roles.iter().find(|r| r["name"] == "teacher").unwrap()["id"].as_i64().unwrap();
    let admin_id: i64 = token.trim_start_matches("token_").parse().unwrap();

    let user = create(&app, &token, &format!("/user/add_role/{admin_id}?role_id={teacher}"), Value::Null).await;
    assert!(user["role_ids"].as_array().unwrap().contains(&json!(teacher)));

    let resp = send(&app, request("GET", &format!("/user/list?role_id={teacher}"), Some(&token), None)).await;
    let users: Vec<Value> = body_json(resp).await;
    assert_eq!(users.len(), 1);

    let user = create(&app, &token, &format!("/user/remove_role/{admin_id}?role_id={teacher}"), Value::Null).await;
    assert!(!user["role_ids"].as_array().unwrap().contains(&json!(teacher)));
}

// --- classes ---

#[tokio::test]
async fn class_get_serves_both_routes() {
    let app = app();
    let token = admin_token(&app).await;
    let class = create(&app, &token, "/class/add", json!({ "name": "2B" })).await;
    let id = class["id"].as_i64().unwrap();

    for uri in [format!("/class/{id}"), format!("/class/get/{id}")] {
        let resp = send(&app, request("GET", &uri, Some(&token), None)).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body: Value = body_json(resp).await;
        assert_eq!(body["name"], "2B");
        assert_eq!(body["exercises"], json!([]));
    }

    let resp = send(&app, request("GET", "/class/list", Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn add_exercise_reads_schedule_from_query() {
    let app = app();
    let token = admin_token(&app).await;
    let (class_id, _, users) = class_with_session(&app, &token).await;

    let resp = send(&app, request("GET", &format!("/class/{class_id}"), Some(&token), None)).await;
    let class: Value = body_json(resp).await;
    let slot = &class["exercises"][0];
    assert_eq!(slot["teacher_id"], json!(users[0]));
    assert_eq!(slot["day_of_week"], 2);
    assert_eq!(slot["time_of_exercise"], "08:00");
    assert_eq!(slot["week_interval"], 1);

    let ce_id = slot["id"].as_i64().unwrap();
    let resp = send(&app, request("POST", &format!("/class/remove_exercise/{ce_id}"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// --- history ---

#[tokio::test]
async fn history_generate_does_not_duplicate() {
    let app = app();
    let token = admin_token(&app).await;
    let (class_id, _, _) = class_with_session(&app, &token).await;

    let resp = send(&app, request("POST", &format!("/history/generate/{class_id}"), Some(&token), None)).await;
    let again: Vec<Value> = body_json(resp).await;
    assert!(again.is_empty());

    let resp = send(&app, request("GET", &format!("/history/list?class_id={class_id}"), Some(&token), None)).await;
    let sessions: Vec<Value> = body_json(resp).await;
    assert_eq!(sessions.len(), 4);
}

// --- attendance ---

#[tokio::test]
async fn attendance_generate_is_idempotent_without_force() {
    let app = app();
    let token = admin_token(&app).await;
    let (_, session, _) = class_with_session(&app, &token).await;

    let uri = format!("/attend/{session}/generate?force=false");
    let first: u64 = body_json(send(&app, request("GET", &uri, Some(&token), None)).await).await;
    assert_eq!(first, 2);
    let second: u64 = body_json(send(&app, request("GET", &uri, Some(&token), None)).await).await;
    assert_eq!(second, 0);

    let forced: u64 = body_json(
        send(&app, request("GET", &format!("/attend/{session}/generate?force=true"), Some(&token), None)).await,
    )
    .await;
    assert_eq!(forced, 2);

    let rows: Vec<Value> = body_json(
        send(
            &app,
            request("GET", &format!("/attend/list?exercise_history_id={session}"), Some(&token), None),
        )
        .await,
    )
    .await;
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn attendance_generate_force_resets_manual_marks() {
    let app = app();
    let token = admin_token(&app).await;
    let (_, session, users) = class_with_session(&app, &token).await;

    let uri = format!("/attend/{session}/generate?force=false");
    let created: u64 = body_json(send(&app, request("GET", &uri, Some(&token), None)).await).await;
    assert_eq!(created, 2);
    let marked = create(
        &app,
        &token,
        &format!("/attend/mark/{session}"),
        json!({ "user_id": users[1], "status": "late", "note": "bus delayed" }),
    )
    .await;
    let row_uri = format!("/attend/get/{}", marked["id"]);

    let kept: u64 = body_json(send(&app, request("GET", &uri, Some(&token), None)).await).await;
    assert_eq!(kept, 0);
    let row: Value = body_json(send(&app, request("GET", &row_uri, Some(&token), None)).await).await;
    assert_eq!(row["status"], "late");
    assert_eq!(row["note"], "bus delayed");

    let forced_uri = format!("/attend/{session}/generate?force=true");
    let reset: u64 = body_json(send(&app, request("GET", &forced_uri, Some(&token), None)).await).await;
    assert_eq!(reset, 2);
    let row: Value = body_json(send(&app, request("GET", &row_uri, Some(&token), None)).await).await;
    assert_eq!(row["status"], "present");
    assert_eq!(row["note"], Value::Null);
    assert_eq!(row["id"], marked["id"]);
}

#[tokio::test]
async fn convenience_status_needs_force_to_overwrite() {
    let app = app();
    let token = admin_token(&app).await;
    let (_, session, users) = class_with_session(&app, &token).await;
    let user = users[1];

    let resp = send(&app, request("GET", &format!("/attend/{session}/{user}/late"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let row: Value = body_json(resp).await;
    assert_eq!(row["status"], "late");

    let resp = send(&app, request("GET", &format!("/attend/{session}/{user}/absent?force=false"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(&app, request("GET", &format!("/attend/{session}/{user}/absent?force=true"), Some(&token), None)).await;
    let row: Value = body_json(resp).await;
    assert_eq!(row["status"], "absent");

    let resp = send(&app, request("GET", &format!("/attend/{session}/{user}/excused"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn attendance_mark_and_update() {
    let app = app();
    let token = admin_token(&app).await;
    let (_, session, users) = class_with_session(&app, &token).await;

    let row = create(
        &app,
        &token,
        &format!("/attend/mark/{session}"),
        json!({ "user_id": users[0], "status": "present" }),
    )
    .await;
    let id = row["id"].as_i64().unwrap();

    let row = create(&app, &token, &format!("/attend/update/{id}"), json!({ "status": "excused" })).await;
    assert_eq!(row["status"], "excused");

    let resp = send(&app, request("GET", &format!("/attend/get/{id}"), Some(&token), None)).await;
    let row: Value = body_json(resp).await;
    assert_eq!(row["status"], "excused");
}

// --- grades, tasks, messages ---

#[tokio::test]
async fn grade_crud() {
    let db = new_db();
    let app = app_with(db.clone());
    let token = admin_token(&app).await;
    let admin_id: i64 = token.trim_start_matches("token_").parse().unwrap();

    let resp = send(
        &app,
        request("POST", "/grade/", Some(&token), Some(json!({ "user_id": admin_id, "value": 4.0 }))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let grade: Value = body_json(resp).await;
    let id = grade["id"].as_i64().unwrap();

    let resp = send(&app, request("PUT", &format!("/grade/{id}"), Some(&token), Some(json!({ "value": 5.0 })))).await;
    let grade: Value = body_json(resp).await;
    assert_eq!(grade["value"], 5.0);

    let resp = send(&app, request("DELETE", &format!("/grade/{id}"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
    assert!(db.read().await.grades.is_empty());

    let resp = send(&app, request("GET", &format!("/grade/{id}"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_status_route() {
    let app = app();
    let token = admin_token(&app).await;
    let resp = send(&app, request("POST", "/task/", Some(&token), Some(json!({ "title": "Tune piano" })))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task: Value = body_json(resp).await;
    assert_eq!(task["status"], "todo");
    let id = task["id"].as_i64().unwrap();

    let resp = send(&app, request("PUT", &format!("/task/{id}/status/done"), Some(&token), None)).await;
    let task: Value = body_json(resp).await;
    assert_eq!(task["status"], "done");

    let resp = send(&app, request("GET", "/task/?status=done", Some(&token), None)).await;
    let tasks: Vec<Value> = body_json(resp).await;
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn message_sender_comes_from_token() {
    let app = app();
    let token = admin_token(&app).await;
    let admin_id: i64 = token.trim_start_matches("token_").parse().unwrap();

    let resp = send(
        &app,
        request(
            "POST",
            "/msg/",
            Some(&token),
            Some(json!({ "receiver_id": admin_id, "content": "note to self" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let msg: Value = body_json(resp).await;
    assert_eq!(msg["sender_id"], json!(admin_id));

    let resp = send(&app, request("GET", &format!("/msg/?receiver_id={admin_id}"), Some(&token), None)).await;
    let msgs: Vec<Value> = body_json(resp).await;
    assert_eq!(msgs.len(), 1);

    let id = msg["id"].as_i64().unwrap();
    let resp = send(&app, request("DELETE", &format!("/msg/{id}"), Some(&token), None)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
