use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use verse_api::auth::AppStateInner;
use verse_api::routes;
use verse_db::Database;

fn app() -> Router {
    let db = Database::open_in_memory().expect("in-memory db");
    routes::router(Arc::new(AppStateInner {
        db,
        jwt_secret: "test-secret".to_string(),
    }))
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_with_cookie(path: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Run a request, returning (status, json body, session cookie pair if set).
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();

    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string());

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body, cookie)
}

async fn signup_alice(app: &Router) -> (Value, String) {
    let (status, body, cookie) = send(
        app,
        post_json(
            "/api/auth/signup",
            json!({ "email": "a@x.com", "password": "pw123456", "username": "alice" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    (body, cookie.expect("signup sets session cookie"))
}

#[tokio::test]
async fn signup_returns_user_and_cookie() {
    let app = app();
    let (body, cookie) = signup_alice(&app).await;

    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["id"].is_i64());
    assert!(
        body["user"]["avatarUrl"]
            .as_str()
            .unwrap()
            .contains("seed=alice")
    );
    assert!(body["user"].get("passwordHash").is_none());
    assert!(cookie.starts_with("token="));
}

#[tokio::test]
async fn session_cookie_carries_security_attributes() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/signup",
            json!({ "email": "a@x.com", "password": "pw123456", "username": "alice" }),
        ))
        .await
        .unwrap();

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();

    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));
}

#[tokio::test]
async fn login_returns_same_user_id() {
    let app = app();
    let (signup_body, _) = signup_alice(&app).await;

    let (status, body, cookie) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "a@x.com", "password": "pw123456" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], signup_body["user"]["id"]);
    assert!(cookie.is_some());
}

#[tokio::test]
async fn login_wrong_password_is_401_without_cookie() {
    let app = app();
    signup_alice(&app).await;

    let (status, body, cookie) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "a@x.com", "password": "wrong" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
    assert!(cookie.is_none());
}

#[tokio::test]
async fn login_unknown_email_is_401() {
    let app = app();

    let (status, _, cookie) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "nobody@x.com", "password": "pw123456" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
}

#[tokio::test]
async fn duplicate_signup_is_400() {
    let app = app();
    signup_alice(&app).await;

    let (status, body, _) = send(
        &app,
        post_json(
            "/api/auth/signup",
            json!({ "email": "a@x.com", "password": "pw123456", "username": "alice2" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists or invalid data");
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let app = app();

    let (status, _, cookie) = send(
        &app,
        post_json(
            "/api/auth/signup",
            json!({ "email": "a@x.com", "password": "short", "username": "alice" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(cookie.is_none());
}

#[tokio::test]
async fn me_echoes_claims() {
    let app = app();
    let (signup_body, cookie) = signup_alice(&app).await;

    let (status, body, _) = send(&app, get_with_cookie("/api/auth/me", &cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], signup_body["user"]["id"]);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn me_without_cookie_is_401() {
    let app = app();

    let (status, body, _) = send(&app, get("/api/auth/me")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn me_with_tampered_cookie_is_403() {
    let app = app();
    let (_, cookie) = signup_alice(&app).await;

    // flip the last character of the signature
    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let (status, body, _) = send(&app, get_with_cookie("/api/auth/me", &tampered)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Max-Age=0"));

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn create_post_requires_auth() {
    let app = app();

    let (status, _, _) = send(
        &app,
        post_json("/api/posts", json!({ "content": "hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_post_leads_the_feed() {
    let app = app();
    let (signup_body, cookie) = signup_alice(&app).await;

    let (status, post, _) = send(
        &app,
        post_json_with_cookie("/api/posts", &cookie, json!({ "content": "hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["content"], "hello");
    assert_eq!(post["username"], "alice");
    assert_eq!(post["user_id"], signup_body["user"]["id"]);

    let (status, second, _) = send(
        &app,
        post_json_with_cookie("/api/posts", &cookie, json!({ "content": "again" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, feed, _) = send(&app, get("/api/posts")).await;
    assert_eq!(status, StatusCode::OK);

    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["id"], second["id"]);
    assert_eq!(feed[1]["id"], post["id"]);
    assert_eq!(feed[0]["avatar_url"], post["avatar_url"]);
}

#[tokio::test]
async fn feed_is_public() {
    let app = app();

    let (status, feed, _) = send(&app, get("/api/posts")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed, json!([]));
}

#[tokio::test]
async fn views_counter_increments_per_request() {
    let app = app();

    let (status, body, _) = send(&app, get("/api/stats/views")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["views"], 1);

    let (_, body, _) = send(&app, get("/api/stats/views")).await;
    assert_eq!(body["views"], 2);
}
