//! Drives `HttpAuthority` against a throwaway authority on an ephemeral port.

use axum::{http::StatusCode, routing::post, Json, Router};
use neurone_profile_core::ports::{AuthVerdict, AuthorityService};
use profile_api::adapters::HttpAuthority;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;

async fn check_auth(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["jwt"].as_str() {
        Some("good") => (StatusCode::OK, Json(json!({ "message": "OK" }))),
        Some("stale") => (StatusCode::OK, Json(json!({ "message": "Token expired" }))),
        Some("misconfigured") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "OK" })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid token" })),
        ),
    }
}

async fn spawn_authority() -> SocketAddr {
    let app = Router::new().route("/auth/checkauth", post(check_auth));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HttpAuthority {
    HttpAuthority::new(
        format!("http://{}/auth/checkauth", addr),
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn ok_message_grants() {
    let addr = spawn_authority().await;

    let verdict = client(addr).check_token("good").await.unwrap();

    assert_eq!(verdict, AuthVerdict::Granted);
}

#[tokio::test]
async fn any_other_message_denies() {
    let addr = spawn_authority().await;
    let authority = client(addr);

    assert_eq!(
        authority.check_token("stale").await.unwrap(),
        AuthVerdict::Denied("Token expired".to_string())
    );
    assert_eq!(
        authority.check_token("forged").await.unwrap(),
        AuthVerdict::Denied("Invalid token".to_string())
    );
}

#[tokio::test]
async fn error_status_denies_even_with_ok_message() {
    let addr = spawn_authority().await;

    assert_eq!(
        client(addr).check_token("misconfigured").await.unwrap(),
        AuthVerdict::Denied("OK".to_string())
    );
}

#[tokio::test]
async fn error_status_without_json_denies_with_the_status() {
    let app = Router::new().route(
        "/auth/checkauth",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    assert_eq!(
        client(addr).check_token("good").await.unwrap(),
        AuthVerdict::Denied("502 Bad Gateway".to_string())
    );
}

#[tokio::test]
async fn unreachable_authority_is_an_error() {
    // Bind and drop to get a port nothing listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    assert!(client(addr).check_token("good").await.is_err());
}

#[tokio::test]
async fn non_json_answer_is_an_error() {
    let app = Router::new().route("/auth/checkauth", post(|| async { "OK" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    assert!(client(addr).check_token("good").await.is_err());
}
