mod common;

use axum::http::StatusCode;
use common::{Script, TestApp, USER};
use serde_json::json;

const OTHER_USER: &str = "5f8d0d55b54764421b7156ca";

async fn bookmark(app: &TestApp, user: &str, website: &str) -> StatusCode {
    let (status, _) = app
        .call(
            "POST",
            "/search/bookmark",
            Some(json!({
                "userId": user,
                "website": website,
                "websiteTitle": "A page",
                "websiteUrl": format!("/page/{}", website),
                "date": 1665000000000i64
            })),
        )
        .await;
    status
}

#[tokio::test]
async fn new_bookmark_starts_saved_with_one_log_entry() {
    let app = TestApp::new(Script::Grant);

    let (status, body) = app
        .call(
            "POST",
            "/search/bookmark",
            Some(json!({ "userId": USER, "website": "wiki-1" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["saved"], true);
    assert_eq!(body["data"]["log"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["log"][0]["saved"], true);
}

#[tokio::test]
async fn bookmark_is_unique_per_user_and_website() {
    let app = TestApp::new(Script::Grant);

    assert_eq!(bookmark(&app, USER, "wiki-1").await, StatusCode::CREATED);
    assert_eq!(bookmark(&app, USER, "wiki-1").await, StatusCode::CONFLICT);
    assert_eq!(bookmark(&app, OTHER_USER, "wiki-1").await, StatusCode::CREATED);
}

#[tokio::test]
async fn blank_website_is_rejected() {
    let app = TestApp::new(Script::Grant);

    assert_eq!(bookmark(&app, USER, "   ").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn each_change_appends_exactly_one_log_entry() {
    let app = TestApp::new(Script::Grant);
    bookmark(&app, USER, "wiki-1").await;
    bookmark(&app, USER, "wiki-2").await;

    let uri = format!("/search/bookmark/{}/wiki-1", USER);
    let (status, body) = app
        .call("PUT", &uri, Some(json!({ "saved": false, "date": 1665000001000i64 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bookmark edited successfully");
    let saved = body["data"].as_array().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["website"], "wiki-2");

    let (_, body) = app
        .call("PUT", &uri, Some(json!({ "saved": true })))
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, all) = app
        .call("GET", &format!("/search/bookmark/all/{}", USER), None)
        .await;
    let wiki1 = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["website"] == "wiki-1")
        .unwrap()
        .clone();
    assert_eq!(wiki1["saved"], true);
    let log = wiki1["log"].as_array().unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1]["saved"], false);
    assert_eq!(log[1]["timestampClient"], 1665000001000i64);
    assert_eq!(log[2]["saved"], true);
}

#[tokio::test]
async fn changing_a_missing_bookmark_reports_not_found() {
    let app = TestApp::new(Script::Grant);
    bookmark(&app, OTHER_USER, "wiki-1").await;

    let (status, body) = app
        .call(
            "PUT",
            &format!("/search/bookmark/{}/wiki-1", USER),
            Some(json!({ "saved": false })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Document not found", "data": [] }));
}

#[tokio::test]
async fn change_with_malformed_user_id_is_rejected() {
    let app = TestApp::new(Script::Grant);

    let (status, _) = app
        .call(
            "PUT",
            "/search/bookmark/nope/wiki-1",
            Some(json!({ "saved": false })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saved_listing_is_a_projection() {
    let app = TestApp::new(Script::Grant);

    let (_, empty) = app
        .call("GET", &format!("/search/bookmark/saved/{}", USER), None)
        .await;
    assert_eq!(empty["message"], "No bookmarks found.");
    assert_eq!(empty["data"], json!([]));

    bookmark(&app, USER, "wiki-1").await;
    let (status, body) = app
        .call("GET", &format!("/search/bookmark/saved/{}", USER), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bookmarks found");
    let entry = body["data"][0].as_object().unwrap();
    let mut keys: Vec<&str> = entry.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["id", "website", "websiteUrl"]);
}

#[tokio::test]
async fn snippets_and_user_data_are_scoped_to_the_user() {
    let app = TestApp::new(Script::Grant);
    bookmark(&app, USER, "wiki-1").await;
    bookmark(&app, OTHER_USER, "wiki-9").await;

    let (status, body) = app
        .call(
            "POST",
            "/search/snippet",
            Some(json!({
                "userId": USER,
                "snippet": "Glaciers are retreating.",
                "website": "wiki-1",
                "websiteUrl": "/page/wiki-1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Saved snippet successfully");

    let (_, snippets) = app
        .call("GET", &format!("/search/snippet/{}", USER), None)
        .await;
    assert_eq!(snippets["snippets"].as_array().unwrap().len(), 1);
    assert_eq!(snippets["snippets"][0]["snippet"], "Glaciers are retreating.");

    let (status, data) = app
        .call("GET", &format!("/search/user/{}", USER), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["bookmarks"].as_array().unwrap().len(), 1);
    assert_eq!(data["bookmarks"][0]["website"], "wiki-1");
    assert_eq!(data["snippets"].as_array().unwrap().len(), 1);

    let (_, other) = app
        .call("GET", &format!("/search/snippet/{}", OTHER_USER), None)
        .await;
    assert_eq!(other["snippets"], json!([]));
}

#[tokio::test]
async fn synthesis_answers_keep_their_kind() {
    let app = TestApp::new(Script::Grant);

    for complete in [false, true] {
        let (status, body) = app
            .call(
                "POST",
                "/synthesis",
                Some(json!({
                    "userId": USER,
                    "username": "ada",
                    "startTime": 1665000000000i64,
                    "question": "Summarise the findings",
                    "answer": "Glaciers retreat.",
                    "answerHTML": "<p>Glaciers retreat.</p>",
                    "completeAnswer": complete
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Synthesis answer saved.");
        assert_eq!(body["document"]["answerHTML"], "<p>Glaciers retreat.</p>");
    }

    let stored = app.store.synthesis_answers().await;
    assert_eq!(stored.len(), 2);
    assert!(!stored[0].complete_answer);
    assert!(stored[1].complete_answer);
    assert_eq!(stored[1].start_time, Some(1665000000000));
}

#[tokio::test]
async fn malformed_user_id_is_rejected_on_every_search_route() {
    let app = TestApp::new(Script::Grant);
    let bad = "not-a-user";

    for uri in [
        format!("/search/bookmark/saved/{}", bad),
        format!("/search/bookmark/all/{}", bad),
        format!("/search/snippet/{}", bad),
        format!("/search/user/{}", bad),
    ] {
        let (status, body) = app.call("GET", &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", uri);
        assert!(body["message"].is_string());
    }

    let posts = [
        ("/search/bookmark", json!({ "userId": bad, "website": "wiki-1" })),
        ("/search/snippet", json!({ "userId": bad, "snippet": "text" })),
        ("/synthesis", json!({ "userId": bad, "answer": "draft" })),
    ];
    for (uri, payload) in posts {
        let (status, _) = app.call("POST", uri, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "POST {}", uri);
    }

    let (_, data) = app
        .call("GET", &format!("/search/user/{}", USER), None)
        .await;
    assert_eq!(data["bookmarks"], json!([]));
    assert_eq!(data["snippets"], json!([]));
    assert!(app.store.synthesis_answers().await.is_empty());
}
