mod common;

use axum::http::StatusCode;
use common::{Script, TestApp, USER};
use neurone_profile_core::forms::EXAMPLE_FORM_NAME;
use serde_json::{json, Value};

fn feedback_form(title: &str) -> Value {
    json!({
        "formName": "feedback",
        "questions": [
            { "type": "input", "name": "q1", "title": title, "validators": { "required": true } },
            { "type": "radio", "name": "q2", "title": "Pick one", "choices": ["yes", "no"] },
            { "type": "scale", "name": "q3", "title": "How useful?",
              "scaleOptions": { "min": 1, "max": 5, "step": 1 } }
        ]
    })
}

#[tokio::test]
async fn unknown_form_falls_back_to_the_example() {
    let app = TestApp::new(Script::Grant);

    let (status, body) = app.call("GET", "/form/missing", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Form not found, sending example form instead.");
    assert_eq!(body["form"]["formName"], EXAMPLE_FORM_NAME);
    assert!(!body["form"]["questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn created_form_is_served_by_name() {
    let app = TestApp::new(Script::Grant);

    let (status, created) = app.call("POST", "/form", Some(feedback_form("Name?"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Form saved successfully");

    let (status, fetched) = app.call("GET", "/form/feedback", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["message"], "Form retrieved.");
    assert_eq!(fetched["form"], created["result"]);
    assert_eq!(fetched["form"]["questions"][1]["choices"], json!(["yes", "no"]));
}

#[tokio::test]
async fn duplicate_form_name_conflicts() {
    let app = TestApp::new(Script::Grant);

    app.call("POST", "/form", Some(feedback_form("Name?"))).await;
    let (status, body) = app.call("POST", "/form", Some(feedback_form("Other"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn invalid_definition_is_rejected_and_not_stored() {
    let app = TestApp::new(Script::Grant);
    let form = json!({
        "formName": "broken",
        "questions": [{ "type": "radio", "name": "q1", "title": "Pick", "choices": [] }]
    });

    let (status, body) = app.call("POST", "/form", Some(form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid form"));

    let (_, fetched) = app.call("GET", "/form/broken", None).await;
    assert_eq!(fetched["form"]["formName"], EXAMPLE_FORM_NAME);
}

#[tokio::test]
async fn unknown_question_type_is_a_bad_request() {
    let app = TestApp::new(Script::Grant);
    let form = json!({
        "formName": "odd",
        "questions": [{ "type": "slider", "title": "?" }]
    });

    let (status, body) = app.call("POST", "/form", Some(form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn put_creates_then_replaces_keeping_the_id() {
    let app = TestApp::new(Script::Grant);

    let (status, first) = app.call("PUT", "/form", Some(feedback_form("Name?"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["created"], true);

    let (status, second) = app.call("PUT", "/form", Some(feedback_form("Full name?"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["result"]["id"], first["result"]["id"]);

    let (_, fetched) = app.call("GET", "/form/feedback", None).await;
    assert_eq!(fetched["form"]["questions"][0]["title"], "Full name?");
}

#[tokio::test]
async fn delete_reports_how_many_forms_went_away() {
    let app = TestApp::new(Script::Grant);
    app.call("POST", "/form", Some(feedback_form("Name?"))).await;

    let (status, body) = app.call("DELETE", "/form/feedback", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Form deleted.", "deletedCount": 1 }));

    let (status, body) = app.call("DELETE", "/form/feedback", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Could not find form.", "deletedCount": 0 }));
}

#[tokio::test]
async fn form_answer_is_stored_with_server_time() {
    let app = TestApp::new(Script::Grant);
    let answer = json!({
        "userId": USER,
        "formId": "feedback",
        "clientDate": 1665000000000i64,
        "questions": [
            { "question": "Name?", "formType": "input", "answer": "Ada" },
            { "question": "Topics", "formType": "checkbox",
              "answerArray": [{ "question": "rust", "answer": true }] }
        ]
    });

    let (status, body) = app.call("POST", "/profile/form", Some(answer)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["result"]["timestampClient"], 1665000000000i64);
    assert!(body["result"]["timestampServer"].as_i64().unwrap() > 1665000000000);
    let stored = app.store.form_answers().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id.as_str(), USER);
    assert_eq!(stored[0].questions[1].answer_array.len(), 1);
}

#[tokio::test]
async fn form_answer_with_malformed_user_is_not_stored() {
    let app = TestApp::new(Script::Grant);

    let (status, _) = app
        .call(
            "POST",
            "/profile/form",
            Some(json!({ "userId": "not-an-id", "formId": "feedback", "questions": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            "POST",
            "/profile/form",
            Some(json!({ "userId": USER, "formId": "  ", "questions": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(app.store.form_answers().await.is_empty());
}

#[tokio::test]
async fn profile_is_created() {
    let app = TestApp::new(Script::Grant);

    let (status, body) = app
        .call(
            "POST",
            "/profile/number",
            Some(json!({ "email": "ada@example.com", "number": 42 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "created");
    assert_eq!(body["object"]["email"], "ada@example.com");
    assert_eq!(app.store.profiles().await.len(), 1);
}

#[tokio::test]
async fn numeric_and_boolean_answers_are_stored_as_text() {
    let app = TestApp::new(Script::Grant);
    let answer = json!({
        "userId": USER,
        "formId": "feedback",
        "questions": [
            { "question": "How useful?", "formType": "scale", "answer": 50 },
            { "question": "Stars", "formType": "rating", "answer": 4.5 },
            { "question": "Agree?", "formType": "radio", "answer": false }
        ]
    });

    let (status, body) = app.call("POST", "/profile/form", Some(answer)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["result"]["questions"][0]["answer"], "50");
    let stored = app.store.form_answers().await;
    let answers: Vec<Option<&str>> = stored[0]
        .questions
        .iter()
        .map(|q| q.answer.as_deref())
        .collect();
    assert_eq!(answers, vec![Some("50"), Some("4.5"), Some("false")]);
}
