//! services/api/src/web/logger.rs
//!
//! Handlers for behavioral telemetry: mouse, keyboard, scroll and search
//! navigation events. Each request appends one record; the server stamps its
//! own receipt time and ignores any server time the client sends.

use crate::web::error::{json_body, parse_user_id, HandlerError, MessageResponse};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use neurone_profile_core::domain::{KeyboardLog, MouseLog, ScrollLog, SearchNavigationLog};
use neurone_profile_core::time::{ClientInstant, Timing};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Reported by browsers that omit a key code.
const UNKNOWN_KEY_CODE: i64 = -1;

//=========================================================================================
// Mouse
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MouseLogRequest {
    pub user_id: String,
    pub user_email: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    /// Epoch milliseconds or an RFC 3339 date.
    #[schema(value_type = Option<i64>)]
    pub date_client: Option<ClientInstant>,
    #[serde(rename = "x_win")]
    pub x_win: Option<f64>,
    #[serde(rename = "y_win")]
    pub y_win: Option<f64>,
    #[serde(rename = "w_win")]
    pub w_win: Option<f64>,
    #[serde(rename = "h_win")]
    pub h_win: Option<f64>,
    #[serde(rename = "x_doc")]
    pub x_doc: Option<f64>,
    #[serde(rename = "y_doc")]
    pub y_doc: Option<f64>,
    #[serde(rename = "w_doc")]
    pub w_doc: Option<f64>,
    #[serde(rename = "h_doc")]
    pub h_doc: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct MouseLoggedResponse {
    pub message: String,
    pub document: MouseLog,
}

/// Append a mouse event.
#[utoipa::path(
    post,
    path = "/logger/mouse",
    request_body = MouseLogRequest,
    responses(
        (status = 201, description = "Event stored", body = MouseLoggedResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn mouse_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MouseLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let log = MouseLog {
        id: Uuid::new_v4(),
        user_id: parse_user_id(&body.user_id)?,
        user_email: body.user_email,
        event_type: body.event_type,
        source: body.source,
        url: body.url,
        timing: Timing::received(body.date_client),
        x_win: body.x_win,
        y_win: body.y_win,
        w_win: body.w_win,
        h_win: body.h_win,
        x_doc: body.x_doc,
        y_doc: body.y_doc,
        w_doc: body.w_doc,
        h_doc: body.h_doc,
    };
    let saved = state
        .store
        .insert_mouse_log(log)
        .await
        .map_err(HandlerError::from_store("Error saving mouse log."))?;

    Ok((
        StatusCode::CREATED,
        Json(MouseLoggedResponse {
            message: "Logged mouse.".to_string(),
            document: saved,
        }),
    ))
}

//=========================================================================================
// Keyboard
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardLogRequest {
    pub user_id: String,
    pub user_email: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub url: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub date_client: Option<ClientInstant>,
    pub key: Option<String>,
    pub code: Option<String>,
    pub key_code: Option<i64>,
    pub which: Option<i64>,
    pub char_code: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct KeyboardLoggedResponse {
    pub message: String,
    pub document: KeyboardLog,
}

/// Append a keyboard event. Missing key codes are stored as `-1`.
#[utoipa::path(
    post,
    path = "/logger/keyboard",
    request_body = KeyboardLogRequest,
    responses(
        (status = 201, description = "Event stored", body = KeyboardLoggedResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn keyboard_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KeyboardLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let log = KeyboardLog {
        id: Uuid::new_v4(),
        user_id: parse_user_id(&body.user_id)?,
        user_email: body.user_email,
        event_type: body.event_type,
        source: body.source,
        target: body.target,
        url: body.url,
        timing: Timing::received(body.date_client),
        key: body.key,
        code: body.code,
        key_code: body.key_code.unwrap_or(UNKNOWN_KEY_CODE),
        which: body.which.unwrap_or(UNKNOWN_KEY_CODE),
        char_code: body.char_code.unwrap_or(UNKNOWN_KEY_CODE),
    };
    let saved = state
        .store
        .insert_keyboard_log(log)
        .await
        .map_err(HandlerError::from_store("Error saving keyboard log."))?;

    Ok((
        StatusCode::CREATED,
        Json(KeyboardLoggedResponse {
            message: "Logged keyboard.".to_string(),
            document: saved,
        }),
    ))
}

//=========================================================================================
// Scroll
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrollLogRequest {
    pub user_id: String,
    pub user_email: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub date_client: Option<ClientInstant>,
    #[serde(rename = "x_scr")]
    pub x_scr: Option<f64>,
    #[serde(rename = "y_scr")]
    pub y_scr: Option<f64>,
    #[serde(rename = "w_win")]
    pub w_win: Option<f64>,
    #[serde(rename = "h_win")]
    pub h_win: Option<f64>,
    #[serde(rename = "w_doc")]
    pub w_doc: Option<f64>,
    #[serde(rename = "h_doc")]
    pub h_doc: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct ScrollLoggedResponse {
    pub message: String,
    pub document: ScrollLog,
}

/// Append a scroll event.
#[utoipa::path(
    post,
    path = "/logger/scroll",
    request_body = ScrollLogRequest,
    responses(
        (status = 201, description = "Event stored", body = ScrollLoggedResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn scroll_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScrollLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let log = ScrollLog {
        id: Uuid::new_v4(),
        user_id: parse_user_id(&body.user_id)?,
        user_email: body.user_email,
        event_type: body.event_type,
        source: body.source,
        url: body.url,
        timing: Timing::received(body.date_client),
        x_scr: body.x_scr,
        y_scr: body.y_scr,
        w_win: body.w_win,
        h_win: body.h_win,
        w_doc: body.w_doc,
        h_doc: body.h_doc,
    };
    let saved = state
        .store
        .insert_scroll_log(log)
        .await
        .map_err(HandlerError::from_store("Error saving scroll log."))?;

    Ok((
        StatusCode::CREATED,
        Json(ScrollLoggedResponse {
            message: "Logged Scroll.".to_string(),
            document: saved,
        }),
    ))
}

//=========================================================================================
// Search Navigation
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchNavigationLogRequest {
    pub user_id: String,
    pub user_email: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub date_client: Option<ClientInstant>,
    pub description: Option<String>,
    pub query: Option<String>,
    pub selected_page_name: Option<String>,
    pub selected_page_url: Option<String>,
    pub relevant: Option<bool>,
    pub current_page_number: Option<u32>,
    pub result_document_rank: Option<u32>,
    pub result_number_total: Option<u32>,
    #[serde(default)]
    pub search_results: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SearchNavigationLoggedResponse {
    pub message: String,
    pub document: SearchNavigationLog,
}

/// Append a search navigation step (query, page enter, page exit).
#[utoipa::path(
    post,
    path = "/logger/search",
    request_body = SearchNavigationLogRequest,
    responses(
        (status = 201, description = "Event stored", body = SearchNavigationLoggedResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn search_navigation_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchNavigationLogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let log = SearchNavigationLog {
        id: Uuid::new_v4(),
        user_id: parse_user_id(&body.user_id)?,
        user_email: body.user_email,
        timing: Timing::received(body.date_client),
        description: body.description,
        query: body.query,
        selected_page_name: body.selected_page_name,
        selected_page_url: body.selected_page_url,
        relevant: body.relevant,
        current_page_number: body.current_page_number,
        result_document_rank: body.result_document_rank,
        result_number_total: body.result_number_total,
        search_results: body.search_results,
    };
    let saved = state
        .store
        .insert_search_navigation_log(log)
        .await
        .map_err(HandlerError::from_store(
            "Error while saving search navigation log in database",
        ))?;

    Ok((
        StatusCode::CREATED,
        Json(SearchNavigationLoggedResponse {
            message: "Logged search navigation".to_string(),
            document: saved,
        }),
    ))
}
