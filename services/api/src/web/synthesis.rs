//! services/api/src/web/synthesis.rs
//!
//! Handler for free-text synthesis answers, both autosaves and final
//! submissions.

use crate::web::error::{json_body, parse_user_id, HandlerError, MessageResponse};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use neurone_profile_core::domain::SynthesisAnswer;
use neurone_profile_core::time::{ClientInstant, Timing};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisAnswerRequest {
    pub user_id: String,
    pub username: Option<String>,
    /// When the editor was opened; epoch milliseconds or an RFC 3339 date.
    #[schema(value_type = Option<i64>)]
    pub start_time: Option<ClientInstant>,
    pub question: Option<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(rename = "answerHTML")]
    pub answer_html: Option<String>,
    #[serde(default)]
    pub complete_answer: bool,
    #[schema(value_type = Option<i64>)]
    pub client_date: Option<ClientInstant>,
}

#[derive(Serialize, ToSchema)]
pub struct SynthesisAnswerResponse {
    pub message: String,
    pub document: SynthesisAnswer,
}

/// Store a synthesis answer.
#[utoipa::path(
    post,
    path = "/synthesis",
    request_body = SynthesisAnswerRequest,
    responses(
        (status = 201, description = "Answer stored", body = SynthesisAnswerResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn synthesis_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesisAnswerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let answer = SynthesisAnswer {
        id: Uuid::new_v4(),
        user_id: parse_user_id(&body.user_id)?,
        username: body.username,
        start_time: body.start_time.map(ClientInstant::to_millis),
        start_time_date: body.start_time.and_then(ClientInstant::to_datetime),
        question: body.question,
        answer: body.answer,
        answer_html: body.answer_html,
        complete_answer: body.complete_answer,
        timing: Timing::received(body.client_date),
    };
    let saved = state
        .store
        .insert_synthesis_answer(answer)
        .await
        .map_err(HandlerError::from_store("Error while saving answer"))?;

    info!(
        "Stored {} synthesis answer for user {}",
        if saved.complete_answer { "final" } else { "autosaved" },
        saved.user_id
    );
    Ok((
        StatusCode::CREATED,
        Json(SynthesisAnswerResponse {
            message: "Synthesis answer saved.".to_string(),
            document: saved,
        }),
    ))
}
