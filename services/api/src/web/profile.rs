//! services/api/src/web/profile.rs
//!
//! Handler for the minimal profile record.

use crate::web::error::{json_body, HandlerError, MessageResponse};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use neurone_profile_core::domain::Profile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize, ToSchema)]
pub struct ProfileRequest {
    pub email: Option<String>,
    pub number: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub object: Profile,
}

/// Create a profile from an email and a number.
#[utoipa::path(
    post,
    path = "/profile/number",
    request_body = ProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Malformed body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_profile_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let profile = Profile {
        id: Uuid::new_v4(),
        email: body.email,
        number: body.number,
    };
    let saved = state
        .store
        .insert_profile(profile)
        .await
        .map_err(HandlerError::from_store("Error while saving profile."))?;

    info!("Created profile {}", saved.id);
    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            message: "created".to_string(),
            object: saved,
        }),
    ))
}
