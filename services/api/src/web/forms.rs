//! services/api/src/web/forms.rs
//!
//! Handlers for form definitions and the answers users submit against them.
//!
//! | Method   | Path               | Notes |
//! |----------|--------------------|-------|
//! | `GET`    | `/form/{formName}` | Falls back to the example form, never 404 |
//! | `POST`   | `/form`            | 409 if the name is taken |
//! | `PUT`    | `/form`            | Upsert by name |
//! | `DELETE` | `/form/{formName}` | 200 with `deletedCount: 0` on a miss |
//! | `POST`   | `/profile/form`    | Stores a form answer |

use crate::web::error::{json_body, parse_user_id, HandlerError, MessageResponse};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use neurone_profile_core::domain::{AnsweredQuestion, Form, FormAnswer, FormQuestion};
use neurone_profile_core::forms::{example_form, validate_form};
use neurone_profile_core::time::{ClientInstant, Timing};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Request and Response Payloads
//=========================================================================================

/// A form definition as sent by the client, for both creation and replacement.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinitionRequest {
    pub form_name: String,
    pub questions: Vec<FormQuestion>,
}

#[derive(Serialize, ToSchema)]
pub struct FormResponse {
    pub message: String,
    pub form: Form,
}

#[derive(Serialize, ToSchema)]
pub struct FormSavedResponse {
    pub message: String,
    pub result: Form,
}

#[derive(Serialize, ToSchema)]
pub struct FormReplacedResponse {
    pub message: String,
    pub result: Form,
    /// `true` when the name was new and the form was created.
    pub created: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDeletedResponse {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormAnswerRequest {
    pub user_id: String,
    pub form_id: String,
    /// Epoch milliseconds or an RFC 3339 date.
    #[schema(value_type = Option<i64>)]
    pub client_date: Option<ClientInstant>,
    #[serde(default)]
    pub questions: Vec<AnsweredQuestion>,
}

#[derive(Serialize, ToSchema)]
pub struct FormAnswerResponse {
    pub message: String,
    pub result: FormAnswer,
}

fn validated_form(body: FormDefinitionRequest) -> Result<Form, HandlerError> {
    validate_form(&body.form_name, &body.questions)
        .map_err(|e| HandlerError::BadRequest(format!("Invalid form: {}", e)))?;
    Ok(Form {
        id: Uuid::new_v4(),
        form_name: body.form_name.trim().to_string(),
        questions: body.questions,
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Fetch a form definition by name.
///
/// A name that is not stored is answered with the example form, not an error.
#[utoipa::path(
    get,
    path = "/form/{form_name}",
    params(("form_name" = String, Path, description = "Unique name of the form.")),
    responses(
        (status = 200, description = "The stored form, or the example form if none matched", body = FormResponse),
        (status = 401, description = "Missing or rejected bearer token", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_form_handler(
    State(state): State<Arc<AppState>>,
    Path(form_name): Path<String>,
) -> Result<Json<FormResponse>, HandlerError> {
    let found = state
        .store
        .find_form(&form_name)
        .await
        .map_err(HandlerError::from_store("Error retrieving document."))?;

    let response = match found {
        Some(form) => FormResponse {
            message: "Form retrieved.".to_string(),
            form,
        },
        None => {
            warn!("Form {:?} not found, sending example form", form_name);
            FormResponse {
                message: "Form not found, sending example form instead.".to_string(),
                form: example_form(),
            }
        }
    };
    Ok(Json(response))
}

/// Save a new form definition.
#[utoipa::path(
    post,
    path = "/form",
    request_body = FormDefinitionRequest,
    responses(
        (status = 201, description = "Form saved", body = FormSavedResponse),
        (status = 400, description = "Invalid form definition", body = MessageResponse),
        (status = 409, description = "A form with that name already exists", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_form_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormDefinitionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let form = validated_form(json_body(payload)?)?;
    let saved = state
        .store
        .insert_form(form)
        .await
        .map_err(HandlerError::from_store("Couldn't save form in database."))?;

    info!("Saved form {:?} ({})", saved.form_name, saved.id);
    Ok((
        StatusCode::CREATED,
        Json(FormSavedResponse {
            message: "Form saved successfully".to_string(),
            result: saved,
        }),
    ))
}

/// Replace the questions of a form by name, creating the form if needed.
#[utoipa::path(
    put,
    path = "/form",
    request_body = FormDefinitionRequest,
    responses(
        (status = 200, description = "Form replaced or created", body = FormReplacedResponse),
        (status = 400, description = "Invalid form definition", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn replace_form_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormDefinitionRequest>, JsonRejection>,
) -> Result<Json<FormReplacedResponse>, HandlerError> {
    let form = validated_form(json_body(payload)?)?;
    let outcome = state
        .store
        .upsert_form(form)
        .await
        .map_err(HandlerError::from_store("Couldn't save form in database."))?;

    info!(
        "Form {:?} {}",
        outcome.form.form_name,
        if outcome.created { "created" } else { "replaced" }
    );
    Ok(Json(FormReplacedResponse {
        message: "Form updated successfully".to_string(),
        result: outcome.form,
        created: outcome.created,
    }))
}

/// Delete a form by name.
#[utoipa::path(
    delete,
    path = "/form/{form_name}",
    params(("form_name" = String, Path, description = "Unique name of the form.")),
    responses(
        (status = 200, description = "Deleted, or nothing to delete", body = FormDeletedResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn delete_form_handler(
    State(state): State<Arc<AppState>>,
    Path(form_name): Path<String>,
) -> Result<Json<FormDeletedResponse>, HandlerError> {
    let deleted_count = state
        .store
        .delete_form(&form_name)
        .await
        .map_err(HandlerError::from_store("Error while deleting the form."))?;

    let message = if deleted_count > 0 {
        info!("Deleted form {:?}", form_name);
        "Form deleted."
    } else {
        "Could not find form."
    };
    Ok(Json(FormDeletedResponse {
        message: message.to_string(),
        deleted_count,
    }))
}

/// Store a user's answers to a form.
#[utoipa::path(
    post,
    path = "/profile/form",
    request_body = FormAnswerRequest,
    responses(
        (status = 201, description = "Answer stored", body = FormAnswerResponse),
        (status = 400, description = "Malformed user id or missing form id", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn submit_form_answer_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormAnswerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let user_id = parse_user_id(&body.user_id)?;
    if body.form_id.trim().is_empty() {
        return Err(HandlerError::BadRequest("formId must not be empty".to_string()));
    }

    let answer = FormAnswer {
        id: Uuid::new_v4(),
        user_id,
        form_id: body.form_id,
        timing: Timing::received(body.client_date),
        questions: body.questions,
    };
    let saved = state
        .store
        .insert_form_answer(answer)
        .await
        .map_err(HandlerError::from_store("Error while saving form."))?;

    Ok((
        StatusCode::CREATED,
        Json(FormAnswerResponse {
            message: "Form answer saved successfully".to_string(),
            result: saved,
        }),
    ))
}
