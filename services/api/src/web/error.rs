//! services/api/src/web/error.rs
//!
//! The error returned by request handlers and the auth middleware, and its
//! mapping onto HTTP responses. Every error body is `{"message": "..."}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use neurone_profile_core::ids::UserId;
use neurone_profile_core::ports::PortError;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

/// A response body that only carries a human-readable message.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    /// The message is generic; the cause is only logged.
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    /// Maps a store failure onto a response. Conflicts keep the store's
    /// description; anything else is logged and replaced by `public_message`.
    pub fn from_store(public_message: &'static str) -> impl FnOnce(PortError) -> HandlerError {
        move |e| match e {
            PortError::Conflict(detail) => {
                warn!("{}: {}", public_message, detail);
                HandlerError::Conflict(detail)
            }
            other => {
                error!("{}: {:?}", public_message, other);
                HandlerError::Internal(public_message.to_string())
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = MessageResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, turning axum's rejection into a `{"message"}` 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| HandlerError::BadRequest(rejection.body_text()))
}

/// Validates a user id taken from a path segment or a body field.
pub fn parse_user_id(raw: &str) -> Result<UserId, HandlerError> {
    UserId::parse(raw).map_err(|e| {
        HandlerError::BadRequest(format!("User Id (userId) is not a valid id: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_hide_details_unless_conflict() {
        let internal = HandlerError::from_store("Error while saving")(PortError::Unexpected(
            "connection refused".into(),
        ));
        assert_eq!(internal.to_string(), "Error while saving");
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let conflict =
            HandlerError::from_store("Error while saving")(PortError::Conflict("taken".into()));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "taken");
    }

    #[test]
    fn malformed_user_id_is_a_bad_request() {
        let err = parse_user_id("not-an-id").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(parse_user_id("633dfd3a28e1b1eabad40923").is_ok());
    }
}
