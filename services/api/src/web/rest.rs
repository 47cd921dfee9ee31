//! services/api/src/web/rest.rs
//!
//! Contains the public, unauthenticated endpoints and the master definition
//! for the OpenAPI specification.

use crate::web::{error, forms, logger, profile, search, state::AppState, synthesis};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        forms::get_form_handler,
        forms::create_form_handler,
        forms::replace_form_handler,
        forms::delete_form_handler,
        forms::submit_form_answer_handler,
        profile::create_profile_handler,
        logger::mouse_handler,
        logger::keyboard_handler,
        logger::scroll_handler,
        logger::search_navigation_handler,
        search::create_bookmark_handler,
        search::saved_bookmarks_handler,
        search::all_bookmarks_handler,
        search::change_bookmark_handler,
        search::create_snippet_handler,
        search::snippets_handler,
        search::user_search_data_handler,
        synthesis::synthesis_handler,
    ),
    components(schemas(error::MessageResponse)),
    modifiers(&BearerSecurity),
    tags(
        (name = "Neurone Profile API", description = "User profiles, forms, telemetry, search data and synthesis answers.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by every protected path.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// `GET /` - plain-text banner, useful as a liveness probe.
pub async fn banner_handler(State(state): State<Arc<AppState>>) -> String {
    format!(
        "This is the neurone-profile backend on port {}!",
        state.config.bind_address.port()
    )
}

/// `GET /api-docs/openapi.json`
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
