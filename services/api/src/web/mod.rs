pub mod error;
pub mod forms;
pub mod logger;
pub mod middleware;
pub mod profile;
pub mod rest;
pub mod search;
pub mod state;
pub mod synthesis;

pub use middleware::require_auth;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the complete application router.
///
/// Everything except the banner and the OpenAPI document sits behind
/// [`require_auth`].
pub fn router(state: Arc<AppState>) -> Router {
    // Browsers on any origin may call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
        ]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(rest::banner_handler))
        .route("/api-docs/openapi.json", get(rest::openapi_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Forms
        .route(
            "/form",
            post(forms::create_form_handler).put(forms::replace_form_handler),
        )
        .route(
            "/form/{form_name}",
            get(forms::get_form_handler).delete(forms::delete_form_handler),
        )
        // Profiles
        .route("/profile/number", post(profile::create_profile_handler))
        .route("/profile/form", post(forms::submit_form_answer_handler))
        // Telemetry
        .route("/logger/mouse", post(logger::mouse_handler))
        .route("/logger/keyboard", post(logger::keyboard_handler))
        .route("/logger/scroll", post(logger::scroll_handler))
        .route("/logger/search", post(logger::search_navigation_handler))
        // Search data
        .route("/search/bookmark", post(search::create_bookmark_handler))
        .route(
            "/search/bookmark/saved/{user_id}",
            get(search::saved_bookmarks_handler),
        )
        .route(
            "/search/bookmark/all/{user_id}",
            get(search::all_bookmarks_handler),
        )
        .route(
            "/search/bookmark/{user_id}/{website}",
            put(search::change_bookmark_handler),
        )
        .route("/search/snippet", post(search::create_snippet_handler))
        .route("/search/snippet/{user_id}", get(search::snippets_handler))
        .route("/search/user/{user_id}", get(search::user_search_data_handler))
        // Synthesis
        .route("/synthesis", post(synthesis::synthesis_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
