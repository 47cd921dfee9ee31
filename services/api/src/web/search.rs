//! services/api/src/web/search.rs
//!
//! Handlers for the data users keep while searching: bookmarks and snippets.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/search/bookmark` | Creates a saved bookmark |
//! | `GET`  | `/search/bookmark/saved/{userId}` | Saved bookmarks, website and url only |
//! | `GET`  | `/search/bookmark/all/{userId}` | Every bookmark with its log |
//! | `PUT`  | `/search/bookmark/{userId}/{website}` | Toggle; appends to the log |
//! | `POST` | `/search/snippet` | |
//! | `GET`  | `/search/snippet/{userId}` | |
//! | `GET`  | `/search/user/{userId}` | Bookmarks and snippets together |

use crate::web::error::{json_body, parse_user_id, HandlerError, MessageResponse};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use neurone_profile_core::domain::{
    BookmarkLogEntry, BookmarkSummary, SearchBookmark, SearchSnippet,
};
use neurone_profile_core::time::{ClientInstant, Timing};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Request and Response Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmarkRequest {
    pub user_id: String,
    pub website: String,
    pub website_title: Option<String>,
    pub website_url: Option<String>,
    /// Epoch milliseconds or an RFC 3339 date.
    #[schema(value_type = Option<i64>)]
    pub date: Option<ClientInstant>,
}

#[derive(Deserialize, ToSchema)]
pub struct BookmarkChangeRequest {
    pub saved: bool,
    #[schema(value_type = Option<i64>)]
    pub date: Option<ClientInstant>,
}

#[derive(Serialize, ToSchema)]
pub struct BookmarkResponse {
    pub message: String,
    pub data: SearchBookmark,
}

#[derive(Serialize, ToSchema)]
pub struct BookmarkListResponse {
    pub message: String,
    pub data: Vec<SearchBookmark>,
}

#[derive(Serialize, ToSchema)]
pub struct BookmarkSummaryListResponse {
    pub message: String,
    pub data: Vec<BookmarkSummary>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSnippetRequest {
    pub user_id: String,
    pub snippet: String,
    pub website: Option<String>,
    pub website_url: Option<String>,
    pub website_title: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub date: Option<ClientInstant>,
}

#[derive(Serialize, ToSchema)]
pub struct SnippetResponse {
    pub message: String,
    pub document: SearchSnippet,
}

#[derive(Serialize, ToSchema)]
pub struct SnippetListResponse {
    pub message: String,
    pub snippets: Vec<SearchSnippet>,
}

#[derive(Serialize, ToSchema)]
pub struct UserSearchDataResponse {
    pub message: String,
    pub bookmarks: Vec<SearchBookmark>,
    pub snippets: Vec<SearchSnippet>,
}

fn bookmarks_message(count: usize) -> String {
    if count == 0 {
        "No bookmarks found.".to_string()
    } else {
        "Bookmarks found".to_string()
    }
}

//=========================================================================================
// Bookmarks
//=========================================================================================

/// Bookmark a search result. The bookmark starts out saved.
#[utoipa::path(
    post,
    path = "/search/bookmark",
    request_body = NewBookmarkRequest,
    responses(
        (status = 201, description = "Bookmark created", body = BookmarkResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 409, description = "The user already bookmarked this website", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_bookmark_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewBookmarkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let user_id = parse_user_id(&body.user_id)?;
    if body.website.trim().is_empty() {
        return Err(HandlerError::BadRequest("website must not be empty".to_string()));
    }

    let bookmark = SearchBookmark::created(
        user_id,
        body.website,
        body.website_title,
        body.website_url,
        Timing::received(body.date),
    );
    let saved = state
        .store
        .insert_bookmark(bookmark)
        .await
        .map_err(HandlerError::from_store("Error while saving bookmark."))?;

    info!("User {} bookmarked {:?}", saved.user_id, saved.website);
    Ok((
        StatusCode::CREATED,
        Json(BookmarkResponse {
            message: "Bookmark created.".to_string(),
            data: saved,
        }),
    ))
}

/// List the bookmarks a user currently has saved.
#[utoipa::path(
    get,
    path = "/search/bookmark/saved/{user_id}",
    params(("user_id" = String, Path, description = "24-character hexadecimal user id.")),
    responses(
        (status = 200, description = "Saved bookmarks (possibly none)", body = BookmarkSummaryListResponse),
        (status = 400, description = "Malformed user id", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn saved_bookmarks_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<BookmarkSummaryListResponse>, HandlerError> {
    let user_id = parse_user_id(&user_id)?;
    let bookmarks = state
        .store
        .find_bookmarks(&user_id, Some(true))
        .await
        .map_err(HandlerError::from_store(
            "Error while retrieving bookmarks for the user.",
        ))?;

    Ok(Json(BookmarkSummaryListResponse {
        message: bookmarks_message(bookmarks.len()),
        data: bookmarks.iter().map(BookmarkSummary::from).collect(),
    }))
}

/// List every bookmark of a user, saved or not, with their logs.
#[utoipa::path(
    get,
    path = "/search/bookmark/all/{user_id}",
    params(("user_id" = String, Path, description = "24-character hexadecimal user id.")),
    responses(
        (status = 200, description = "All bookmarks (possibly none)", body = BookmarkListResponse),
        (status = 400, description = "Malformed user id", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn all_bookmarks_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<BookmarkListResponse>, HandlerError> {
    let user_id = parse_user_id(&user_id)?;
    let bookmarks = state
        .store
        .find_bookmarks(&user_id, None)
        .await
        .map_err(HandlerError::from_store(
            "Error while retrieving bookmarks for the user.",
        ))?;

    Ok(Json(BookmarkListResponse {
        message: bookmarks_message(bookmarks.len()),
        data: bookmarks,
    }))
}

/// Set a bookmark's saved flag and append the change to its log.
///
/// Answers with the user's saved bookmarks after the change.
#[utoipa::path(
    put,
    path = "/search/bookmark/{user_id}/{website}",
    request_body = BookmarkChangeRequest,
    params(
        ("user_id" = String, Path, description = "24-character hexadecimal user id."),
        ("website" = String, Path, description = "Unique name of the bookmarked page.")
    ),
    responses(
        (status = 200, description = "Saved bookmarks after the change; empty with \"Document not found\" if there was no such bookmark", body = BookmarkListResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn change_bookmark_handler(
    State(state): State<Arc<AppState>>,
    Path((user_id, website)): Path<(String, String)>,
    payload: Result<Json<BookmarkChangeRequest>, JsonRejection>,
) -> Result<Json<BookmarkListResponse>, HandlerError> {
    let user_id = parse_user_id(&user_id)?;
    let body = json_body(payload)?;

    let entry = BookmarkLogEntry {
        saved: body.saved,
        timing: Timing::received(body.date),
    };
    let changed = state
        .store
        .record_bookmark_change(&user_id, &website, entry)
        .await
        .map_err(HandlerError::from_store("Error while updating bookmark."))?;

    if changed.is_none() {
        warn!("No bookmark of {:?} for user {}", website, user_id);
        return Ok(Json(BookmarkListResponse {
            message: "Document not found".to_string(),
            data: Vec::new(),
        }));
    }

    let saved = state
        .store
        .find_bookmarks(&user_id, Some(true))
        .await
        .map_err(HandlerError::from_store(
            "Error while retrieving bookmarks for the user.",
        ))?;
    Ok(Json(BookmarkListResponse {
        message: "Bookmark edited successfully".to_string(),
        data: saved,
    }))
}

//=========================================================================================
// Snippets
//=========================================================================================

/// Save a text excerpt.
#[utoipa::path(
    post,
    path = "/search/snippet",
    request_body = NewSnippetRequest,
    responses(
        (status = 201, description = "Snippet stored", body = SnippetResponse),
        (status = 400, description = "Malformed user id or body", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_snippet_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewSnippetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let body = json_body(payload)?;
    let snippet = SearchSnippet {
        id: Uuid::new_v4(),
        user_id: parse_user_id(&body.user_id)?,
        snippet: body.snippet,
        website: body.website,
        website_url: body.website_url,
        website_title: body.website_title,
        timing: Timing::received(body.date),
    };
    let saved = state
        .store
        .insert_snippet(snippet)
        .await
        .map_err(HandlerError::from_store("Error while saving snippet."))?;

    Ok((
        StatusCode::CREATED,
        Json(SnippetResponse {
            message: "Saved snippet successfully".to_string(),
            document: saved,
        }),
    ))
}

/// List a user's snippets.
#[utoipa::path(
    get,
    path = "/search/snippet/{user_id}",
    params(("user_id" = String, Path, description = "24-character hexadecimal user id.")),
    responses(
        (status = 200, description = "Snippets (possibly none)", body = SnippetListResponse),
        (status = 400, description = "Malformed user id", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn snippets_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SnippetListResponse>, HandlerError> {
    let user_id = parse_user_id(&user_id)?;
    let snippets = state
        .store
        .find_snippets(&user_id)
        .await
        .map_err(HandlerError::from_store("Error while getting search snippets."))?;

    info!("Found {} snippets for user {}", snippets.len(), user_id);
    Ok(Json(SnippetListResponse {
        message: "Success".to_string(),
        snippets,
    }))
}

/// Everything a user kept while searching: all bookmarks and snippets.
#[utoipa::path(
    get,
    path = "/search/user/{user_id}",
    params(("user_id" = String, Path, description = "24-character hexadecimal user id.")),
    responses(
        (status = 200, description = "Bookmarks and snippets", body = UserSearchDataResponse),
        (status = 400, description = "Malformed user id", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn user_search_data_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSearchDataResponse>, HandlerError> {
    let user_id = parse_user_id(&user_id)?;
    let bookmarks = state
        .store
        .find_bookmarks(&user_id, None)
        .await
        .map_err(HandlerError::from_store("Error while getting user data"))?;
    let snippets = state
        .store
        .find_snippets(&user_id)
        .await
        .map_err(HandlerError::from_store("Error while getting user data"))?;

    Ok(Json(UserSearchDataResponse {
        message: "Success".to_string(),
        bookmarks,
        snippets,
    }))
}
