//! crates/neurone_profile_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The web layer only talks to the document store and the auth authority
//! through these traits, so either can be swapped without touching handlers.

use async_trait::async_trait;

use crate::domain::{
    BookmarkLogEntry, Form, FormAnswer, KeyboardLog, MouseLog, Profile, ScrollLog,
    SearchBookmark, SearchNavigationLog, SearchSnippet, SynthesisAnswer,
};
use crate::ids::UserId;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Document Store
//=========================================================================================

/// Outcome of replacing a form by name.
#[derive(Debug, Clone, PartialEq)]
pub struct FormUpsert {
    pub form: Form,
    /// `true` when no form with that name existed before.
    pub created: bool,
}

/// One collection per entity. Records arrive fully built (ids and server
/// timestamps already assigned); the store only persists and queries them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // --- Profiles ---
    async fn insert_profile(&self, profile: Profile) -> PortResult<Profile>;

    // --- Form Definitions ---
    async fn find_form(&self, form_name: &str) -> PortResult<Option<Form>>;

    /// Fails with [`PortError::Conflict`] if the name is taken.
    async fn insert_form(&self, form: Form) -> PortResult<Form>;

    /// Replaces the questions of the form with the same name, or stores
    /// `form` as new. An existing form keeps its id.
    async fn upsert_form(&self, form: Form) -> PortResult<FormUpsert>;

    /// Returns the number of forms deleted (0 or 1).
    async fn delete_form(&self, form_name: &str) -> PortResult<u64>;

    // --- Form Answers ---
    async fn insert_form_answer(&self, answer: FormAnswer) -> PortResult<FormAnswer>;

    // --- Telemetry ---
    async fn insert_mouse_log(&self, log: MouseLog) -> PortResult<MouseLog>;

    async fn insert_keyboard_log(&self, log: KeyboardLog) -> PortResult<KeyboardLog>;

    async fn insert_scroll_log(&self, log: ScrollLog) -> PortResult<ScrollLog>;

    async fn insert_search_navigation_log(
        &self,
        log: SearchNavigationLog,
    ) -> PortResult<SearchNavigationLog>;

    // --- Bookmarks ---
    /// Fails with [`PortError::Conflict`] if the user already has a bookmark
    /// for the same website.
    async fn insert_bookmark(&self, bookmark: SearchBookmark) -> PortResult<SearchBookmark>;

    /// Bookmarks of a user, optionally only those whose current flag is `saved`.
    async fn find_bookmarks(
        &self,
        user_id: &UserId,
        saved: Option<bool>,
    ) -> PortResult<Vec<SearchBookmark>>;

    /// Atomically overwrites the saved flag and appends `entry` to the log.
    /// Returns `None` when the user has no bookmark for `website`.
    async fn record_bookmark_change(
        &self,
        user_id: &UserId,
        website: &str,
        entry: BookmarkLogEntry,
    ) -> PortResult<Option<SearchBookmark>>;

    // --- Snippets ---
    async fn insert_snippet(&self, snippet: SearchSnippet) -> PortResult<SearchSnippet>;

    async fn find_snippets(&self, user_id: &UserId) -> PortResult<Vec<SearchSnippet>>;

    // --- Synthesis ---
    async fn insert_synthesis_answer(
        &self,
        answer: SynthesisAnswer,
    ) -> PortResult<SynthesisAnswer>;
}

//=========================================================================================
// Auth Authority
//=========================================================================================

/// What the external authority said about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthVerdict {
    Granted,
    /// Carries whatever message the authority answered with.
    Denied(String),
}

#[async_trait]
pub trait AuthorityService: Send + Sync {
    /// Asks the authority whether `token` may access the API. Transport
    /// failures are errors, not denials; callers must treat both as a refusal.
    async fn check_token(&self, token: &str) -> PortResult<AuthVerdict>;
}
