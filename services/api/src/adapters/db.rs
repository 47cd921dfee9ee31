//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DocumentStore` port from the `core` crate. Every collection is a
//! PostgreSQL table holding the serialized document in a `JSONB` column, next
//! to copies of the fields used for lookups.

use async_trait::async_trait;
use neurone_profile_core::domain::{
    BookmarkLogEntry, Form, FormAnswer, KeyboardLog, MouseLog, Profile, ScrollLog,
    SearchBookmark, SearchNavigationLog, SearchSnippet, SynthesisAnswer,
};
use neurone_profile_core::ids::UserId;
use neurone_profile_core::ports::{DocumentStore, FormUpsert, PortError, PortResult};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Inserts a document into one of the append-only, user-keyed collections.
    async fn insert_user_document<T>(
        &self,
        collection: Collection,
        id: Uuid,
        user_id: &UserId,
        document: &T,
    ) -> PortResult<()>
    where
        T: Serialize + Sync,
    {
        let sql = format!(
            "INSERT INTO {} (id, user_id, doc) VALUES ($1, $2, $3)",
            collection.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(user_id.as_str())
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}

/// The append-only collections that share the `(id, user_id, doc)` layout.
#[derive(Clone, Copy, Debug)]
enum Collection {
    FormAnswers,
    MouseLogs,
    KeyboardLogs,
    ScrollLogs,
    SearchNavigationLogs,
    SearchSnippets,
    SynthesisAnswers,
}

impl Collection {
    fn table(self) -> &'static str {
        match self {
            Collection::FormAnswers => "form_answers",
            Collection::MouseLogs => "mouse_logs",
            Collection::KeyboardLogs => "keyboard_logs",
            Collection::ScrollLogs => "scroll_logs",
            Collection::SearchNavigationLogs => "search_navigation_logs",
            Collection::SearchSnippets => "search_snippets",
            Collection::SynthesisAnswers => "synthesis_answers",
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for DbAdapter {
    async fn insert_profile(&self, profile: Profile) -> PortResult<Profile> {
        sqlx::query("INSERT INTO profiles (id, doc) VALUES ($1, $2)")
            .bind(profile.id)
            .bind(Json(&profile))
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(profile)
    }

    async fn find_form(&self, form_name: &str) -> PortResult<Option<Form>> {
        let record = sqlx::query_scalar::<_, Json<Form>>("SELECT doc FROM forms WHERE name = $1")
            .bind(form_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.map(|Json(form)| form))
    }

    async fn insert_form(&self, form: Form) -> PortResult<Form> {
        sqlx::query("INSERT INTO forms (id, name, doc) VALUES ($1, $2, $3)")
            .bind(form.id)
            .bind(&form.form_name)
            .bind(Json(&form))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    PortError::Conflict(format!("Form {} already exists", form.form_name))
                } else {
                    unexpected(e)
                }
            })?;
        Ok(form)
    }

    async fn upsert_form(&self, form: Form) -> PortResult<FormUpsert> {
        // `xmax = 0` only holds for rows this statement inserted.
        let (Json(stored), created) = sqlx::query_as::<_, (Json<Form>, bool)>(
            "INSERT INTO forms (id, name, doc) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO UPDATE \
             SET doc = jsonb_set(forms.doc, '{questions}', EXCLUDED.doc -> 'questions') \
             RETURNING doc, (xmax = 0) AS created",
        )
        .bind(form.id)
        .bind(&form.form_name)
        .bind(Json(&form))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(FormUpsert {
            form: stored,
            created,
        })
    }

    async fn delete_form(&self, form_name: &str) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM forms WHERE name = $1")
            .bind(form_name)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }

    async fn insert_form_answer(&self, answer: FormAnswer) -> PortResult<FormAnswer> {
        self.insert_user_document(Collection::FormAnswers, answer.id, &answer.user_id, &answer)
            .await?;
        Ok(answer)
    }

    async fn insert_mouse_log(&self, log: MouseLog) -> PortResult<MouseLog> {
        self.insert_user_document(Collection::MouseLogs, log.id, &log.user_id, &log)
            .await?;
        Ok(log)
    }

    async fn insert_keyboard_log(&self, log: KeyboardLog) -> PortResult<KeyboardLog> {
        self.insert_user_document(Collection::KeyboardLogs, log.id, &log.user_id, &log)
            .await?;
        Ok(log)
    }

    async fn insert_scroll_log(&self, log: ScrollLog) -> PortResult<ScrollLog> {
        self.insert_user_document(Collection::ScrollLogs, log.id, &log.user_id, &log)
            .await?;
        Ok(log)
    }

    async fn insert_search_navigation_log(
        &self,
        log: SearchNavigationLog,
    ) -> PortResult<SearchNavigationLog> {
        self.insert_user_document(Collection::SearchNavigationLogs, log.id, &log.user_id, &log)
            .await?;
        Ok(log)
    }

    async fn insert_bookmark(&self, bookmark: SearchBookmark) -> PortResult<SearchBookmark> {
        sqlx::query(
            "INSERT INTO search_bookmarks (id, user_id, website, saved, doc) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(bookmark.id)
        .bind(bookmark.user_id.as_str())
        .bind(&bookmark.website)
        .bind(bookmark.saved)
        .bind(Json(&bookmark))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict(format!(
                    "User {} already bookmarked {}",
                    bookmark.user_id, bookmark.website
                ))
            } else {
                unexpected(e)
            }
        })?;
        Ok(bookmark)
    }

    async fn find_bookmarks(
        &self,
        user_id: &UserId,
        saved: Option<bool>,
    ) -> PortResult<Vec<SearchBookmark>> {
        let records = sqlx::query_scalar::<_, Json<SearchBookmark>>(
            "SELECT doc FROM search_bookmarks \
             WHERE user_id = $1 AND ($2::boolean IS NULL OR saved = $2) \
             ORDER BY created_at ASC",
        )
        .bind(user_id.as_str())
        .bind(saved)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|Json(b)| b).collect())
    }

    async fn record_bookmark_change(
        &self,
        user_id: &UserId,
        website: &str,
        entry: BookmarkLogEntry,
    ) -> PortResult<Option<SearchBookmark>> {
        // A single UPDATE locks the row, so concurrent toggles each land in the log.
        let record = sqlx::query_scalar::<_, Json<SearchBookmark>>(
            "UPDATE search_bookmarks \
             SET saved = $3, \
                 doc = jsonb_set( \
                     jsonb_set(doc, '{saved}', to_jsonb($3::boolean)), \
                     '{log}', \
                     COALESCE(doc -> 'log', '[]'::jsonb) || jsonb_build_array($4::jsonb)) \
             WHERE user_id = $1 AND website = $2 \
             RETURNING doc",
        )
        .bind(user_id.as_str())
        .bind(website)
        .bind(entry.saved)
        .bind(Json(&entry))
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(|Json(b)| b))
    }

    async fn insert_snippet(&self, snippet: SearchSnippet) -> PortResult<SearchSnippet> {
        self.insert_user_document(Collection::SearchSnippets, snippet.id, &snippet.user_id, &snippet)
            .await?;
        Ok(snippet)
    }

    async fn find_snippets(&self, user_id: &UserId) -> PortResult<Vec<SearchSnippet>> {
        let records = sqlx::query_scalar::<_, Json<SearchSnippet>>(
            "SELECT doc FROM search_snippets WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|Json(s)| s).collect())
    }

    async fn insert_synthesis_answer(
        &self,
        answer: SynthesisAnswer,
    ) -> PortResult<SynthesisAnswer> {
        self.insert_user_document(Collection::SynthesisAnswers, answer.id, &answer.user_id, &answer)
            .await?;
        Ok(answer)
    }
}
