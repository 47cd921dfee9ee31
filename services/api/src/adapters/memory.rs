//! services/api/src/adapters/memory.rs
//!
//! A process-local `DocumentStore`. Nothing survives a restart; it backs
//! local development (`STORAGE_BACKEND=memory`) and the test suite.

use async_trait::async_trait;
use neurone_profile_core::domain::{
    BookmarkLogEntry, Form, FormAnswer, KeyboardLog, MouseLog, Profile, ScrollLog,
    SearchBookmark, SearchNavigationLog, SearchSnippet, SynthesisAnswer,
};
use neurone_profile_core::ids::UserId;
use neurone_profile_core::ports::{DocumentStore, FormUpsert, PortError, PortResult};
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    profiles: Vec<Profile>,
    forms: Vec<Form>,
    form_answers: Vec<FormAnswer>,
    mouse_logs: Vec<MouseLog>,
    keyboard_logs: Vec<KeyboardLog>,
    scroll_logs: Vec<ScrollLog>,
    search_navigation_logs: Vec<SearchNavigationLog>,
    bookmarks: Vec<SearchBookmark>,
    snippets: Vec<SearchSnippet>,
    synthesis_answers: Vec<SynthesisAnswer>,
}

/// In-memory document store. Each collection keeps insertion order.
#[derive(Default)]
pub struct MemoryAdapter {
    inner: RwLock<Collections>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mouse_logs(&self) -> Vec<MouseLog> {
        self.inner.read().await.mouse_logs.clone()
    }

    pub async fn keyboard_logs(&self) -> Vec<KeyboardLog> {
        self.inner.read().await.keyboard_logs.clone()
    }

    pub async fn scroll_logs(&self) -> Vec<ScrollLog> {
        self.inner.read().await.scroll_logs.clone()
    }

    pub async fn search_navigation_logs(&self) -> Vec<SearchNavigationLog> {
        self.inner.read().await.search_navigation_logs.clone()
    }

    pub async fn form_answers(&self) -> Vec<FormAnswer> {
        self.inner.read().await.form_answers.clone()
    }

    pub async fn profiles(&self) -> Vec<Profile> {
        self.inner.read().await.profiles.clone()
    }

    pub async fn synthesis_answers(&self) -> Vec<SynthesisAnswer> {
        self.inner.read().await.synthesis_answers.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryAdapter {
    async fn insert_profile(&self, profile: Profile) -> PortResult<Profile> {
        self.inner.write().await.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_form(&self, form_name: &str) -> PortResult<Option<Form>> {
        let inner = self.inner.read().await;
        Ok(inner.forms.iter().find(|f| f.form_name == form_name).cloned())
    }

    async fn insert_form(&self, form: Form) -> PortResult<Form> {
        let mut inner = self.inner.write().await;
        if inner.forms.iter().any(|f| f.form_name == form.form_name) {
            return Err(PortError::Conflict(format!(
                "Form {} already exists",
                form.form_name
            )));
        }
        inner.forms.push(form.clone());
        Ok(form)
    }

    async fn upsert_form(&self, form: Form) -> PortResult<FormUpsert> {
        let mut inner = self.inner.write().await;
        match inner.forms.iter().position(|f| f.form_name == form.form_name) {
            Some(index) => {
                let existing = &mut inner.forms[index];
                existing.questions = form.questions;
                Ok(FormUpsert {
                    form: existing.clone(),
                    created: false,
                })
            }
            None => {
                inner.forms.push(form.clone());
                Ok(FormUpsert {
                    form,
                    created: true,
                })
            }
        }
    }

    async fn delete_form(&self, form_name: &str) -> PortResult<u64> {
        let mut inner = self.inner.write().await;
        match inner.forms.iter().position(|f| f.form_name == form_name) {
            Some(index) => {
                inner.forms.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert_form_answer(&self, answer: FormAnswer) -> PortResult<FormAnswer> {
        self.inner.write().await.form_answers.push(answer.clone());
        Ok(answer)
    }

    async fn insert_mouse_log(&self, log: MouseLog) -> PortResult<MouseLog> {
        self.inner.write().await.mouse_logs.push(log.clone());
        Ok(log)
    }

    async fn insert_keyboard_log(&self, log: KeyboardLog) -> PortResult<KeyboardLog> {
        self.inner.write().await.keyboard_logs.push(log.clone());
        Ok(log)
    }

    async fn insert_scroll_log(&self, log: ScrollLog) -> PortResult<ScrollLog> {
        self.inner.write().await.scroll_logs.push(log.clone());
        Ok(log)
    }

    async fn insert_search_navigation_log(
        &self,
        log: SearchNavigationLog,
    ) -> PortResult<SearchNavigationLog> {
        self.inner
            .write()
            .await
            .search_navigation_logs
            .push(log.clone());
        Ok(log)
    }

    async fn insert_bookmark(&self, bookmark: SearchBookmark) -> PortResult<SearchBookmark> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .bookmarks
            .iter()
            .any(|b| b.user_id == bookmark.user_id && b.website == bookmark.website);
        if taken {
            return Err(PortError::Conflict(format!(
                "User {} already bookmarked {}",
                bookmark.user_id, bookmark.website
            )));
        }
        inner.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn find_bookmarks(
        &self,
        user_id: &UserId,
        saved: Option<bool>,
    ) -> PortResult<Vec<SearchBookmark>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookmarks
            .iter()
            .filter(|b| &b.user_id == user_id)
            .filter(|b| saved.map_or(true, |s| b.saved == s))
            .cloned()
            .collect())
    }

    async fn record_bookmark_change(
        &self,
        user_id: &UserId,
        website: &str,
        entry: BookmarkLogEntry,
    ) -> PortResult<Option<SearchBookmark>> {
        let mut inner = self.inner.write().await;
        let bookmark = inner
            .bookmarks
            .iter_mut()
            .find(|b| &b.user_id == user_id && b.website == website);
        Ok(bookmark.map(|b| {
            b.apply(entry);
            b.clone()
        }))
    }

    async fn insert_snippet(&self, snippet: SearchSnippet) -> PortResult<SearchSnippet> {
        self.inner.write().await.snippets.push(snippet.clone());
        Ok(snippet)
    }

    async fn find_snippets(&self, user_id: &UserId) -> PortResult<Vec<SearchSnippet>> {
        let inner = self.inner.read().await;
        Ok(inner
            .snippets
            .iter()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_synthesis_answer(
        &self,
        answer: SynthesisAnswer,
    ) -> PortResult<SynthesisAnswer> {
        self.inner
            .write()
            .await
            .synthesis_answers
            .push(answer.clone());
        Ok(answer)
    }
}
