//! crates/neurone_profile_core/src/domain.rs
//!
//! The documents persisted by the service, one type per collection.
//!
//! Every record is its own document. The only relationship between them is
//! the soft reference to a [`UserId`]; nothing checks that the user exists.
//! Field names serialize in camelCase because the browser clients read the
//! documents back verbatim.

use crate::ids::UserId;
use crate::time::Timing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Profiles
//=========================================================================================

/// A minimal user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
}

//=========================================================================================
// Form Definitions
//=========================================================================================

/// The kinds of question a form can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Input,
    Paragraph,
    Checkbox,
    Radio,
    Dropdown,
    Datepicker,
    Scale,
    Rating,
}

impl QuestionType {
    /// Question types answered by picking from `choices`.
    pub fn uses_choices(self) -> bool {
        matches!(
            self,
            QuestionType::Checkbox | QuestionType::Radio | QuestionType::Dropdown
        )
    }

    /// Question types answered with free text.
    pub fn is_text(self) -> bool {
        matches!(self, QuestionType::Input | QuestionType::Paragraph)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleOptions {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Validators {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// One question in a form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Identifies the question within its form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Paragraph questions only: default height in rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_options: Option<ScaleOptions>,
    #[serde(default)]
    pub validators: Validators,
}

/// A named, ordered list of questions. Names are unique across forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub form_name: String,
    pub questions: Vec<FormQuestion>,
}

//=========================================================================================
// Form Answers
//=========================================================================================

/// One checked or unchecked option of a multi-answer question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckboxAnswer {
    pub question: String,
    pub answer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question: String,
    pub form_type: String,
    /// Scale and rating questions answer with numbers; stored as text.
    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer_array: Vec<CheckboxAnswer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarAnswer {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<ScalarAnswer>::deserialize(deserializer)?.map(|scalar| match scalar {
            ScalarAnswer::Text(text) => text,
            ScalarAnswer::Integer(n) => n.to_string(),
            ScalarAnswer::Number(n) => n.to_string(),
            ScalarAnswer::Flag(b) => b.to_string(),
        }),
    )
}

/// A user's submission against a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormAnswer {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub form_id: String,
    #[serde(flatten)]
    pub timing: Timing,
    pub questions: Vec<AnsweredQuestion>,
}

//=========================================================================================
// Telemetry
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MouseLog {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(rename = "x_win", default)]
    pub x_win: Option<f64>,
    #[serde(rename = "y_win", default)]
    pub y_win: Option<f64>,
    #[serde(rename = "w_win", default)]
    pub w_win: Option<f64>,
    #[serde(rename = "h_win", default)]
    pub h_win: Option<f64>,
    #[serde(rename = "x_doc", default)]
    pub x_doc: Option<f64>,
    #[serde(rename = "y_doc", default)]
    pub y_doc: Option<f64>,
    #[serde(rename = "w_doc", default)]
    pub w_doc: Option<f64>,
    #[serde(rename = "h_doc", default)]
    pub h_doc: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardLog {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// `-1` when the browser did not report it.
    pub key_code: i64,
    pub which: i64,
    pub char_code: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrollLog {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(rename = "x_scr", default)]
    pub x_scr: Option<f64>,
    #[serde(rename = "y_scr", default)]
    pub y_scr: Option<f64>,
    #[serde(rename = "w_win", default)]
    pub w_win: Option<f64>,
    #[serde(rename = "h_win", default)]
    pub h_win: Option<f64>,
    #[serde(rename = "w_doc", default)]
    pub w_doc: Option<f64>,
    #[serde(rename = "h_doc", default)]
    pub h_doc: Option<f64>,
}

/// A step of the user's navigation through search results: a query, a page
/// enter or a page exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchNavigationLog {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_page_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page_number: Option<u32>,
    /// Position of the selected document in the result list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_document_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_number_total: Option<u32>,
    /// Names of every document visible on the results page.
    #[serde(default)]
    pub search_results: Vec<String>,
}

//=========================================================================================
// Search Data
//=========================================================================================

/// One transition of a bookmark's saved flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkLogEntry {
    pub saved: bool,
    #[serde(flatten)]
    pub timing: Timing,
}

/// A user's bookmark of one search result.
///
/// `saved` is the current state; `log` records every transition in arrival
/// order and is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchBookmark {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    /// Unique name of the bookmarked page.
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    pub saved: bool,
    pub log: Vec<BookmarkLogEntry>,
}

impl SearchBookmark {
    /// A freshly created bookmark is saved, with that first save logged.
    pub fn created(
        user_id: UserId,
        website: String,
        website_title: Option<String>,
        website_url: Option<String>,
        timing: Timing,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            website,
            website_title,
            website_url,
            saved: true,
            log: vec![BookmarkLogEntry {
                saved: true,
                timing,
            }],
        }
    }

    /// Sets the current flag to the entry's and appends the entry to the log.
    pub fn apply(&mut self, entry: BookmarkLogEntry) {
        self.saved = entry.saved;
        self.log.push(entry);
    }
}

/// The projection returned when listing saved bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkSummary {
    pub id: Uuid,
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl From<&SearchBookmark> for BookmarkSummary {
    fn from(bookmark: &SearchBookmark) -> Self {
        Self {
            id: bookmark.id,
            website: bookmark.website.clone(),
            website_url: bookmark.website_url.clone(),
        }
    }
}

/// A text excerpt a user saved from a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_title: Option<String>,
    #[serde(flatten)]
    pub timing: Timing,
}

//=========================================================================================
// Synthesis
//=========================================================================================

/// A free-text answer written in the synthesis editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisAnswer {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// When the editor was opened, as reported by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(rename = "answerHTML", default, skip_serializing_if = "Option::is_none")]
    pub answer_html: Option<String>,
    /// `true` for a manual submission, `false` for an autosave.
    #[serde(default)]
    pub complete_answer: bool,
    #[serde(flatten)]
    pub timing: Timing,
}
