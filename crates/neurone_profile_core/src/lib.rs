pub mod domain;
pub mod forms;
pub mod ids;
pub mod ports;
pub mod time;

pub use domain::{
    AnsweredQuestion, BookmarkLogEntry, BookmarkSummary, CheckboxAnswer, Form, FormAnswer,
    FormQuestion, KeyboardLog, MouseLog, Profile, QuestionType, ScaleOptions, ScrollLog,
    SearchBookmark, SearchNavigationLog, SearchSnippet, SynthesisAnswer, Validators,
};
pub use ids::{IdError, UserId};
pub use ports::{AuthVerdict, AuthorityService, DocumentStore, FormUpsert, PortError, PortResult};
pub use time::{ClientInstant, Timing};
