//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use neurone_profile_core::ports::{AuthorityService, DocumentStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub authority: Arc<dyn AuthorityService>,
    pub config: Arc<Config>,
}
