//! services/api/src/lib.rs
//!
//! The `profile_api` library: configuration, adapters for the core ports and
//! the axum web layer. The `api` and `openapi` binaries are thin wrappers.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
