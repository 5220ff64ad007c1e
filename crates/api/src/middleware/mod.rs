//! Request extractors.
//!
//! - [`auth::AccessToken`] -- The caller's OAuth access token from a Bearer header.
//! - [`query::QueryParams`] -- Query-string parsing with JSON validation errors.

pub mod auth;
pub mod query;
