//! Client SDK for the Jobscope job-search/CV-matching service.
//!
//! The crate is organized the way the app consumes it: an authenticated
//! [`http::ApiClient`] shared by per-domain stores, with session persistence
//! and single-flight token refresh handled inside the client so stores never
//! see a 401 they could have survived.

pub mod admin;
pub mod applications;
pub mod auth;
pub mod billing;
pub mod bookmarks;
pub mod config;
pub mod cv;
pub mod errors;
pub mod http;
pub mod jobs;
pub mod models;
pub mod notifications;
pub mod session;

pub use config::Config;
pub use errors::ApiError;
pub use http::ApiClient;
pub use session::{FileSessionStorage, SessionState};
