//! rwiki-server: the Réunion Wiki web application.
//!
//! Public pages (home, categories, search, submission forms) and the
//! password-protected moderation panel, over a single SQLite store.

pub mod db;
pub mod http;
pub mod models;
pub mod views;

pub use http::{build_router, run_server, AppState};
