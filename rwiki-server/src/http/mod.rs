//! HTTP layer - axum server, session auth, rate limiting and routes
//!
//! All responses are server-rendered HTML. Handler errors surface as
//! French error pages, redirects carry one-shot notices in the query
//! string.

pub mod error;
pub mod extractors;
pub mod flash;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod session;

pub use error::PageError;
pub use server::{build_router, run_server, AppState};
