//! Server-rendered HTML.
//!
//! Templates are maud markup. Handlers wrap the result in
//! `axum::response::Html(markup.into_string())`; nothing here touches
//! the request.

pub mod admin;
pub mod layout;
pub mod public;
