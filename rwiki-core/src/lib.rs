//! rwiki-core: shared configuration, errors and text helpers for the
//! Réunion Wiki directory.

pub mod config;
pub mod error;
pub mod slug;

pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use slug::slugify;
