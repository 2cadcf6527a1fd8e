//! Route handlers, one module per surface.

pub mod admin_sites;
pub mod admin_talents;
pub mod auth;
pub mod health;
pub mod public;
