//! Environment-driven configuration.
//!
//! All knobs come from environment variables (optionally loaded from a
//! `.env` file by the binary before this runs):
//!
//!   DATABASE_URL          sqlite connection string (default sqlite://rwiki.db)
//!   BIND_ADDR             listen address (default 127.0.0.1:3040)
//!   ADMIN_USERNAME        moderation panel login
//!   ADMIN_PASSWORD_HASH   bcrypt hash of the admin password (preferred)
//!   ADMIN_PASSWORD        plaintext fallback, dev only
//!   SESSION_SECRET        key material for signing session cookies
//!   SESSION_TTL_SECS      session lifetime (default 12h)
//!   RATE_LIMIT_DISABLED   set to 1/true to bypass rate limiting

use std::env;
use std::net::SocketAddr;

use crate::error::{CoreError, Result};

const DEFAULT_BIND: &str = "127.0.0.1:3040";
const DEFAULT_DATABASE_URL: &str = "sqlite://rwiki.db";
const DEFAULT_SESSION_TTL_SECS: i64 = 12 * 60 * 60;

/// Runtime configuration for the wiki server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub admin_username: String,
    /// bcrypt hash; checked before the plaintext fallback
    pub admin_password_hash: Option<String>,
    /// plaintext password, only meant for local development
    pub admin_password: Option<String>,
    pub session_secret: String,
    pub session_ttl_secs: i64,
    pub rate_limit_disabled: bool,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `SESSION_SECRET` is mandatory: sessions signed with a guessable
    /// key would let anyone forge an admin cookie.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env_nonempty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_raw = env_nonempty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| CoreError::invalid("BIND_ADDR", format!("'{bind_raw}' is not a socket address")))?;

        let admin_username =
            env_nonempty("ADMIN_USERNAME").ok_or_else(|| CoreError::missing("ADMIN_USERNAME"))?;
        let admin_password_hash = env_nonempty("ADMIN_PASSWORD_HASH");
        let admin_password = env_nonempty("ADMIN_PASSWORD");
        if admin_password_hash.is_none() && admin_password.is_none() {
            return Err(CoreError::missing("ADMIN_PASSWORD_HASH"));
        }
        if admin_password_hash.is_none() && admin_password.is_some() {
            tracing::warn!("ADMIN_PASSWORD is set without ADMIN_PASSWORD_HASH; use `rwiki hash-password` for production");
        }

        let session_secret =
            env_nonempty("SESSION_SECRET").ok_or_else(|| CoreError::missing("SESSION_SECRET"))?;

        let session_ttl_secs = match env_nonempty("SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or_else(|| CoreError::invalid("SESSION_TTL_SECS", format!("'{raw}' is not a positive integer")))?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let rate_limit_disabled = matches!(
            env_nonempty("RATE_LIMIT_DISABLED").as_deref(),
            Some("1") | Some("true") | Some("yes")
        );

        Ok(Self {
            database_url,
            bind_addr,
            admin_username,
            admin_password_hash,
            admin_password,
            session_secret,
            session_ttl_secs,
            rate_limit_disabled,
        })
    }
}

fn env_nonempty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
