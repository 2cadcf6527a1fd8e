//! Custom axum extractors.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts, Query};
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::response::Redirect;
use serde::Deserialize;

use super::flash::{Flash, FlashKind};
use super::server::AppState;
use super::session;

/// Authenticated admin, extracted from the session cookie.
///
/// Handlers that take this extractor are only reachable with a valid,
/// unexpired session; anything else bounces to the login form.
pub struct AdminSession {
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let rejection = || Flash::info("Veuillez vous connecter.").redirect("/admin/login");

        let header = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(rejection)?;
        let token = session::token_from_cookie_header(header).ok_or_else(rejection)?;
        let now = chrono::Utc::now().timestamp();
        let username =
            session::verify_token(&state.session_key, token, now).ok_or_else(rejection)?;
        Ok(Self { username })
    }
}

/// Best-effort client address for rate limiting.
///
/// Prefers the first X-Forwarded-For hop (the deployment sits behind a
/// reverse proxy), falls back to the socket peer address.
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return Ok(Self(first.to_string()));
                }
            }
        }
        let addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self(addr))
    }
}

#[derive(Deserialize)]
struct FlashParams {
    #[serde(default)]
    notice: Option<String>,
    #[serde(default)]
    notice_kind: Option<String>,
}

/// Optional one-shot notice arriving in the query string.
pub struct IncomingFlash(pub Option<Flash>);

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(Query(params)) = Query::<FlashParams>::from_request_parts(parts, state).await else {
            return Ok(Self(None));
        };
        let flash = params.notice.filter(|m| !m.is_empty()).map(|message| Flash {
            kind: FlashKind::parse(params.notice_kind.as_deref().unwrap_or("")),
            message,
        });
        Ok(Self(flash))
    }
}
