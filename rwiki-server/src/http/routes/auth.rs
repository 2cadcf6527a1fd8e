//! Admin login and logout.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::http::error::too_many_requests;
use crate::http::extractors::{ClientIp, IncomingFlash};
use crate::http::flash::Flash;
use crate::http::rate_limit::Scope;
use crate::http::server::AppState;
use crate::http::session;
use crate::views;

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Constant-time string comparison through keyed blake3 digests.
fn digest_eq(key: &[u8; 32], left: &str, right: &str) -> bool {
    blake3::keyed_hash(key, left.as_bytes()) == blake3::keyed_hash(key, right.as_bytes())
}

fn credentials_valid(state: &AppState, username: &str, password: &str) -> bool {
    if !digest_eq(&state.session_key, username, &state.config.admin_username) {
        return false;
    }
    if let Some(hash) = &state.config.admin_password_hash {
        return bcrypt::verify(password, hash).unwrap_or(false);
    }
    match &state.config.admin_password {
        Some(expected) => digest_eq(&state.session_key, password, expected),
        None => false,
    }
}

/// GET /admin/login
async fn login_form(IncomingFlash(flash): IncomingFlash) -> Html<String> {
    Html(views::admin::login_page(flash.as_ref()).into_string())
}

/// POST /admin/login
async fn login(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.limiter.allow(Scope::Login, &ip) {
        return too_many_requests();
    }

    if !credentials_valid(&state, form.username.trim(), &form.password) {
        tracing::warn!(client = %ip, "failed admin login");
        return Flash::error("Identifiants incorrects.")
            .redirect("/admin/login")
            .into_response();
    }

    let expiry = chrono::Utc::now().timestamp() + state.config.session_ttl_secs;
    let token = session::issue_token(&state.session_key, &state.config.admin_username, expiry);
    let cookie = session::session_cookie(&token, state.config.session_ttl_secs);
    tracing::info!(username = %state.config.admin_username, "admin login");

    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Redirect::to("/admin"),
    )
        .into_response()
}

/// GET /admin/logout
async fn logout() -> Response {
    (
        AppendHeaders([(SET_COOKIE, session::clear_cookie())]),
        Flash::info("Vous êtes déconnecté.").redirect("/"),
    )
        .into_response()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/login", get(login_form).post(login))
        .route("/admin/logout", get(logout))
}
