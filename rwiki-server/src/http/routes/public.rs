//! Public pages: browsing, search and the two submission forms.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use rwiki_core::slugify;

use crate::db::{SiteRepo, TalentRepo};
use crate::http::error::{too_many_requests, PageError};
use crate::http::extractors::{ClientIp, IncomingFlash};
use crate::http::flash::Flash;
use crate::http::rate_limit::Scope;
use crate::http::server::AppState;
use crate::models::{FieldErrors, SiteSubmission, TalentSubmission, MIN_QUERY_LEN};
use crate::views;

const HOME_SITES_PER_CATEGORY: usize = 3;
const HOME_LATEST: i64 = 12;
const LATEST_PAGE_CAP: i64 = 30;
const SEARCH_CAP: i64 = 30;

/// GET / - featured sites per category plus the latest additions
async fn home(
    State(state): State<Arc<AppState>>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let repo = SiteRepo::new(&state.pool);
    let groups = repo.featured_by_category(HOME_SITES_PER_CATEGORY).await?;
    let latest = repo.latest(HOME_LATEST).await?;
    Ok(Html(
        views::public::home(&groups, &latest, flash.as_ref()).into_string(),
    ))
}

/// GET /categorie/{slug} - one category, canonical slug enforced
async fn category(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Response, PageError> {
    let repo = SiteRepo::new(&state.pool);
    let categories = repo.categories().await?;
    let Some(category) = categories
        .iter()
        .find(|c| slugify(c) == slugify(&slug))
    else {
        return Err(PageError::NotFound);
    };

    // non-canonical spellings get one permanent redirect
    let canonical = slugify(category);
    if slug != canonical {
        return Ok(Redirect::permanent(&format!("/categorie/{canonical}")).into_response());
    }

    let sites = repo.by_category(category).await?;
    Ok(Html(views::public::category_page(category, &sites, flash.as_ref()).into_string())
        .into_response())
}

/// GET /nouveaux-sites - most recent published sites
async fn latest_sites(
    State(state): State<Arc<AppState>>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let sites = SiteRepo::new(&state.pool).latest(LATEST_PAGE_CAP).await?;
    Ok(Html(
        views::public::latest_page(&sites, flash.as_ref()).into_string(),
    ))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// GET /recherche - site search, throttled per client
async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
    ClientIp(ip): ClientIp,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Response, PageError> {
    let query = params.q.trim();
    if !query.is_empty() && !state.limiter.allow(Scope::Search, &ip) {
        return Ok(too_many_requests());
    }
    let too_short = !query.is_empty() && query.chars().count() < MIN_QUERY_LEN;
    let results = SiteRepo::new(&state.pool).search(query, SEARCH_CAP).await?;
    Ok(Html(
        views::public::search_page(query, &results, too_short, flash.as_ref()).into_string(),
    )
    .into_response())
}

/// GET /formulaire - empty site submission form
async fn site_form(
    State(state): State<Arc<AppState>>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let categories = SiteRepo::new(&state.pool).categories().await?;
    Ok(Html(
        views::public::site_form_page(
            &categories,
            &SiteSubmission::default(),
            &FieldErrors::new(),
            flash.as_ref(),
        )
        .into_string(),
    ))
}

/// POST /formulaire - validate and queue a site for moderation
async fn submit_site(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Form(submission): Form<SiteSubmission>,
) -> Result<Response, PageError> {
    if !state.limiter.allow(Scope::Submit, &ip) {
        return Ok(too_many_requests());
    }
    let repo = SiteRepo::new(&state.pool);
    let categories = repo.categories().await?;
    match submission.validate(&categories) {
        Ok(site) => {
            let id = repo.submit(&site).await?;
            tracing::info!(id, name = %site.name, "site submitted");
            Ok(Flash::success("Merci ! Votre proposition sera examinée prochainement.")
                .redirect("/formulaire")
                .into_response())
        }
        Err(errors) => Ok(Html(
            views::public::site_form_page(&categories, &submission, &errors, None).into_string(),
        )
        .into_response()),
    }
}

/// GET /talents - published talents grouped by category
async fn talents(
    State(state): State<Arc<AppState>>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let groups = TalentRepo::new(&state.pool).grouped_valid().await?;
    Ok(Html(
        views::public::talents_page(&groups, flash.as_ref()).into_string(),
    ))
}

#[derive(Deserialize)]
struct TalentFormParams {
    #[serde(default)]
    category: String,
}

/// GET /proposer-talent - talent submission form, category optionally
/// pre-filled from the talents page links
async fn talent_form(
    Query(params): Query<TalentFormParams>,
    IncomingFlash(flash): IncomingFlash,
) -> Html<String> {
    let submission = TalentSubmission {
        category: params.category.chars().take(50).collect(),
        ..TalentSubmission::default()
    };
    Html(
        views::public::talent_form_page(&submission, &FieldErrors::new(), flash.as_ref())
            .into_string(),
    )
}

/// POST /proposer-talent - validate and queue a talent for moderation
async fn submit_talent(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Form(submission): Form<TalentSubmission>,
) -> Result<Response, PageError> {
    if !state.limiter.allow(Scope::Submit, &ip) {
        return Ok(too_many_requests());
    }
    match submission.validate() {
        Ok(talent) => {
            let id = TalentRepo::new(&state.pool).submit(&talent).await?;
            tracing::info!(id, handle = %talent.handle, "talent submitted");
            Ok(Flash::success("Merci ! Votre proposition sera examinée prochainement.")
                .redirect("/proposer-talent")
                .into_response())
        }
        Err(errors) => Ok(Html(
            views::public::talent_form_page(&submission, &errors, None).into_string(),
        )
        .into_response()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/categorie/{slug}", get(category))
        .route("/nouveaux-sites", get(latest_sites))
        .route("/recherche", get(search))
        .route("/formulaire", get(site_form).post(submit_site))
        .route("/talents", get(talents))
        .route("/proposer-talent", get(talent_form).post(submit_talent))
}
