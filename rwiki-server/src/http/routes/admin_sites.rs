//! Admin moderation of site listings.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::db::{ActionOutcome, MoveDirection, MoveOutcome, SiteRecord, SiteRepo};
use crate::http::error::PageError;
use crate::http::extractors::{AdminSession, IncomingFlash};
use crate::http::flash::Flash;
use crate::http::server::AppState;
use crate::models::{FieldErrors, SiteSubmission, Status, StatusFilter};
use crate::views;

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    q: String,
}

/// Admin edit/create form body: a submission plus a status.
#[derive(Debug, Clone, Default, Deserialize)]
struct SiteAdminForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    status: String,
}

impl SiteAdminForm {
    fn submission(&self) -> SiteSubmission {
        SiteSubmission {
            name: self.name.clone(),
            city: self.city.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            honeypot: String::new(),
        }
    }

    fn status(&self) -> Status {
        Status::parse(&self.status).unwrap_or(Status::Pending)
    }

    fn from_record(record: &SiteRecord) -> Self {
        Self {
            name: record.name.clone(),
            city: record.city.clone().unwrap_or_default(),
            url: record.url.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            status: record.status.clone(),
        }
    }
}

fn outcome_flash(outcome: ActionOutcome, done: &str) -> Flash {
    match outcome {
        ActionOutcome::Applied => Flash::success(done),
        ActionOutcome::NotFound => Flash::error("Entrée introuvable."),
    }
}

/// GET /admin - moderation dashboard
async fn dashboard(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let filter = StatusFilter::from_query(params.status.as_deref());
    let query = params.q.trim();
    let (entries, counts) = SiteRepo::new(&state.pool).admin_list(filter, query).await?;
    Ok(Html(
        views::admin::sites_dashboard(&entries, &counts, filter, query, flash.as_ref())
            .into_string(),
    ))
}

/// POST /admin/propositions/{id}/approve
async fn approve(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let outcome = SiteRepo::new(&state.pool).set_status(id, Status::Valid).await?;
    tracing::info!(id, "site approved");
    Ok(outcome_flash(outcome, "Site publié.").redirect("/admin").into_response())
}

/// POST /admin/propositions/{id}/reject
async fn reject(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let outcome = SiteRepo::new(&state.pool)
        .set_status(id, Status::Refused)
        .await?;
    tracing::info!(id, "site rejected");
    Ok(outcome_flash(outcome, "Proposition refusée.")
        .redirect("/admin")
        .into_response())
}

/// POST /admin/propositions/{id}/delete
async fn delete(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let outcome = SiteRepo::new(&state.pool).delete(id).await?;
    tracing::info!(id, "site deleted");
    Ok(outcome_flash(outcome, "Entrée supprimée.")
        .redirect("/admin")
        .into_response())
}

/// GET /admin/propositions/{id}/edit
async fn edit_form(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let record = SiteRepo::new(&state.pool)
        .by_id(id)
        .await?
        .ok_or(PageError::NotFound)?;
    let form = SiteAdminForm::from_record(&record);
    Ok(Html(
        views::admin::site_form_admin(
            "Modifier le site",
            &format!("/admin/propositions/{id}/edit"),
            &form.submission(),
            Some(form.status.as_str()),
            &FieldErrors::new(),
            flash.as_ref(),
        )
        .into_string(),
    ))
}

/// POST /admin/propositions/{id}/edit
async fn edit(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<SiteAdminForm>,
) -> Result<Response, PageError> {
    let submission = form.submission();
    match submission.validate_admin() {
        Ok(site) => {
            let outcome = SiteRepo::new(&state.pool)
                .update_full(id, &site, form.status())
                .await?;
            tracing::info!(id, "site updated");
            Ok(outcome_flash(outcome, "Site mis à jour.")
                .redirect("/admin")
                .into_response())
        }
        Err(errors) => Ok(Html(
            views::admin::site_form_admin(
                "Modifier le site",
                &format!("/admin/propositions/{id}/edit"),
                &submission,
                Some(form.status.as_str()),
                &errors,
                None,
            )
            .into_string(),
        )
        .into_response()),
    }
}

/// GET /admin/propositions/new
async fn new_form(
    _session: AdminSession,
    IncomingFlash(flash): IncomingFlash,
) -> Html<String> {
    Html(
        views::admin::site_form_admin(
            "Ajouter un site",
            "/admin/propositions/new",
            &SiteSubmission::default(),
            Some("valid"),
            &FieldErrors::new(),
            flash.as_ref(),
        )
        .into_string(),
    )
}

/// POST /admin/propositions/new
async fn create(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Form(form): Form<SiteAdminForm>,
) -> Result<Response, PageError> {
    let submission = form.submission();
    match submission.validate_admin() {
        Ok(site) => {
            let repo = SiteRepo::new(&state.pool);
            let id = repo.submit(&site).await?;
            let status = form.status();
            if status != Status::Pending {
                repo.set_status(id, status).await?;
            }
            tracing::info!(id, name = %site.name, "site created by admin");
            Ok(Flash::success("Site ajouté.").redirect("/admin").into_response())
        }
        Err(errors) => Ok(Html(
            views::admin::site_form_admin(
                "Ajouter un site",
                "/admin/propositions/new",
                &submission,
                Some(form.status.as_str()),
                &errors,
                None,
            )
            .into_string(),
        )
        .into_response()),
    }
}

/// POST /admin/sites/{id}/move/{direction}
///
/// The query parameters carry the dashboard's filter state back
/// through the redirect.
async fn move_site(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path((id, direction)): Path<(i64, String)>,
    Query(params): Query<ListParams>,
) -> Result<Response, PageError> {
    let Some(direction) = MoveDirection::parse(&direction) else {
        return Err(PageError::NotFound);
    };
    let outcome = SiteRepo::new(&state.pool).move_order(id, direction).await?;
    let flash = match outcome {
        MoveOutcome::Moved => Flash::success("Ordre mis à jour."),
        MoveOutcome::AtBoundary => Flash::info("Déjà en bout de liste."),
        MoveOutcome::NotFound => Flash::error("Entrée introuvable."),
    };
    let back = format!(
        "/admin?status={}&q={}",
        urlencoding::encode(params.status.as_deref().unwrap_or("valid")),
        urlencoding::encode(params.q.trim()),
    );
    Ok(flash.redirect(&back).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/propositions/new", get(new_form).post(create))
        .route("/admin/propositions/{id}/approve", post(approve))
        .route("/admin/propositions/{id}/reject", post(reject))
        .route("/admin/propositions/{id}/delete", post(delete))
        .route("/admin/propositions/{id}/edit", get(edit_form).post(edit))
        .route("/admin/sites/{id}/move/{direction}", post(move_site))
}
