//! Admin moderation of the talent directory.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::db::{
    ActionOutcome, MoveDirection, MoveOutcome, SortOrder, TalentRecord, TalentRepo, TalentSort,
};
use crate::http::error::PageError;
use crate::http::extractors::{AdminSession, IncomingFlash};
use crate::http::flash::Flash;
use crate::http::server::AppState;
use crate::models::{FieldErrors, Status, StatusFilter, TalentAdminForm};
use crate::views;

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: String,
    #[serde(default)]
    order: String,
    #[serde(default)]
    category: String,
}

/// Filter state carried by the move forms, reused for the redirect.
#[derive(Deserialize)]
struct MoveParams {
    #[serde(default)]
    status: String,
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: String,
    #[serde(default)]
    order: String,
    #[serde(default)]
    category: String,
}

fn form_from_record(record: &TalentRecord) -> TalentAdminForm {
    TalentAdminForm {
        handle: record.handle.clone(),
        instagram: record.instagram.clone(),
        description: record.description.clone(),
        category: record.category.clone(),
        image: record.image.clone(),
        status: record.status.clone(),
        display_order: record.display_order.to_string(),
    }
}

fn outcome_flash(outcome: ActionOutcome, done: &str) -> Flash {
    match outcome {
        ActionOutcome::Applied => Flash::success(done),
        ActionOutcome::NotFound => Flash::error("Entrée introuvable."),
    }
}

/// GET /admin/talents - sortable, filterable listing
async fn dashboard(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let filter = StatusFilter::from_query(params.status.as_deref());
    let query = params.q.trim();
    let sort = TalentSort::parse(&params.sort);
    let order = SortOrder::parse(&params.order);
    let category = Some(params.category.trim()).filter(|c| !c.is_empty());

    let (entries, counts, category_stats) = TalentRepo::new(&state.pool)
        .admin_list(filter, query, sort, order, category)
        .await?;
    Ok(Html(
        views::admin::talents_dashboard(
            &entries,
            &counts,
            &category_stats,
            filter,
            query,
            sort,
            order,
            category,
            flash.as_ref(),
        )
        .into_string(),
    ))
}

/// POST /admin/talents/{id}/approve
async fn approve(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let outcome = TalentRepo::new(&state.pool)
        .set_status(id, Status::Valid)
        .await?;
    tracing::info!(id, "talent approved");
    Ok(outcome_flash(outcome, "Talent publié.")
        .redirect("/admin/talents")
        .into_response())
}

/// POST /admin/talents/{id}/reject
async fn reject(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let outcome = TalentRepo::new(&state.pool)
        .set_status(id, Status::Refused)
        .await?;
    tracing::info!(id, "talent rejected");
    Ok(outcome_flash(outcome, "Proposition refusée.")
        .redirect("/admin/talents")
        .into_response())
}

/// POST /admin/talents/{id}/delete
async fn delete(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let outcome = TalentRepo::new(&state.pool).delete(id).await?;
    tracing::info!(id, "talent deleted");
    Ok(outcome_flash(outcome, "Entrée supprimée.")
        .redirect("/admin/talents")
        .into_response())
}

/// GET /admin/talents/{id}/edit
async fn edit_form(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    IncomingFlash(flash): IncomingFlash,
) -> Result<Html<String>, PageError> {
    let record = TalentRepo::new(&state.pool)
        .by_id(id)
        .await?
        .ok_or(PageError::NotFound)?;
    Ok(Html(
        views::admin::talent_form_admin(
            "Modifier le talent",
            &format!("/admin/talents/{id}/edit"),
            &form_from_record(&record),
            &FieldErrors::new(),
            flash.as_ref(),
        )
        .into_string(),
    ))
}

/// POST /admin/talents/{id}/edit
async fn edit(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<TalentAdminForm>,
) -> Result<Response, PageError> {
    match form.validate() {
        Ok(update) => {
            let outcome = TalentRepo::new(&state.pool).update_full(id, &update).await?;
            tracing::info!(id, "talent updated");
            Ok(outcome_flash(outcome, "Talent mis à jour.")
                .redirect("/admin/talents")
                .into_response())
        }
        Err(errors) => Ok(Html(
            views::admin::talent_form_admin(
                "Modifier le talent",
                &format!("/admin/talents/{id}/edit"),
                &form,
                &errors,
                None,
            )
            .into_string(),
        )
        .into_response()),
    }
}

/// GET /admin/talents/new
async fn new_form(_session: AdminSession, IncomingFlash(flash): IncomingFlash) -> Html<String> {
    let form = TalentAdminForm {
        status: "valid".to_string(),
        ..TalentAdminForm::default()
    };
    Html(
        views::admin::talent_form_admin(
            "Ajouter un talent",
            "/admin/talents/new",
            &form,
            &FieldErrors::new(),
            flash.as_ref(),
        )
        .into_string(),
    )
}

/// POST /admin/talents/new
async fn create(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Form(form): Form<TalentAdminForm>,
) -> Result<Response, PageError> {
    match form.validate() {
        Ok(update) => {
            let id = TalentRepo::new(&state.pool).create_admin(&update).await?;
            tracing::info!(id, handle = %update.handle, "talent created by admin");
            Ok(Flash::success("Talent ajouté.")
                .redirect("/admin/talents")
                .into_response())
        }
        Err(errors) => Ok(Html(
            views::admin::talent_form_admin(
                "Ajouter un talent",
                "/admin/talents/new",
                &form,
                &errors,
                None,
            )
            .into_string(),
        )
        .into_response()),
    }
}

/// POST /admin/talents/{id}/move/{direction}
///
/// An optional `category` query parameter scopes the swap to one
/// category; the other query parameters bring the admin back to the
/// view they were looking at.
async fn move_talent(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Path((id, direction)): Path<(i64, String)>,
    Query(params): Query<MoveParams>,
) -> Result<Response, PageError> {
    let Some(direction) = MoveDirection::parse(&direction) else {
        return Err(PageError::NotFound);
    };
    let category = Some(params.category.trim()).filter(|c| !c.is_empty());
    let outcome = TalentRepo::new(&state.pool)
        .move_order(id, direction, category)
        .await?;
    let flash = match outcome {
        MoveOutcome::Moved => Flash::success("Ordre mis à jour."),
        MoveOutcome::AtBoundary => Flash::info("Déjà en bout de liste."),
        MoveOutcome::NotFound => Flash::error("Entrée introuvable."),
    };
    let status = if params.status.is_empty() {
        "valid"
    } else {
        params.status.as_str()
    };
    let back = format!(
        "/admin/talents?status={}&q={}&category={}&sort={}&order={}",
        urlencoding::encode(status),
        urlencoding::encode(params.q.trim()),
        urlencoding::encode(params.category.trim()),
        urlencoding::encode(&params.sort),
        urlencoding::encode(&params.order),
    );
    Ok(flash.redirect(&back).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/talents", get(dashboard))
        .route("/admin/talents/new", get(new_form).post(create))
        .route("/admin/talents/{id}/approve", post(approve))
        .route("/admin/talents/{id}/reject", post(reject))
        .route("/admin/talents/{id}/delete", post(delete))
        .route("/admin/talents/{id}/edit", get(edit_form).post(edit))
        .route("/admin/talents/{id}/move/{direction}", post(move_talent))
}
