//! Admin pages: login, moderation dashboards and edit forms.

use maud::{html, Markup};

use crate::db::{SiteRecord, SortOrder, StatusCounts, TalentRecord, TalentSort};
use crate::http::flash::Flash;
use crate::models::{
    FieldErrors, SiteSubmission, Status, StatusFilter, TalentAdminForm, TALENT_CATEGORIES,
};

use super::layout;

pub fn login_page(flash: Option<&Flash>) -> Markup {
    layout::page(
        "Connexion",
        flash,
        html! {
            h1 { "Administration" }
            form.stacked action="/admin/login" method="post" {
                label for="username" { "Identifiant" }
                input type="text" id="username" name="username" required autofocus;
                label for="password" { "Mot de passe" }
                input type="password" id="password" name="password" required;
                p { button type="submit" { "Se connecter" } }
            }
        },
    )
}

fn status_badge(status: &str) -> Markup {
    let label = Status::parse(status).map(|s| s.label()).unwrap_or(status);
    html! { span class={ "badge " (status) } { (label) } }
}

fn status_filter_bar(base: &str, filter: StatusFilter, counts: &StatusCounts) -> Markup {
    let entries = [
        (StatusFilter::Only(Status::Pending), counts.pending),
        (StatusFilter::Only(Status::Valid), counts.valid),
        (StatusFilter::Only(Status::Refused), counts.refused),
        (StatusFilter::All, counts.total()),
    ];
    html! {
        div.filter-bar {
            @for (entry, count) in entries {
                a.active[entry == filter] href={ (base) "?status=" (entry.as_str()) } {
                    (entry.label()) " (" (count) ")"
                }
            }
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

/// Move up/down forms. `query` carries the dashboard's filter state so
/// the handler can scope the swap and redirect back to the same view.
fn move_buttons(action_base: &str, query: &str) -> Markup {
    let suffix = if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    };
    html! {
        form.inline-form action={ (action_base) "/move/up" (suffix) } method="post" {
            button.ghost type="submit" title="Monter" { "↑" }
        }
        form.inline-form action={ (action_base) "/move/down" (suffix) } method="post" {
            button.ghost type="submit" title="Descendre" { "↓" }
        }
    }
}

fn moderation_buttons(action_base: &str, status: &str) -> Markup {
    html! {
        @if status != "valid" {
            form.inline-form action={ (action_base) "/approve" } method="post" {
                button type="submit" { "Publier" }
            }
        }
        @if status != "refused" {
            form.inline-form action={ (action_base) "/reject" } method="post" {
                button.ghost type="submit" { "Refuser" }
            }
        }
        form.inline-form action={ (action_base) "/delete" } method="post"
            onsubmit="return confirm('Supprimer définitivement ?');" {
            button.danger type="submit" { "Supprimer" }
        }
    }
}

/// Site moderation dashboard.
pub fn sites_dashboard(
    entries: &[SiteRecord],
    counts: &StatusCounts,
    filter: StatusFilter,
    query: &str,
    flash: Option<&Flash>,
) -> Markup {
    layout::admin_page(
        "Sites",
        flash,
        html! {
            @let list_query = format!(
                "status={}&q={}",
                filter.as_str(),
                urlencoding::encode(query),
            );
            h1 { "Propositions de sites" }
            (status_filter_bar("/admin", filter, counts))
            form.filter-bar action="/admin" method="get" {
                input type="hidden" name="status" value=(filter.as_str());
                input type="text" name="q" value=(query) placeholder="Rechercher...";
                button type="submit" { "Filtrer" }
                a.button href="/admin/propositions/new" { "Ajouter un site" }
            }
            @if entries.is_empty() {
                p { "Aucune entrée pour ce filtre." }
            } @else {
                table.admin {
                    thead {
                        tr {
                            th { "Site" }
                            th { "Catégorie" }
                            th { "Description" }
                            th { "Statut" }
                            th { "Soumis le" }
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @for site in entries {
                            @let base = format!("/admin/propositions/{}", site.id);
                            tr {
                                td {
                                    a href=(site.url) rel="nofollow noopener" target="_blank" {
                                        (site.name)
                                    }
                                    @if let Some(city) = &site.city {
                                        @if !city.is_empty() {
                                            br; span.meta { (city) }
                                        }
                                    }
                                }
                                td { (site.category) }
                                td { (truncate(&site.description, 80)) }
                                td { (status_badge(&site.status)) }
                                td { (site.submitted_at) }
                                td {
                                    (moderation_buttons(&base, &site.status))
                                    a.button.ghost href={ (base) "/edit" } { "Modifier" }
                                    @if site.status == "valid" {
                                        (move_buttons(&format!("/admin/sites/{}", site.id), &list_query))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Admin site create/edit form. `status` is empty for the create page.
pub fn site_form_admin(
    title: &str,
    action: &str,
    values: &SiteSubmission,
    status: Option<&str>,
    errors: &FieldErrors,
    flash: Option<&Flash>,
) -> Markup {
    let field_error = |field: &str| {
        html! {
            @if let Some(message) = errors.get(field) {
                p.field-error { (message) }
            }
        }
    };
    layout::admin_page(
        title,
        flash,
        html! {
            h1 { (title) }
            form.stacked action=(action) method="post" {
                label for="name" { "Nom du site" }
                input type="text" id="name" name="name" value=(values.name) required;
                (field_error("name"))

                label for="city" { "Ville" }
                input type="text" id="city" name="city" value=(values.city);
                (field_error("city"))

                label for="url" { "Adresse" }
                input type="url" id="url" name="url" value=(values.url) required;
                (field_error("url"))

                label for="category" { "Catégorie" }
                input type="text" id="category" name="category" value=(values.category) required;
                (field_error("category"))

                label for="description" { "Description" }
                textarea id="description" name="description" required { (values.description) }
                (field_error("description"))

                @if let Some(status) = status {
                    label for="status" { "Statut" }
                    select id="status" name="status" {
                        @for candidate in Status::ALL {
                            option value=(candidate.as_str())
                                selected[candidate.as_str() == status] {
                                (candidate.label())
                            }
                        }
                    }
                }

                p {
                    button type="submit" { "Enregistrer" }
                    " "
                    a.button.ghost href="/admin" { "Annuler" }
                }
            }
        },
    )
}

fn sort_header(
    label: &str,
    column: TalentSort,
    sort: TalentSort,
    order: SortOrder,
    base_query: &str,
) -> Markup {
    let next_order = if column == sort {
        order.toggled()
    } else {
        SortOrder::Desc
    };
    let marker = match (column == sort, order) {
        (true, SortOrder::Asc) => " ▲",
        (true, SortOrder::Desc) => " ▼",
        (false, _) => "",
    };
    html! {
        th {
            a href={ "/admin/talents?" (base_query) "&sort=" (column.as_column())
                     "&order=" (next_order.as_sql().to_lowercase()) } {
                (label) (marker)
            }
        }
    }
}

/// Talent moderation dashboard with sortable columns and a category
/// filter.
#[allow(clippy::too_many_arguments)]
pub fn talents_dashboard(
    entries: &[TalentRecord],
    counts: &StatusCounts,
    category_stats: &[(String, i64)],
    filter: StatusFilter,
    query: &str,
    sort: TalentSort,
    order: SortOrder,
    category: Option<&str>,
    flash: Option<&Flash>,
) -> Markup {
    // carried by every sort/filter link so the views compose
    let base_query = format!(
        "status={}&q={}&category={}",
        filter.as_str(),
        urlencoding::encode(query),
        urlencoding::encode(category.unwrap_or("")),
    );
    let list_query = format!(
        "{base_query}&sort={}&order={}",
        sort.as_column(),
        order.as_sql().to_lowercase(),
    );
    layout::admin_page(
        "Talents",
        flash,
        html! {
            h1 { "Talents" }
            (status_filter_bar("/admin/talents", filter, counts))
            div.filter-bar {
                a.active[category.is_none()]
                    href={ "/admin/talents?status=" (filter.as_str()) } {
                    "Toutes catégories"
                }
                @for (name, count) in category_stats {
                    a.active[category == Some(name.as_str())]
                        href={ "/admin/talents?status=" (filter.as_str())
                               "&category=" (urlencoding::encode(name)) } {
                        (name) " (" (count) ")"
                    }
                }
            }
            form.filter-bar action="/admin/talents" method="get" {
                input type="hidden" name="status" value=(filter.as_str());
                input type="text" name="q" value=(query) placeholder="Rechercher...";
                button type="submit" { "Filtrer" }
                a.button href="/admin/talents/new" { "Ajouter un talent" }
            }
            @if entries.is_empty() {
                p { "Aucune entrée pour ce filtre." }
            } @else {
                table.admin {
                    thead {
                        tr {
                            (sort_header("Pseudo", TalentSort::Handle, sort, order, &base_query))
                            (sort_header("Catégorie", TalentSort::Category, sort, order, &base_query))
                            th { "Description" }
                            (sort_header("Statut", TalentSort::Status, sort, order, &base_query))
                            (sort_header("Ordre", TalentSort::DisplayOrder, sort, order, &base_query))
                            (sort_header("Mis à jour", TalentSort::UpdatedAt, sort, order, &base_query))
                            th { "Actions" }
                        }
                    }
                    tbody {
                        @for talent in entries {
                            @let base = format!("/admin/talents/{}", talent.id);
                            tr {
                                td {
                                    a href=(talent.instagram) rel="nofollow noopener" target="_blank" {
                                        "@" (talent.handle)
                                    }
                                }
                                td { (talent.category) }
                                td { (truncate(&talent.description, 80)) }
                                td { (status_badge(&talent.status)) }
                                td { (talent.display_order) }
                                td { (talent.updated_at) }
                                td {
                                    (moderation_buttons(&base, &talent.status))
                                    a.button.ghost href={ (base) "/edit" } { "Modifier" }
                                    @if talent.status == "valid" {
                                        (move_buttons(&base, &list_query))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Admin talent create/edit form.
pub fn talent_form_admin(
    title: &str,
    action: &str,
    values: &TalentAdminForm,
    errors: &FieldErrors,
    flash: Option<&Flash>,
) -> Markup {
    let field_error = |field: &str| {
        html! {
            @if let Some(message) = errors.get(field) {
                p.field-error { (message) }
            }
        }
    };
    layout::admin_page(
        title,
        flash,
        html! {
            h1 { (title) }
            form.stacked action=(action) method="post" {
                label for="handle" { "Pseudo Instagram" }
                input type="text" id="handle" name="handle" value=(values.handle) required;
                (field_error("handle"))

                label for="instagram" { "Lien Instagram" }
                input type="url" id="instagram" name="instagram" value=(values.instagram) required;
                (field_error("instagram"))

                label for="category" { "Catégorie" }
                select id="category" name="category" {
                    option value="" selected[values.category.is_empty()] { "Autre" }
                    @for candidate in TALENT_CATEGORIES {
                        option value=(candidate) selected[*candidate == values.category] {
                            (candidate)
                        }
                    }
                }
                (field_error("category"))

                label for="image" { "Image (chemin relatif)" }
                input type="text" id="image" name="image" value=(values.image)
                    placeholder="img/talents/...";
                (field_error("image"))

                label for="description" { "Description" }
                textarea id="description" name="description" required { (values.description) }
                (field_error("description"))

                label for="status" { "Statut" }
                select id="status" name="status" {
                    @for candidate in Status::ALL {
                        option value=(candidate.as_str())
                            selected[candidate.as_str() == values.status] {
                            (candidate.label())
                        }
                    }
                }
                (field_error("status"))

                label for="display_order" { "Ordre d'affichage" }
                input type="number" id="display_order" name="display_order"
                    value=(values.display_order) min="0";
                (field_error("display_order"))

                p {
                    button type="submit" { "Enregistrer" }
                    " "
                    a.button.ghost href="/admin/talents" { "Annuler" }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_site(status: &str) -> SiteRecord {
        SiteRecord {
            id: 7,
            name: "Chez Paul".into(),
            city: None,
            url: "https://chezpaul.re".into(),
            description: "Le meilleur cari de l'île.".into(),
            category: "Restaurants".into(),
            status: status.into(),
            featured: 0,
            display_order: 1,
            submitted_at: "2024-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn dashboard_shows_approve_only_for_unpublished() {
        let counts = StatusCounts::default();
        let pending = sites_dashboard(
            &[sample_site("pending")],
            &counts,
            StatusFilter::Only(Status::Pending),
            "",
            None,
        )
        .into_string();
        assert!(pending.contains("/admin/propositions/7/approve"));
        assert!(!pending.contains("/admin/sites/7/move/up"));

        let valid = sites_dashboard(
            &[sample_site("valid")],
            &counts,
            StatusFilter::Only(Status::Valid),
            "",
            None,
        )
        .into_string();
        assert!(!valid.contains("/admin/propositions/7/approve"));
        assert!(valid.contains("/admin/sites/7/move/up"));
    }

    fn sample_talent(status: &str) -> TalentRecord {
        TalentRecord {
            id: 9,
            handle: "gramoun".into(),
            instagram: "https://www.instagram.com/gramoun/".into(),
            description: "Chansons lontan de l'île.".into(),
            category: "Chanteurs".into(),
            image: String::new(),
            status: status.into(),
            display_order: 2,
            created_at: "2024-01-01 00:00:00".into(),
            updated_at: "2024-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn move_forms_carry_the_dashboard_filters() {
        let rendered = talents_dashboard(
            &[sample_talent("valid")],
            &StatusCounts::default(),
            &[("Chanteurs".into(), 1)],
            StatusFilter::Only(Status::Valid),
            "gram",
            TalentSort::Handle,
            SortOrder::Asc,
            Some("Chanteurs"),
            None,
        )
        .into_string();
        assert!(rendered.contains(
            "/admin/talents/9/move/up?status=valid&amp;q=gram&amp;category=Chanteurs&amp;sort=handle&amp;order=asc"
        ));

        let sites = sites_dashboard(
            &[sample_site("valid")],
            &StatusCounts::default(),
            StatusFilter::Only(Status::Valid),
            "paul",
            None,
        )
        .into_string();
        assert!(sites.contains("/admin/sites/7/move/up?status=valid&amp;q=paul"));
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("héhé", 10), "héhé");
        assert_eq!(truncate("ééééé", 3), "ééé…");
    }

    #[test]
    fn sort_header_toggles_order() {
        let rendered = sort_header(
            "Pseudo",
            TalentSort::Handle,
            TalentSort::Handle,
            SortOrder::Desc,
            "status=all&q=&category=",
        )
        .into_string();
        assert!(rendered.contains("order=asc"));
        assert!(rendered.contains("▼"));
    }
}
