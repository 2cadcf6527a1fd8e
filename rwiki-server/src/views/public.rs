//! Public pages: home, categories, search and submission forms.

use maud::{html, Markup};

use rwiki_core::slugify;

use crate::db::{SiteRecord, TalentRecord};
use crate::http::flash::Flash;
use crate::models::{FieldErrors, SiteSubmission, TalentSubmission, TALENT_CATEGORIES};

use super::layout;

fn site_card(site: &SiteRecord) -> Markup {
    html! {
        article.card.featured[site.featured != 0] {
            h3 { a href=(site.url) rel="nofollow noopener" target="_blank" { (site.name) } }
            p.meta {
                (site.category)
                @if let Some(city) = &site.city {
                    @if !city.is_empty() { " · " (city) }
                }
            }
            p { (site.description) }
        }
    }
}

fn talent_card(talent: &TalentRecord) -> Markup {
    html! {
        article.card {
            @if !talent.image.is_empty() {
                img src={ "/" (talent.image) } alt=(talent.handle) loading="lazy";
            }
            h3 {
                a href=(talent.instagram) rel="nofollow noopener" target="_blank" {
                    "@" (talent.handle)
                }
            }
            p.meta { (talent.category) }
            p { (talent.description) }
        }
    }
}

fn field_error(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.get(field) {
            p.field-error { (message) }
        }
    }
}

/// Home: a teaser per category plus the latest additions.
pub fn home(
    groups: &[(String, Vec<SiteRecord>)],
    latest: &[SiteRecord],
    flash: Option<&Flash>,
) -> Markup {
    layout::page(
        "Accueil",
        flash,
        html! {
            h1 { "L'annuaire des sites de La Réunion" }
            p {
                "Sites, associations et bons plans de l'île, proposés par la "
                "communauté et vérifiés avant publication. "
                a href="/formulaire" { "Proposez le vôtre !" }
            }
            @for (category, sites) in groups {
                section {
                    h2 {
                        a href={ "/categorie/" (slugify(category)) } { (category) }
                    }
                    div.card-grid {
                        @for site in sites { (site_card(site)) }
                    }
                }
            }
            @if !latest.is_empty() {
                section {
                    h2 { a href="/nouveaux-sites" { "Derniers sites ajoutés" } }
                    div.card-grid {
                        @for site in latest { (site_card(site)) }
                    }
                }
            }
        },
    )
}

pub fn category_page(category: &str, sites: &[SiteRecord], flash: Option<&Flash>) -> Markup {
    layout::page(
        category,
        flash,
        html! {
            h1 { (category) }
            @if sites.is_empty() {
                p { "Aucun site publié dans cette catégorie pour le moment." }
            } @else {
                div.card-grid {
                    @for site in sites { (site_card(site)) }
                }
            }
        },
    )
}

pub fn latest_page(sites: &[SiteRecord], flash: Option<&Flash>) -> Markup {
    layout::page(
        "Nouveaux sites",
        flash,
        html! {
            h1 { "Nouveaux sites" }
            @if sites.is_empty() {
                p { "Aucun site publié pour le moment." }
            } @else {
                div.card-grid {
                    @for site in sites { (site_card(site)) }
                }
            }
        },
    )
}

/// Search form plus results. `query` echoes what the visitor typed;
/// `too_short` flags a non-empty query under the minimum length.
pub fn search_page(
    query: &str,
    results: &[SiteRecord],
    too_short: bool,
    flash: Option<&Flash>,
) -> Markup {
    layout::page(
        "Recherche",
        flash,
        html! {
            h1 { "Rechercher un site" }
            form.stacked action="/recherche" method="get" {
                label for="q" { "Votre recherche" }
                input type="text" id="q" name="q" value=(query)
                    placeholder="Nom, catégorie, ville..." minlength="2";
                p { button type="submit" { "Rechercher" } }
            }
            @if too_short {
                p.field-error { "Saisissez au moins 2 caractères." }
            } @else if !query.is_empty() {
                @if results.is_empty() {
                    p { "Aucun résultat pour « " (query) " »." }
                } @else {
                    p { (results.len()) " résultat(s) pour « " (query) " »" }
                    div.card-grid {
                        @for site in results { (site_card(site)) }
                    }
                }
            }
        },
    )
}

/// Public site submission form. Re-rendered with errors and the
/// visitor's values when validation fails.
pub fn site_form_page(
    categories: &[String],
    values: &SiteSubmission,
    errors: &FieldErrors,
    flash: Option<&Flash>,
) -> Markup {
    layout::page(
        "Proposer un site",
        flash,
        html! {
            h1 { "Proposer un site" }
            p { "Chaque proposition est relue avant d'être publiée." }
            form.stacked action="/formulaire" method="post" {
                label for="name" { "Nom du site" }
                input type="text" id="name" name="name" value=(values.name) required;
                (field_error(errors, "name"))

                label for="city" { "Ville (optionnel)" }
                input type="text" id="city" name="city" value=(values.city);
                (field_error(errors, "city"))

                label for="url" { "Adresse du site" }
                input type="url" id="url" name="url" value=(values.url)
                    placeholder="https://..." required;
                (field_error(errors, "url"))

                label for="category" { "Catégorie" }
                select id="category" name="category" required {
                    option value="" disabled selected[values.category.is_empty()] {
                        "Choisissez une catégorie"
                    }
                    @for category in categories {
                        option value=(category) selected[*category == values.category] {
                            (category)
                        }
                    }
                }
                (field_error(errors, "category"))

                label for="description" { "Description" }
                textarea id="description" name="description" required
                    minlength="10" maxlength="500" { (values.description) }
                (field_error(errors, "description"))

                div.hp-field aria-hidden="true" {
                    label for="honeypot" { "Ne pas remplir" }
                    input type="text" id="honeypot" name="honeypot" tabindex="-1" autocomplete="off";
                }

                p { button type="submit" { "Envoyer la proposition" } }
            }
        },
    )
}

/// Talent directory grouped by category.
pub fn talents_page(groups: &[(String, Vec<TalentRecord>)], flash: Option<&Flash>) -> Markup {
    layout::page(
        "Talents péi",
        flash,
        html! {
            h1 { "Talents péi" }
            p {
                "Comédiens, chanteurs et créateurs de contenu de La Réunion. "
                a href="/proposer-talent" { "Proposer un talent" }
            }
            @for (category, talents) in groups {
                section {
                    h2 {
                        (category)
                        " "
                        a.section-link
                            href={ "/proposer-talent?category=" (urlencoding::encode(category)) } {
                            "Proposer"
                        }
                    }
                    div.card-grid {
                        @for talent in talents { (talent_card(talent)) }
                    }
                }
            }
            @if groups.is_empty() {
                p { "Aucun talent publié pour le moment." }
            }
        },
    )
}

/// Public talent submission form.
pub fn talent_form_page(
    values: &TalentSubmission,
    errors: &FieldErrors,
    flash: Option<&Flash>,
) -> Markup {
    layout::page(
        "Proposer un talent",
        flash,
        html! {
            h1 { "Proposer un talent" }
            p { "Chaque proposition est relue avant d'être publiée." }
            form.stacked action="/proposer-talent" method="post" {
                label for="handle" { "Pseudo Instagram" }
                input type="text" id="handle" name="handle" value=(values.handle) required;
                (field_error(errors, "handle"))

                label for="instagram" { "Lien du profil Instagram" }
                input type="url" id="instagram" name="instagram" value=(values.instagram)
                    placeholder="https://www.instagram.com/..." required;
                (field_error(errors, "instagram"))

                label for="category" { "Catégorie" }
                select id="category" name="category" {
                    option value="" selected[values.category.is_empty()] { "Autre" }
                    @for category in TALENT_CATEGORIES {
                        option value=(category) selected[*category == values.category] {
                            (category)
                        }
                    }
                }
                (field_error(errors, "category"))

                label for="description" { "Description" }
                textarea id="description" name="description" required
                    minlength="10" maxlength="300" { (values.description) }
                (field_error(errors, "description"))

                div.hp-field aria-hidden="true" {
                    label for="honeypot" { "Ne pas remplir" }
                    input type="text" id="honeypot" name="honeypot" tabindex="-1" autocomplete="off";
                }

                p { button type="submit" { "Envoyer la proposition" } }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_site() -> SiteRecord {
        SiteRecord {
            id: 1,
            name: "Chez Paul".into(),
            city: Some("Saint-Denis".into()),
            url: "https://chezpaul.re".into(),
            description: "Le meilleur cari de l'île.".into(),
            category: "Restaurants".into(),
            status: "valid".into(),
            featured: 1,
            display_order: 1,
            submitted_at: "2024-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn home_links_categories_by_slug() {
        let groups = vec![("Santé & Bien-être".to_string(), vec![sample_site()])];
        let rendered = home(&groups, &[], None).into_string();
        assert!(rendered.contains("/categorie/sante-et-bien-etre"));
    }

    #[test]
    fn site_card_escapes_description() {
        let mut site = sample_site();
        site.description = "<b>gras</b>".into();
        let rendered = category_page("Restaurants", &[site], None).into_string();
        assert!(rendered.contains("&lt;b&gt;gras&lt;/b&gt;"));
    }

    #[test]
    fn search_page_reports_short_query() {
        let rendered = search_page("a", &[], true, None).into_string();
        assert!(rendered.contains("au moins 2 caractères"));
    }

    #[test]
    fn form_keeps_values_and_errors() {
        let mut values = SiteSubmission::default();
        values.name = "Chez Paul".into();
        let mut errors = FieldErrors::new();
        errors.push(crate::models::ValidationError::TooShort {
            field: "description",
            min: 10,
        });
        let rendered =
            site_form_page(&["Restaurants".to_string()], &values, &errors, None).into_string();
        assert!(rendered.contains("Chez Paul"));
        assert!(rendered.contains("field-error"));
    }
}
