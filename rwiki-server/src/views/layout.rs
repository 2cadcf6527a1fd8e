//! Page shell, navigation and error pages.

use maud::{html, Markup, DOCTYPE};

use crate::http::flash::Flash;

const STYLESHEET: &str = include_str!("../../static/style.css");

/// Base document: header, notice banner, content, footer.
pub fn page(title: &str, flash: Option<&Flash>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " – Réunion Wiki" }
                style { (STYLESHEET) }
            }
            body {
                header.site-header {
                    a.brand href="/" { "Réunion Wiki" }
                    nav {
                        a href="/" { "Accueil" }
                        a href="/nouveaux-sites" { "Nouveaux sites" }
                        a href="/talents" { "Talents péi" }
                        a href="/recherche" { "Rechercher" }
                        a href="/formulaire" { "Proposer un site" }
                    }
                }
                main {
                    @if let Some(flash) = flash {
                        div class={ "notice " (flash.kind.as_str()) } { (flash.message) }
                    }
                    (content)
                }
                footer.site-footer {
                    "Réunion Wiki – l'annuaire collaboratif de La Réunion"
                }
            }
        }
    }
}

/// Admin shell: same document, different navigation.
pub fn admin_page(title: &str, flash: Option<&Flash>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " – Administration" }
                style { (STYLESHEET) }
            }
            body {
                header.site-header {
                    a.brand href="/admin" { "Réunion Wiki – Admin" }
                    nav {
                        a href="/admin" { "Sites" }
                        a href="/admin/talents" { "Talents" }
                        a href="/" { "Voir le site" }
                        a href="/admin/logout" { "Déconnexion" }
                    }
                }
                main {
                    @if let Some(flash) = flash {
                        div class={ "notice " (flash.kind.as_str()) } { (flash.message) }
                    }
                    (content)
                }
            }
        }
    }
}

pub fn not_found_page() -> Markup {
    page(
        "Page introuvable",
        None,
        html! {
            div.error-page {
                h1 { "404" }
                p { "Cette page n'existe pas ou n'existe plus." }
                p { a.button href="/" { "Retour à l'accueil" } }
            }
        },
    )
}

pub fn server_error_page() -> Markup {
    page(
        "Erreur",
        None,
        html! {
            div.error-page {
                h1 { "500" }
                p { "Une erreur interne est survenue. Merci de réessayer plus tard." }
                p { a.button href="/" { "Retour à l'accueil" } }
            }
        },
    )
}

pub fn rate_limited_page() -> Markup {
    page(
        "Trop de requêtes",
        None,
        html! {
            div.error-page {
                h1 { "429" }
                p { "Trop de requêtes. Patientez un moment avant de réessayer." }
                p { a.button href="/" { "Retour à l'accueil" } }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::flash::Flash;

    #[test]
    fn page_escapes_user_content() {
        let rendered = page(
            "Test",
            Some(&Flash::info("<script>alert(1)</script>")),
            html! { p { "ok" } },
        )
        .into_string();
        assert!(!rendered.contains("<script>alert"));
        assert!(rendered.contains("&lt;script&gt;"));
    }

    #[test]
    fn error_pages_carry_status_text() {
        assert!(not_found_page().into_string().contains("404"));
        assert!(server_error_page().into_string().contains("500"));
        assert!(rate_limited_page().into_string().contains("429"));
    }
}
