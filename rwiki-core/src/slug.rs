//! URL slugs for category names.
//!
//! Category names are free text and frequently accented French
//! ("Santé & Bien-être"), so slugification folds the common accented
//! characters to ASCII instead of dropping them, and turns `&` into
//! "et" to keep slugs readable.

const MAX_SLUG_LEN: usize = 100;

/// Return a URL-friendly slug for a category name.
///
/// Lowercase ASCII alphanumerics separated by single hyphens; accented
/// letters are folded, everything else collapses into a separator.
pub fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = false;

    let push_sep = |slug: &mut String, last: &mut bool| {
        if !slug.is_empty() && !*last {
            slug.push('-');
            *last = true;
        }
    };

    for ch in input.chars() {
        if ch == '&' {
            push_sep(&mut slug, &mut last_was_dash);
            slug.push_str("et");
            last_was_dash = false;
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
            continue;
        }
        match fold_accent(ch) {
            Some(folded) => {
                slug.push_str(folded);
                last_was_dash = false;
            }
            None => push_sep(&mut slug, &mut last_was_dash),
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Map an accented character to its ASCII spelling, or None if it is
/// a separator.
fn fold_accent(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'â' | 'ä' | 'á' | 'À' | 'Â' | 'Ä' | 'Á' => "a",
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => "e",
        'î' | 'ï' | 'í' | 'Î' | 'Ï' | 'Í' => "i",
        'ô' | 'ö' | 'ó' | 'Ô' | 'Ö' | 'Ó' => "o",
        'û' | 'ü' | 'ù' | 'ú' | 'Û' | 'Ü' | 'Ù' | 'Ú' => "u",
        'ç' | 'Ç' => "c",
        'ñ' | 'Ñ' => "n",
        'œ' | 'Œ' => "oe",
        'æ' | 'Æ' => "ae",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names() {
        assert_eq!(slugify("Restaurants"), "restaurants");
        assert_eq!(slugify("Sorties Nature"), "sorties-nature");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(slugify("Santé"), "sante");
        assert_eq!(slugify("Activités à La Réunion"), "activites-a-la-reunion");
    }

    #[test]
    fn ampersand_becomes_et() {
        assert_eq!(slugify("Santé & Bien-être"), "sante-et-bien-etre");
    }

    #[test]
    fn collapses_separators() {
        assert_eq!(slugify("  lots -- of   junk!! "), "lots-of-junk");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn truncates_long_input() {
        let long = "x".repeat(300);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn idempotent_on_canonical_slugs() {
        let slug = slugify("Santé & Bien-être");
        assert_eq!(slugify(&slug), slug);
    }
}
