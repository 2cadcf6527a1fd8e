//! Site listing forms and validation.

use serde::Deserialize;

use super::sanitize::{clean_line, clean_multiline, looks_like_script};
use super::validation::{FieldErrors, ValidationError};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const CITY_MAX: usize = 50;
const URL_MAX: usize = 255;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 500;

/// Raw site submission, as posted by the public form (and reused as
/// the admin create/edit form body). Also carries the values back to
/// the template on validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Bot trap: legitimate browsers leave this empty.
    #[serde(default)]
    pub honeypot: String,
}

/// A validated site ready for insertion/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSite {
    pub name: String,
    pub city: Option<String>,
    pub url: String,
    pub description: String,
    pub category: String,
}

impl SiteSubmission {
    /// Validate a public submission. The category must be one of the
    /// categories currently visible on the site.
    pub fn validate(&self, categories: &[String]) -> Result<NewSite, FieldErrors> {
        let mut site = self.validate_fields()?;
        if !categories.iter().any(|c| c == &site.category) {
            let mut errors = FieldErrors::new();
            errors.push(ValidationError::InvalidVariant {
                field: "category",
                value: std::mem::take(&mut site.category),
            });
            return Err(errors);
        }
        Ok(site)
    }

    /// Validate an admin submission: any non-empty category is
    /// accepted, so the admin can introduce new categories.
    pub fn validate_admin(&self) -> Result<NewSite, FieldErrors> {
        self.validate_fields()
    }

    fn validate_fields(&self) -> Result<NewSite, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !self.honeypot.trim().is_empty() {
            errors.push(ValidationError::InvalidFormat {
                field: "honeypot",
                reason: "formulaire invalide",
            });
            return Err(errors);
        }

        let name = clean_line(&self.name);
        match name.chars().count() {
            0 => errors.push(ValidationError::Empty { field: "name" }),
            n if n < NAME_MIN => errors.push(ValidationError::TooShort {
                field: "name",
                min: NAME_MIN,
            }),
            n if n > NAME_MAX => errors.push(ValidationError::TooLong {
                field: "name",
                max: NAME_MAX,
            }),
            _ => {}
        }
        if name.contains(['<', '>', '"', '\'']) {
            errors.push(ValidationError::InvalidFormat {
                field: "name",
                reason: "ne peut pas contenir les caractères < > \" '",
            });
        }

        let city = clean_line(&self.city);
        if city.chars().count() > CITY_MAX {
            errors.push(ValidationError::TooLong {
                field: "city",
                max: CITY_MAX,
            });
        }

        let url = clean_line(&self.url);
        if url.is_empty() {
            errors.push(ValidationError::Empty { field: "url" });
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::InvalidFormat {
                field: "url",
                reason: "l'URL doit commencer par http:// ou https://",
            });
        } else if url.len() > URL_MAX {
            errors.push(ValidationError::TooLong {
                field: "url",
                max: URL_MAX,
            });
        }

        if looks_like_script(&self.description) {
            errors.push(ValidationError::InvalidFormat {
                field: "description",
                reason: "contenu non autorisé",
            });
        }
        let description = clean_multiline(&self.description);
        match description.chars().count() {
            0 => errors.push(ValidationError::Empty {
                field: "description",
            }),
            n if n < DESCRIPTION_MIN => errors.push(ValidationError::TooShort {
                field: "description",
                min: DESCRIPTION_MIN,
            }),
            n if n > DESCRIPTION_MAX => errors.push(ValidationError::TooLong {
                field: "description",
                max: DESCRIPTION_MAX,
            }),
            _ => {}
        }

        let category = clean_line(&self.category);
        if category.is_empty() {
            errors.push(ValidationError::Empty { field: "category" });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewSite {
            name,
            city: if city.is_empty() { None } else { Some(city) },
            url,
            description,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<String> {
        vec!["Restaurants".to_string(), "Sorties Nature".to_string()]
    }

    fn valid_submission() -> SiteSubmission {
        SiteSubmission {
            name: "Chez Paul".into(),
            city: "Saint-Denis".into(),
            url: "https://chezpaul.re".into(),
            description: "Un restaurant créole au centre-ville.".into(),
            category: "Restaurants".into(),
            honeypot: String::new(),
        }
    }

    #[test]
    fn accepts_valid_submission() {
        let site = valid_submission().validate(&categories()).unwrap();
        assert_eq!(site.name, "Chez Paul");
        assert_eq!(site.city.as_deref(), Some("Saint-Denis"));
        assert_eq!(site.category, "Restaurants");
    }

    #[test]
    fn empty_city_becomes_none() {
        let mut sub = valid_submission();
        sub.city = "   ".into();
        let site = sub.validate(&categories()).unwrap();
        assert_eq!(site.city, None);
    }

    #[test]
    fn honeypot_rejects_everything() {
        let mut sub = valid_submission();
        sub.honeypot = "spam".into();
        let errors = sub.validate(&categories()).unwrap_err();
        assert!(errors.get("honeypot").is_some());
    }

    #[test]
    fn rejects_short_name_and_description() {
        let mut sub = valid_submission();
        sub.name = "x".into();
        sub.description = "court".into();
        let errors = sub.validate(&categories()).unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("description").is_some());
    }

    #[test]
    fn rejects_dangerous_name_characters() {
        let mut sub = valid_submission();
        sub.name = "Chez \"Paul\"".into();
        let errors = sub.validate(&categories()).unwrap_err();
        assert!(errors.get("name").unwrap().contains("caractères"));
    }

    #[test]
    fn rejects_non_http_url() {
        let mut sub = valid_submission();
        sub.url = "ftp://chezpaul.re".into();
        let errors = sub.validate(&categories()).unwrap_err();
        assert!(errors.get("url").is_some());
    }

    #[test]
    fn rejects_script_in_description() {
        let mut sub = valid_submission();
        sub.description = "voir <script>alert(1)</script> ce super site vraiment".into();
        let errors = sub.validate(&categories()).unwrap_err();
        assert!(errors.get("description").is_some());
    }

    #[test]
    fn public_rejects_unknown_category() {
        let mut sub = valid_submission();
        sub.category = "Ovnis".into();
        let errors = sub.validate(&categories()).unwrap_err();
        assert!(errors.get("category").is_some());
    }

    #[test]
    fn admin_accepts_new_category() {
        let mut sub = valid_submission();
        sub.category = "Ovnis".into();
        let site = sub.validate_admin().unwrap();
        assert_eq!(site.category, "Ovnis");
    }

    #[test]
    fn strips_tags_before_length_check() {
        let mut sub = valid_submission();
        sub.name = "<b>Chez Paul</b>".into();
        let site = sub.validate(&categories()).unwrap();
        assert_eq!(site.name, "Chez Paul");
    }
}
