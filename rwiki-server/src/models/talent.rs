//! Talent profile forms and validation.

use serde::Deserialize;

use super::sanitize::{clean_line, clean_multiline};
use super::status::Status;
use super::validation::{FieldErrors, ValidationError};

/// Fixed talent categories, in public display order.
pub const TALENT_CATEGORIES: [&str; 4] =
    ["Comédiens", "Chanteurs", "Influenceurs", "Célébrités"];

const HANDLE_MIN: usize = 2;
const HANDLE_MAX: usize = 80;
const INSTAGRAM_MAX: usize = 255;
const DESCRIPTION_MIN: usize = 10;
const PUBLIC_DESCRIPTION_MAX: usize = 300;
const ADMIN_DESCRIPTION_MAX: usize = 400;
const IMAGE_MAX: usize = 255;

pub fn is_talent_category(category: &str) -> bool {
    TALENT_CATEGORIES.contains(&category)
}

/// Raw public talent proposal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TalentSubmission {
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub honeypot: String,
}

/// A validated talent ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTalent {
    pub handle: String,
    pub instagram: String,
    pub description: String,
    /// Empty when the submitter picked nothing (or something unknown).
    pub category: String,
}

impl TalentSubmission {
    pub fn validate(&self) -> Result<NewTalent, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !self.honeypot.trim().is_empty() {
            errors.push(ValidationError::InvalidFormat {
                field: "honeypot",
                reason: "formulaire invalide",
            });
            return Err(errors);
        }

        let handle = validate_handle(&self.handle, &mut errors);
        let instagram = validate_instagram(&self.instagram, &mut errors);
        let description = validate_description(
            &self.description,
            PUBLIC_DESCRIPTION_MAX,
            &mut errors,
        );

        // Unknown categories are silently dropped rather than
        // rejected: the select only offers valid choices, so anything
        // else came from a tampered request.
        let category = clean_line(&self.category);
        let category = if is_talent_category(&category) {
            category
        } else {
            String::new()
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewTalent {
            handle,
            instagram,
            description,
            category,
        })
    }
}

/// Admin create/edit form: all columns are editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TalentAdminForm {
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub display_order: String,
}

/// Validated admin talent payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalentUpdate {
    pub handle: String,
    pub instagram: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub status: Status,
    pub display_order: i64,
}

impl TalentAdminForm {
    pub fn validate(&self) -> Result<TalentUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let handle = validate_handle(&self.handle, &mut errors);
        let instagram = validate_instagram(&self.instagram, &mut errors);
        let description =
            validate_description(&self.description, ADMIN_DESCRIPTION_MAX, &mut errors);

        let category = clean_line(&self.category);
        if !category.is_empty() && !is_talent_category(&category) {
            errors.push(ValidationError::InvalidVariant {
                field: "category",
                value: category.clone(),
            });
        }

        let image = clean_line(&self.image);
        if image.chars().count() > IMAGE_MAX {
            errors.push(ValidationError::TooLong {
                field: "image",
                max: IMAGE_MAX,
            });
        }

        let status = match Status::parse(self.status.trim()) {
            Some(status) => status,
            None => {
                errors.push(ValidationError::InvalidVariant {
                    field: "status",
                    value: self.status.clone(),
                });
                Status::Pending
            }
        };

        let display_order = match self.display_order.trim() {
            "" => 0,
            raw => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => n,
                _ => {
                    errors.push(ValidationError::InvalidFormat {
                        field: "display_order",
                        reason: "doit être un entier positif",
                    });
                    0
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TalentUpdate {
            handle,
            instagram,
            description,
            category,
            image,
            status,
            display_order,
        })
    }
}

fn validate_handle(raw: &str, errors: &mut FieldErrors) -> String {
    let handle = clean_line(raw);
    match handle.chars().count() {
        0 => errors.push(ValidationError::Empty { field: "handle" }),
        n if n < HANDLE_MIN => errors.push(ValidationError::TooShort {
            field: "handle",
            min: HANDLE_MIN,
        }),
        n if n > HANDLE_MAX => errors.push(ValidationError::TooLong {
            field: "handle",
            max: HANDLE_MAX,
        }),
        _ => {}
    }
    handle
}

fn validate_instagram(raw: &str, errors: &mut FieldErrors) -> String {
    let url = clean_line(raw);
    if url.is_empty() {
        errors.push(ValidationError::Empty { field: "instagram" });
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ValidationError::InvalidFormat {
            field: "instagram",
            reason: "l'URL doit commencer par http:// ou https://",
        });
    } else if !url.to_lowercase().contains("instagram.com") {
        errors.push(ValidationError::InvalidFormat {
            field: "instagram",
            reason: "le lien doit provenir d'Instagram",
        });
    } else if url.len() > INSTAGRAM_MAX {
        errors.push(ValidationError::TooLong {
            field: "instagram",
            max: INSTAGRAM_MAX,
        });
    }
    url
}

fn validate_description(raw: &str, max: usize, errors: &mut FieldErrors) -> String {
    let description = clean_multiline(raw);
    match description.chars().count() {
        0 => errors.push(ValidationError::Empty {
            field: "description",
        }),
        n if n < DESCRIPTION_MIN => errors.push(ValidationError::TooShort {
            field: "description",
            min: DESCRIPTION_MIN,
        }),
        n if n > max => errors.push(ValidationError::TooLong {
            field: "description",
            max,
        }),
        _ => {}
    }
    description
}
