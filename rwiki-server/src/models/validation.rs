//! Validation error types

use std::collections::BTreeMap;
use std::fmt;

/// Validation error for a single form field
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is below minimum length
    TooShort { field: &'static str, min: usize },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value doesn't match the required format
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Value is not one of the allowed choices
    InvalidVariant { field: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidVariant { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} est obligatoire"),
            Self::TooShort { field, min } => {
                write!(f, "{field} doit faire au moins {min} caractères")
            }
            Self::TooLong { field, max } => {
                write!(f, "{field} ne peut pas dépasser {max} caractères")
            }
            Self::InvalidFormat { field, reason } => write!(f, "{field} : {reason}"),
            Self::InvalidVariant { field, value } => {
                write!(f, "valeur '{value}' invalide pour {field}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Per-field error collection for form re-rendering.
///
/// Keyed by the form field name; one message per field (the first
/// failure wins, matching how the forms short-circuit per field).
#[derive(Debug, Clone, Default)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.entry(err.field()).or_insert_with(|| err.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
