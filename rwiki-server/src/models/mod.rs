//! Domain models with validation at construction
//!
//! All user input is validated when building these types. Invalid
//! input collects per-field errors for form re-rendering, never
//! panics.

pub mod sanitize;
pub mod site;
pub mod status;
pub mod talent;
pub mod validation;

pub use site::{NewSite, SiteSubmission};
pub use status::{Status, StatusFilter};
pub use talent::{
    is_talent_category, NewTalent, TalentAdminForm, TalentSubmission, TalentUpdate,
    TALENT_CATEGORIES,
};
pub use validation::{FieldErrors, ValidationError};

/// Minimum length of a usable search query.
pub const MIN_QUERY_LEN: usize = 2;
