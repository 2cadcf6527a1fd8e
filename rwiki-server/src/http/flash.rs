//! One-shot notices carried across redirects in the query string.
//!
//! No server-side flash storage: the redirect target receives
//! `?notice=...&notice_kind=...` and renders the banner once.

use axum::response::Redirect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Unknown kinds degrade to info rather than erroring.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    /// Append this notice to a path, preserving existing query params.
    pub fn attach_to(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{path}{separator}notice={}&notice_kind={}",
            urlencoding::encode(&self.message),
            self.kind.as_str(),
        )
    }

    /// Redirect to `path` with this notice attached.
    pub fn redirect(&self, path: &str) -> Redirect {
        Redirect::to(&self.attach_to(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_encodes_and_picks_separator() {
        let flash = Flash::success("Site publié !");
        assert_eq!(
            flash.attach_to("/admin"),
            "/admin?notice=Site%20publi%C3%A9%20%21&notice_kind=success"
        );
        let with_query = flash.attach_to("/admin?status=all");
        assert!(with_query.starts_with("/admin?status=all&notice="));
    }

    #[test]
    fn unknown_kind_parses_as_info() {
        assert_eq!(FlashKind::parse("success"), FlashKind::Success);
        assert_eq!(FlashKind::parse("warning"), FlashKind::Info);
    }
}
