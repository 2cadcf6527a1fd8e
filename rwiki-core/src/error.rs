/// Structured error types for rwiki-core.
///
/// Uses `thiserror` for composable library errors. The binary crate
/// (rwiki-cli) wraps these with `anyhow` for user-facing context.
use thiserror::Error;

/// Main error type for rwiki-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// A required environment variable is missing or empty
    #[error("missing required configuration: {var}")]
    MissingConfig { var: &'static str },

    /// An environment variable holds an unparseable value
    #[error("invalid value for {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },
}

/// Result type alias for rwiki-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn missing(var: &'static str) -> Self {
        Self::MissingConfig { var }
    }

    pub fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            var,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::missing("SESSION_SECRET");
        assert_eq!(
            err.to_string(),
            "missing required configuration: SESSION_SECRET"
        );

        let err = CoreError::invalid("BIND_ADDR", "not a socket address");
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
