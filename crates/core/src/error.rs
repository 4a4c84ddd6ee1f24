//! Unified error types for pagesnap.
//!
//! Parameter errors carry the exact messages served to clients; the
//! HTTP status mapping lives with the server boundary.

/// Unified error types for the screenshot pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The url query parameter was absent or empty.
    #[error("Bad user input: missing url parameter")]
    MissingUrl,

    /// An integer parameter failed to parse (or was out of range).
    #[error("Invalid param \"{name}\" value \"{value}\"")]
    InvalidInteger { name: String, value: String },

    /// A boolean parameter was neither "true" nor "false".
    #[error("Invalid param \"{name}\" value \"{value}\" (value has to be true or false)")]
    InvalidBoolean { name: String, value: String },

    /// The shared browser handle could not supply a page session.
    #[error("browser unavailable: {0}")]
    RenderUnavailable(String),

    /// A rendering step failed after a session was acquired.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Artifact store I/O failed.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl Error {
    /// Whether this error was caused by bad user input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::MissingUrl | Error::InvalidInteger { .. } | Error::InvalidBoolean { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_message() {
        let err = Error::MissingUrl;
        assert!(err.to_string().contains("missing url parameter"));
    }

    #[test]
    fn test_invalid_integer_names_param_and_value() {
        let err = Error::InvalidInteger { name: "width".into(), value: "abc".into() };
        let msg = err.to_string();
        assert!(msg.contains("width"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_invalid_boolean_carries_hint() {
        let err = Error::InvalidBoolean { name: "force".into(), value: "yes".into() };
        assert!(err.to_string().contains("value has to be true or false"));
    }

    #[test]
    fn test_user_error_partition() {
        assert!(Error::MissingUrl.is_user_error());
        assert!(!Error::RenderFailed("boom".into()).is_user_error());
    }
}
