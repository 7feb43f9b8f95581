// ── Core error types ──
//
// Domain errors from soko-core. The flow never lets these escape
// `submit()`: each one is reduced to `user_message()` and stored on the
// draft. The `From<soko_api::Error>` impl translates transport-layer
// errors into domain variants.

use thiserror::Error;

/// Shown when a submission fails without a usable server message.
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit visit request. Please try again.";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("authentication required")]
    AuthenticationRequired,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Backend ──────────────────────────────────────────────────────
    /// Backend answered with a human-readable `error` message.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// Transport failure or an unexpected response.
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Visit request flow is closed")]
    FlowClosed,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The message stored in a draft's `last_error`.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationRequired => "authentication required".into(),
            Self::Validation { message } | Self::Rejected { message } => message.clone(),
            Self::FlowClosed => "visit request closed".into(),
            Self::Api { .. } | Self::Config { .. } => GENERIC_SUBMIT_FAILURE.into(),
        }
    }
}

impl From<soko_api::Error> for CoreError {
    fn from(err: soko_api::Error) -> Self {
        match err {
            soko_api::Error::Rejected { message, .. } => Self::Rejected { message },
            soko_api::Error::Authentication { .. } => Self::AuthenticationRequired,
            soko_api::Error::Http { status, body } => Self::Api {
                message: format!("HTTP {status}: {body}"),
                status: Some(status),
            },
            soko_api::Error::Tls(message) => Self::Config { message },
            other => Self::Api {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_kept_verbatim() {
        let err = CoreError::from(soko_api::Error::Rejected {
            status: 400,
            message: "insufficient proof".into(),
        });
        assert_eq!(err.user_message(), "insufficient proof");
    }

    #[test]
    fn unexpected_responses_use_generic_message() {
        let err = CoreError::from(soko_api::Error::Http {
            status: 500,
            body: "<html>oops</html>".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
        assert_eq!(err.user_message(), GENERIC_SUBMIT_FAILURE);
    }

    #[test]
    fn refused_token_means_authentication_required() {
        let err = CoreError::from(soko_api::Error::Authentication {
            message: "HTTP 401".into(),
        });
        assert_eq!(err.user_message(), "authentication required");
    }
}
