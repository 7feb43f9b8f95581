use thiserror::Error;

/// Top-level error type for the `soko-api` crate.
///
/// `soko-core` maps these into the user-facing messages stored on a
/// visit-request draft.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Backend refused the bearer token (HTTP 401/403 without an error body).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend responses ───────────────────────────────────────────
    /// The backend answered with an explicit `error` field.
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Non-success status without a parseable error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session token was refused.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Rejected { status, .. } | Self::Http { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The human-readable message the backend supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_rejections() {
        let rejected = Error::Rejected {
            status: 400,
            message: "insufficient proof".into(),
        };
        assert_eq!(rejected.server_message(), Some("insufficient proof"));

        let http = Error::Http {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(http.server_message(), None);
        assert!(http.is_transient());
    }

    #[test]
    fn unauthorized_counts_as_expired_session() {
        let err = Error::Rejected {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert!(err.is_auth_expired());
        assert!(
            Error::Authentication {
                message: "token refused".into()
            }
            .is_auth_expired()
        );
    }
}
