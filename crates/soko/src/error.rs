//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use soko_config::ConfigError;
use soko_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const REJECTED: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the marketplace backend")]
    #[diagnostic(
        code(soko::connection_failed),
        help(
            "Check that the site URL is right and reachable.\n\
             Try: soko methods --api-url https://soko.example"
        )
    )]
    ConnectionFailed { message: String },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(soko::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) for local backends.")
    )]
    Tls { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication required")]
    #[diagnostic(
        code(soko::auth_required),
        help(
            "Sign in on the website, then store your session token with:\n\
             soko config set-token --profile {profile}\n\
             Or set the SOKO_TOKEN environment variable."
        )
    )]
    AuthRequired { profile: String },

    // ── Visit requests ───────────────────────────────────────────────
    #[error("Visit request rejected: {message}")]
    #[diagnostic(code(soko::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(soko::submit_failed),
        help("Nothing was recorded. Check your connection and run the command again.")
    )]
    SubmitFailed { message: String },

    #[error("No payment method is currently available")]
    #[diagnostic(
        code(soko::no_payment_methods),
        help("The platform has no active payment methods. Try again later.")
    )]
    NoPaymentMethods,

    #[error("Payment method '{method}' is not currently accepted")]
    #[diagnostic(
        code(soko::method_unavailable),
        help("Available: {available}\nRun: soko methods")
    )]
    MethodUnavailable { method: String, available: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(soko::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(soko::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(soko::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: soko config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No marketplace URL configured")]
    #[diagnostic(
        code(soko::no_config),
        help(
            "Create a profile with: soko config init\n\
             Expected at: {path}\n\
             Or pass --api-url / set SOKO_API_URL."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(soko::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(soko::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(soko::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(soko::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthRequired { .. } => exit_code::AUTH,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. }
            | Self::MethodUnavailable { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Map a draft's `last_error` after a failed submission.
    ///
    /// The flow stores user-facing text only, so the well-known messages
    /// are matched back to their variants.
    pub fn from_submission_failure(message: &str, profile: &str) -> Self {
        if message == CoreError::AuthenticationRequired.user_message() {
            Self::AuthRequired {
                profile: profile.into(),
            }
        } else if message == soko_core::GENERIC_SUBMIT_FAILURE {
            Self::SubmitFailed {
                message: message.into(),
            }
        } else {
            Self::Rejected {
                message: message.into(),
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationRequired => CliError::AuthRequired {
                profile: "current".into(),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Api {
                message,
                status: None,
            } => CliError::ConnectionFailed { message },

            CoreError::Api { message, .. } => CliError::ApiError { message },

            CoreError::FlowClosed => CliError::SubmitFailed {
                message: "visit request was closed".into(),
            },

            CoreError::Config { message } => CliError::Tls { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
