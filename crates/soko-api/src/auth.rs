// Bearer-token authentication
//
// The backend authenticates mutations with `Authorization: Bearer <token>`.
// Tokens are issued by the hosted auth service; this crate only carries them.

use secrecy::{ExposeSecret, SecretString};

/// Access token for authenticated backend calls.
///
/// Wraps a [`SecretString`] so the token never shows up in `Debug` output
/// or logs.
#[derive(Debug, Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }

    /// A blank token is treated the same as having no session at all.
    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }

    /// Attach the `Authorization` header to a request.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(self.0.expose_secret())
    }
}

impl From<SecretString> for BearerToken {
    fn from(token: SecretString) -> Self {
        Self(token)
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self(SecretString::from(token))
    }
}
