// Marketplace HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction, bearer-token
// injection, and error-body parsing. Endpoint groups (payments, visits,
// views) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::BearerToken;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the marketplace backend.
///
/// Cheap to clone; the inner `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MarketplaceClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the site root (e.g. `https://soko.example`); endpoint
    /// paths are appended under `/api/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`, keeping any path prefix on the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let body = Self::check_response(resp).await?;
        Self::decode(&body)
    }

    /// Send a POST request with a JSON body, returning the raw response text.
    pub(crate) async fn post_json(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        token: Option<&BearerToken>,
    ) -> Result<String, Error> {
        debug!("POST {}", url);

        let mut builder = self.http.post(url).json(body);
        if let Some(token) = token {
            builder = token.apply(builder);
        }
        let resp = builder.send().await?;
        Self::check_response(resp).await
    }

    /// Send a multipart POST, returning the raw response text.
    pub(crate) async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
        token: &BearerToken,
    ) -> Result<String, Error> {
        debug!("POST (multipart) {}", url);

        let builder = token.apply(self.http.post(url).multipart(form));
        let resp = builder.send().await?;
        Self::check_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Turn a response into its body text, or the matching error.
    ///
    /// An explicit `error` field wins over the status code: the backend
    /// sometimes reports failures with HTTP 200.
    async fn check_response(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        if let Some(message) = error_message(&body) {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("backend refused the session token (HTTP {status})"),
            });
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        Ok(body)
    }

    pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        })
    }
}

/// Extract a human-readable message from an error body, if there is one.
///
/// Error bodies are objects: `{"error": "..."}` or
/// `{"error": {"message": "..."}}`. Arrays and scalars never carry one.
fn error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    match parsed.as_object()?.get("error")?.clone() {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Object(map) => {
            let message = map
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(String::from);
            Some(message.unwrap_or_else(|| serde_json::Value::Object(map).to_string()))
        }
        other => Some(other.to_string()),
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error":"insufficient proof"}"#).as_deref(),
            Some("insufficient proof")
        );
        assert_eq!(
            error_message(r#"{"error":{"message":"listing closed","code":"E1"}}"#).as_deref(),
            Some("listing closed")
        );
        assert_eq!(error_message(r#"{"error":null,"success":true}"#), None);
        assert_eq!(error_message(r#"{"success":true}"#), None);
        assert_eq!(error_message("not json"), None);
    }

    #[test]
    fn arrays_are_never_error_bodies() {
        assert_eq!(error_message(r#"[{"id":"mtn_momo","isActive":true}]"#), None);
        assert_eq!(error_message(r#"["insufficient proof"]"#), None);
        assert_eq!(error_message(r#""error""#), None);
    }

    #[test]
    fn api_url_keeps_base_path_prefix() {
        let client = MarketplaceClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://soko.example/app/").unwrap(),
        );
        assert_eq!(
            client.api_url("/visit-requests").unwrap().as_str(),
            "https://soko.example/app/api/visit-requests"
        );
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        assert_eq!(preview(&long).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
