// ── Runtime configuration ──
//
// These types describe how to reach the backend and how the flow behaves.
// They never touch disk: the CLI (via `soko-config`) builds them and
// hands them in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use soko_api::transport::{TlsMode, TransportConfig};
use soko_api::{BearerToken, MarketplaceClient};

use crate::backend::StaticSession;
use crate::error::CoreError;

/// Platform visit fee used when a listing does not specify one.
pub const DEFAULT_VISIT_FEE: u64 = 15_000;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// How to reach the marketplace backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root, e.g. `https://soko.example`.
    pub url: Url,
    /// Bearer token of the current session, if any.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Request timeout. Bounds how long a submission can stay in flight.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    pub fn build_client(&self) -> Result<MarketplaceClient, CoreError> {
        Ok(MarketplaceClient::new(self.url.clone(), &self.transport())?)
    }

    /// Session provider backed by the configured token.
    pub fn session(&self) -> StaticSession {
        StaticSession::new(self.token.clone().map(BearerToken::from))
    }
}

/// Tunables for [`VisitRequestFlow`](crate::VisitRequestFlow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Fee applied when a listing has none (or zero).
    pub default_visit_fee: u64,
    /// Refuse to submit without an attached payment proof.
    pub require_proof: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            default_visit_fee: DEFAULT_VISIT_FEE,
            require_proof: true,
        }
    }
}

impl FlowConfig {
    /// Resolve a listing's fee, falling back to the platform default.
    pub fn visit_fee(&self, listing_fee: Option<u64>) -> u64 {
        match listing_fee {
            Some(fee) if fee > 0 => fee,
            _ => self.default_visit_fee,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_missing_fee_uses_default() {
        let config = FlowConfig::default();
        assert_eq!(config.visit_fee(None), DEFAULT_VISIT_FEE);
        assert_eq!(config.visit_fee(Some(0)), DEFAULT_VISIT_FEE);
        assert_eq!(config.visit_fee(Some(25_000)), 25_000);
    }

    #[test]
    fn tls_maps_to_transport_mode() {
        let mut config = ClientConfig::new(Url::parse("https://soko.example").unwrap());
        config.tls = TlsVerification::DangerAcceptInvalid;
        assert!(matches!(config.transport().tls, TlsMode::DangerAcceptInvalid));
    }
}
