// ── Collaborator seams ──
//
// The flow only talks to the outside world through these traits. The
// HTTP implementations below wrap `soko_api::MarketplaceClient`; tests
// substitute in-memory fakes.

use async_trait::async_trait;

use soko_api::{BearerToken, MarketplaceClient, ProofUpload, VisitRequestAck, VisitRequestPayload};

use crate::convert;
use crate::error::CoreError;
use crate::model::{PaymentMethod, PaymentSettings};

/// "Get current session": a bearer token, or nothing.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_token(&self) -> Option<BearerToken>;
}

/// Read-only platform payment info.
#[async_trait]
pub trait PaymentSettingsProvider: Send + Sync {
    async fn payment_settings(&self) -> Result<PaymentSettings, CoreError>;
}

/// Backend endpoints used by the visit-request flow.
#[async_trait]
pub trait VisitBackend: Send + Sync {
    /// Currently active payment methods.
    async fn active_methods(&self) -> Result<Vec<PaymentMethod>, CoreError>;

    /// Send one visit request. Implementations must not retry.
    async fn submit_visit_request(
        &self,
        token: &BearerToken,
        payload: &VisitRequestPayload,
        proof: Option<&ProofUpload>,
    ) -> Result<VisitRequestAck, CoreError>;

    /// Record a listing view.
    async fn track_view(&self, listing_id: &str) -> Result<(), CoreError>;
}

// ── HTTP implementations ─────────────────────────────────────────────

#[async_trait]
impl PaymentSettingsProvider for MarketplaceClient {
    async fn payment_settings(&self) -> Result<PaymentSettings, CoreError> {
        let raw = MarketplaceClient::payment_settings(self).await?;
        Ok(raw.into())
    }
}

#[async_trait]
impl VisitBackend for MarketplaceClient {
    async fn active_methods(&self) -> Result<Vec<PaymentMethod>, CoreError> {
        let statuses = self.list_payment_methods().await?;
        Ok(convert::active_methods(statuses))
    }

    async fn submit_visit_request(
        &self,
        token: &BearerToken,
        payload: &VisitRequestPayload,
        proof: Option<&ProofUpload>,
    ) -> Result<VisitRequestAck, CoreError> {
        Ok(MarketplaceClient::submit_visit_request(self, token, payload, proof).await?)
    }

    async fn track_view(&self, listing_id: &str) -> Result<(), CoreError> {
        Ok(MarketplaceClient::track_view(self, listing_id).await?)
    }
}

// ── Static session ───────────────────────────────────────────────────

/// Session provider with a fixed token, resolved once from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<BearerToken>,
}

impl StaticSession {
    pub fn new(token: Option<BearerToken>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn current_token(&self) -> Option<BearerToken> {
        self.token.clone().filter(|t| !t.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_static_token_is_no_session() {
        let session = StaticSession::new(Some(BearerToken::from("   ".to_owned())));
        assert!(session.current_token().await.is_none());
        assert!(StaticSession::anonymous().current_token().await.is_none());

        let session = StaticSession::new(Some(BearerToken::from("tok".to_owned())));
        assert!(session.current_token().await.is_some());
    }
}
