// ── Listing view tracking ──
//
// Fire-and-forget: failures are logged and otherwise ignored.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::VisitBackend;

/// Record a listing view, swallowing any failure.
pub async fn track_view(backend: &dyn VisitBackend, listing_id: &str) {
    match backend.track_view(listing_id).await {
        Ok(()) => debug!(listing_id, "listing view recorded"),
        Err(e) => warn!(listing_id, error = %e, "failed to record listing view"),
    }
}

/// Spawn [`track_view`] in the background. Must be called inside a Tokio
/// runtime; the handle may be dropped.
pub fn spawn_track_view(backend: Arc<dyn VisitBackend>, listing_id: String) -> JoinHandle<()> {
    tokio::spawn(async move { track_view(backend.as_ref(), &listing_id).await })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use soko_api::{BearerToken, ProofUpload, VisitRequestAck, VisitRequestPayload};

    use super::*;
    use crate::error::CoreError;
    use crate::model::PaymentMethod;

    #[derive(Default)]
    struct FlakyTracker {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VisitBackend for FlakyTracker {
        async fn active_methods(&self) -> Result<Vec<PaymentMethod>, CoreError> {
            Ok(Vec::new())
        }

        async fn submit_visit_request(
            &self,
            _token: &BearerToken,
            _payload: &VisitRequestPayload,
            _proof: Option<&ProofUpload>,
        ) -> Result<VisitRequestAck, CoreError> {
            Err(CoreError::FlowClosed)
        }

        async fn track_view(&self, _listing_id: &str) -> Result<(), CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::Api {
                message: "tracking down".into(),
                status: Some(500),
            })
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let backend = FlakyTracker::default();
        track_view(&backend, "listing-1").await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn spawned_tracking_runs_in_background() {
        let backend = Arc::new(FlakyTracker::default());
        spawn_track_view(backend.clone(), "listing-1".into())
            .await
            .unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
