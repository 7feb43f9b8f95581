// ── Visit-request flow ──
//
// Drives one draft from method selection through proof upload to a
// single acknowledged submission. The draft lives inside a `watch`
// channel: every mutation is one `send_if_modified` closure, which makes
// the in-flight guard a single compare-and-set and gives consumers a
// change feed for free. Network awaits happen outside that critical
// section.

use std::sync::Arc;

use soko_api::VisitRequestAck;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{PaymentSettingsProvider, SessionProvider, VisitBackend};
use crate::config::FlowConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{
    ConfigurationGap, PaymentMethod, PaymentProof, PaymentSettings, VisitRequestDraft,
};
use crate::store::MethodCache;

/// Set on the draft once the backend has acknowledged a request.
pub const SUCCESS_MESSAGE: &str = "Visit request received. We will verify your payment proof \
    within 10-20 minutes, then an agent will call you to schedule the visit.";

const METHODS_UNAVAILABLE: &str =
    "Payment methods could not be loaded. Submission is disabled until one is available.";
const SETTINGS_UNAVAILABLE: &str =
    "Payment details could not be loaded; some fields may show as not configured.";

// ── FlowContext ──────────────────────────────────────────────────

/// Everything a flow needs from the outside world.
///
/// Cheap to clone; share one per session and open a flow per dialog.
#[derive(Clone)]
pub struct FlowContext {
    pub session: Arc<dyn SessionProvider>,
    pub settings: Arc<dyn PaymentSettingsProvider>,
    pub backend: Arc<dyn VisitBackend>,
    pub method_cache: Arc<MethodCache>,
    pub config: FlowConfig,
}

impl FlowContext {
    pub fn new(
        session: Arc<dyn SessionProvider>,
        settings: Arc<dyn PaymentSettingsProvider>,
        backend: Arc<dyn VisitBackend>,
        config: FlowConfig,
    ) -> Self {
        Self {
            session,
            settings,
            backend,
            method_cache: Arc::new(MethodCache::new()),
            config,
        }
    }

    /// Wire every seam to one HTTP client.
    pub fn from_client(
        client: soko_api::MarketplaceClient,
        session: Arc<dyn SessionProvider>,
        config: FlowConfig,
    ) -> Self {
        let client = Arc::new(client);
        Self::new(session, client.clone(), client, config)
    }
}

impl std::fmt::Debug for FlowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowContext")
            .field("method_cache", &self.method_cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ── VisitRequestFlow ─────────────────────────────────────────────

/// One visit-request dialog.
///
/// Cheaply cloneable via `Arc<FlowInner>`; clones share the same draft.
/// Every operation is a no-op once the flow is [cancelled](Self::cancel),
/// and results that arrive after that are dropped.
#[derive(Clone)]
pub struct VisitRequestFlow {
    inner: Arc<FlowInner>,
}

struct FlowInner {
    ctx: FlowContext,
    /// `None` once the draft has been discarded.
    state: watch::Sender<Option<VisitRequestDraft>>,
    /// Flips to `true` when the open-time prefetch has finished.
    prefetched: watch::Sender<bool>,
    cancel: CancellationToken,
}

impl VisitRequestFlow {
    /// Open a fresh draft for `listing_id`.
    ///
    /// The method selector starts from the shared cache; active methods and
    /// payment settings are fetched in a background task. Must be called
    /// inside a Tokio runtime. Use [`ready()`](Self::ready) to wait for the
    /// prefetch.
    pub fn open(ctx: FlowContext, listing_id: impl Into<String>, visit_fee: Option<u64>) -> Self {
        let listing_id = listing_id.into();
        let fee = ctx.config.visit_fee(visit_fee);
        let cached = ctx.method_cache.snapshot();
        let draft = VisitRequestDraft::new(listing_id.clone(), fee, cached.as_ref().clone());

        info!(%listing_id, fee, "opening visit request");

        let (state, _) = watch::channel(Some(draft));
        let (prefetched, _) = watch::channel(false);
        let inner = Arc::new(FlowInner {
            ctx,
            state,
            prefetched,
            cancel: CancellationToken::new(),
        });

        let task_inner = Arc::clone(&inner);
        tokio::spawn(async move {
            task_inner.prefetch().await;
            task_inner.prefetched.send_replace(true);
        });

        Self { inner }
    }

    /// Wait for the open-time prefetch to finish (or be cancelled).
    pub async fn ready(&self) -> Option<VisitRequestDraft> {
        let mut rx = self.inner.prefetched.subscribe();
        // Sender lives in `inner`, which `self` keeps alive.
        let _ = rx.wait_for(|done| *done).await;
        self.snapshot()
    }

    /// Current draft, or `None` if the flow was closed.
    pub fn snapshot(&self) -> Option<VisitRequestDraft> {
        self.inner.state.borrow().clone()
    }

    /// Change feed of the draft.
    pub fn subscribe(&self) -> watch::Receiver<Option<VisitRequestDraft>> {
        self.inner.state.subscribe()
    }

    /// Missing target details for the selected method, if any.
    pub fn configuration_gap(&self) -> Option<ConfigurationGap> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .and_then(VisitRequestDraft::configuration_gap)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.borrow().is_none()
    }

    /// Select a payment method. Ignored unless it is currently available.
    pub fn select_payment_method(&self, method: PaymentMethod) -> Option<VisitRequestDraft> {
        if !self.inner.update(|draft| draft.select_method(method)) {
            debug!(%method, "payment method selection ignored");
        }
        self.snapshot()
    }

    /// Attach (`Some`) or remove (`None`) the proof of payment.
    ///
    /// `PaymentProof` is validated on construction; a closed flow reports
    /// [`CoreError::FlowClosed`].
    pub fn attach_proof(
        &self,
        proof: Option<PaymentProof>,
    ) -> Result<VisitRequestDraft, CoreError> {
        if let Some(ref p) = proof {
            debug!(file = p.file_name(), size = p.size_bytes(), "attaching payment proof");
        }
        self.inner.update(|draft| draft.set_proof(proof));
        self.snapshot().ok_or(CoreError::FlowClosed)
    }

    /// Submit the visit request.
    ///
    /// At most one request is in flight per draft: calling this while a
    /// submission is pending (or after one succeeded) returns the current
    /// draft without touching the network. Every failure ends up in
    /// `last_error` with status `Failed`; nothing is returned as an error.
    ///
    /// Waits for the open-time prefetch first, so the method list cannot be
    /// swapped under a request that is already on the wire.
    pub async fn submit(&self) -> Option<VisitRequestDraft> {
        self.ready().await;
        if !self.inner.update(VisitRequestDraft::begin_submission) {
            debug!("submit ignored: in flight, already acknowledged, or closed");
            return self.snapshot();
        }

        let outcome = self.inner.send().await;

        let applied = self.inner.update(|draft| {
            match &outcome {
                Ok(ack) => {
                    info!(listing_id = draft.listing_id(), "visit request acknowledged");
                    draft.submission_succeeded(SUCCESS_MESSAGE, ack.request_id.clone());
                }
                Err(e) => {
                    warn!(listing_id = draft.listing_id(), error = %e, "visit request failed");
                    draft.submission_failed(e.user_message());
                }
            }
            true
        });
        if !applied {
            debug!("flow closed while submitting; result discarded");
        }

        self.snapshot()
    }

    /// Discard the draft. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
        if self.inner.state.send_if_modified(|slot| slot.take().is_some()) {
            info!("visit request closed");
        }
    }
}

impl std::fmt::Debug for VisitRequestFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitRequestFlow")
            .field("draft", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl FlowInner {
    /// Apply `f` to the live draft. Returns whether it reported a change;
    /// always `false` once the draft is gone.
    fn update(&self, f: impl FnOnce(&mut VisitRequestDraft) -> bool) -> bool {
        self.state.send_if_modified(|slot| slot.as_mut().is_some_and(f))
    }

    fn snapshot(&self) -> Option<VisitRequestDraft> {
        self.state.borrow().clone()
    }

    async fn prefetch(&self) {
        let ctx = &self.ctx;
        let fetch = async {
            tokio::join!(ctx.backend.active_methods(), ctx.settings.payment_settings())
        };

        let (methods, settings) = tokio::select! {
            () = self.cancel.cancelled() => {
                debug!("flow closed before prefetch finished");
                return;
            }
            results = fetch => results,
        };

        match methods {
            Ok(methods) => {
                debug!(count = methods.len(), "active payment methods loaded");
                ctx.method_cache.store(methods.clone());
                self.update(|draft| draft.set_available_methods(methods));
            }
            Err(e) => {
                warn!(error = %e, "could not load payment methods");
                self.update(|draft| {
                    let cleared = draft.set_available_methods(Vec::new());
                    draft.push_notice(METHODS_UNAVAILABLE.to_owned()) || cleared
                });
            }
        }

        match settings {
            Ok(settings) => {
                self.update(|draft| draft.set_payment_settings(settings));
            }
            Err(e) => {
                warn!(error = %e, "could not load payment settings");
                self.update(|draft| draft.push_notice(SETTINGS_UNAVAILABLE.to_owned()));
            }
        }
    }

    /// Validate, build the payload, and send exactly one request.
    async fn send(&self) -> Result<VisitRequestAck, CoreError> {
        let draft = self.snapshot().ok_or(CoreError::FlowClosed)?;

        let token = self
            .ctx
            .session
            .current_token()
            .await
            .filter(|t| !t.is_blank())
            .ok_or(CoreError::AuthenticationRequired)?;

        let method = draft.payment_method().ok_or_else(|| CoreError::Validation {
            message: "no payment method available".into(),
        })?;

        if self.ctx.config.require_proof && draft.payment_proof().is_none() {
            return Err(CoreError::Validation {
                message: "payment proof required".into(),
            });
        }

        let settings = self.settings_for_submit(&draft).await;
        if let Some(gap) = settings.gap_for(method) {
            warn!(%method, missing = ?gap.missing, "submitting with unconfigured payment target");
            let notice = gap.to_string();
            self.update(|d| d.push_notice(notice));
        }

        let target = settings.target_for(method);
        let payload =
            convert::visit_payload(draft.listing_id(), method, draft.visit_fee(), &target);
        let proof = draft.payment_proof().map(PaymentProof::to_upload);

        let ack = self
            .ctx
            .backend
            .submit_visit_request(&token, &payload, proof.as_ref())
            .await?;

        if ack.success == Some(false) {
            return Err(match ack.message {
                Some(message) => CoreError::Rejected { message },
                None => CoreError::Api {
                    message: "backend reported success=false".into(),
                    status: None,
                },
            });
        }

        Ok(ack)
    }

    /// Settings loaded at open, or a fresh fetch if that failed or has not
    /// finished. An unreachable provider degrades to empty targets.
    async fn settings_for_submit(&self, draft: &VisitRequestDraft) -> PaymentSettings {
        if let Some(settings) = draft.payment_settings() {
            return settings.clone();
        }
        match self.ctx.settings.payment_settings().await {
            Ok(settings) => {
                self.update(|d| d.set_payment_settings(settings.clone()));
                settings
            }
            Err(e) => {
                warn!(error = %e, "payment settings unavailable at submit");
                self.update(|d| d.push_notice(SETTINGS_UNAVAILABLE.to_owned()));
                PaymentSettings::default()
            }
        }
    }
}
