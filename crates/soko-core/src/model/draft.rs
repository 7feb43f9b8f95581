// ── Visit-request draft ──
//
// In-memory state of one visit request under construction. Only the flow
// mutates it; consumers get clones via snapshots.

use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::model::{ConfigurationGap, PaymentMethod, PaymentProof, PaymentSettings};

/// Which part of the flow the user is on. Only moves forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Details,
    /// Backend acknowledged the request; proof awaits human verification.
    Proof,
    /// Verified and scheduled. Reached outside this flow.
    Confirmation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// The mutable state a [`VisitRequestFlow`](crate::VisitRequestFlow) works on.
///
/// Invariants:
/// - `payment_method` is `None` or a member of `available_methods`;
/// - `step` never moves backward;
/// - `last_error` is set exactly when `submission_status` is `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRequestDraft {
    listing_id: String,
    visit_fee: u64,
    payment_method: Option<PaymentMethod>,
    available_methods: Vec<PaymentMethod>,
    payment_proof: Option<PaymentProof>,
    payment_settings: Option<PaymentSettings>,
    step: Step,
    submission_status: SubmissionStatus,
    last_error: Option<String>,
    success_message: Option<String>,
    request_id: Option<String>,
    notices: Vec<String>,
}

impl VisitRequestDraft {
    pub(crate) fn new(
        listing_id: String,
        visit_fee: u64,
        available_methods: Vec<PaymentMethod>,
    ) -> Self {
        let mut draft = Self {
            listing_id,
            visit_fee,
            payment_method: None,
            available_methods: Vec::new(),
            payment_proof: None,
            payment_settings: None,
            step: Step::Details,
            submission_status: SubmissionStatus::Idle,
            last_error: None,
            success_message: None,
            request_id: None,
            notices: Vec::new(),
        };
        draft.set_available_methods(available_methods);
        draft
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    pub fn visit_fee(&self) -> u64 {
        self.visit_fee
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn available_methods(&self) -> &[PaymentMethod] {
        &self.available_methods
    }

    pub fn payment_proof(&self) -> Option<&PaymentProof> {
        self.payment_proof.as_ref()
    }

    pub fn payment_settings(&self) -> Option<&PaymentSettings> {
        self.payment_settings.as_ref()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn submission_status(&self) -> SubmissionStatus {
        self.submission_status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    /// Backend id of the acknowledged request, when it sent one.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Non-blocking notices (degraded prefetch, configuration gaps).
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Configuration gap for the selected method, if settings are loaded.
    pub fn configuration_gap(&self) -> Option<ConfigurationGap> {
        let method = self.payment_method?;
        self.payment_settings.as_ref()?.gap_for(method)
    }

    // ── Mutations (flow only) ────────────────────────────────────────

    /// Replace the selectable set, keeping the selection valid.
    ///
    /// Returns `true` if anything changed.
    pub(crate) fn set_available_methods(&mut self, methods: Vec<PaymentMethod>) -> bool {
        let mut deduped: Vec<PaymentMethod> = Vec::with_capacity(methods.len());
        for method in methods {
            if !deduped.contains(&method) {
                deduped.push(method);
            }
        }

        let selection = match self.payment_method {
            Some(current) if deduped.contains(&current) => Some(current),
            _ => deduped.first().copied(),
        };

        let changed = deduped != self.available_methods || selection != self.payment_method;
        self.available_methods = deduped;
        self.payment_method = selection;
        changed
    }

    /// Select `method` if it is currently available. Stale selections are
    /// ignored.
    pub(crate) fn select_method(&mut self, method: PaymentMethod) -> bool {
        if !self.available_methods.contains(&method) || self.payment_method == Some(method) {
            return false;
        }
        self.payment_method = Some(method);
        true
    }

    pub(crate) fn set_proof(&mut self, proof: Option<PaymentProof>) -> bool {
        if self.payment_proof == proof {
            return false;
        }
        self.payment_proof = proof;
        true
    }

    pub(crate) fn set_payment_settings(&mut self, settings: PaymentSettings) -> bool {
        if self.payment_settings.as_ref() == Some(&settings) {
            return false;
        }
        self.payment_settings = Some(settings);
        true
    }

    pub(crate) fn push_notice(&mut self, notice: String) -> bool {
        if self.notices.contains(&notice) {
            return false;
        }
        self.notices.push(notice);
        true
    }

    /// Claim the submission slot. Refused while a request is in flight and
    /// once the backend has acknowledged one.
    pub(crate) fn begin_submission(&mut self) -> bool {
        match self.submission_status {
            SubmissionStatus::Submitting | SubmissionStatus::Succeeded => false,
            SubmissionStatus::Idle | SubmissionStatus::Failed => {
                self.submission_status = SubmissionStatus::Submitting;
                self.last_error = None;
                true
            }
        }
    }

    pub(crate) fn submission_succeeded(&mut self, message: &str, request_id: Option<String>) {
        self.submission_status = SubmissionStatus::Succeeded;
        self.last_error = None;
        self.success_message = Some(message.to_owned());
        self.request_id = request_id;
        self.step = self.step.max(Step::Proof);
    }

    pub(crate) fn submission_failed(&mut self, message: String) {
        self.submission_status = SubmissionStatus::Failed;
        self.last_error = Some(message);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn draft(methods: Vec<PaymentMethod>) -> VisitRequestDraft {
        VisitRequestDraft::new("listing-1".into(), 15_000, methods)
    }

    #[test]
    fn fresh_draft_selects_first_available() {
        let d = draft(vec![PaymentMethod::EquityBank, PaymentMethod::MtnMomo]);
        assert_eq!(d.step(), Step::Details);
        assert_eq!(d.submission_status(), SubmissionStatus::Idle);
        assert_eq!(d.payment_method(), Some(PaymentMethod::EquityBank));
        assert_eq!(d.last_error(), None);
    }

    #[test]
    fn selection_survives_when_still_available() {
        let mut d = draft(vec![PaymentMethod::EquityBank, PaymentMethod::MtnMomo]);
        assert!(d.select_method(PaymentMethod::MtnMomo));
        d.set_available_methods(vec![PaymentMethod::Crypto, PaymentMethod::MtnMomo]);
        assert_eq!(d.payment_method(), Some(PaymentMethod::MtnMomo));
    }

    #[test]
    fn selection_falls_back_when_method_disappears() {
        let mut d = draft(vec![PaymentMethod::Wallet]);
        assert!(d.set_available_methods(vec![PaymentMethod::AirtelMoney, PaymentMethod::Crypto]));
        assert_eq!(d.payment_method(), Some(PaymentMethod::AirtelMoney));

        d.set_available_methods(Vec::new());
        assert_eq!(d.payment_method(), None);
    }

    #[test]
    fn duplicate_methods_are_collapsed() {
        let d = draft(vec![
            PaymentMethod::Crypto,
            PaymentMethod::Crypto,
            PaymentMethod::Wallet,
        ]);
        assert_eq!(
            d.available_methods(),
            &[PaymentMethod::Crypto, PaymentMethod::Wallet]
        );
    }

    #[test]
    fn unavailable_selection_is_ignored() {
        let mut d = draft(vec![PaymentMethod::MtnMomo]);
        assert!(!d.select_method(PaymentMethod::EquityBank));
        assert_eq!(d.payment_method(), Some(PaymentMethod::MtnMomo));
    }

    #[test]
    fn submission_slot_is_exclusive() {
        let mut d = draft(vec![PaymentMethod::MtnMomo]);
        assert!(d.begin_submission());
        assert!(!d.begin_submission());

        d.submission_failed("boom".into());
        assert_eq!(d.last_error(), Some("boom"));
        assert_eq!(d.step(), Step::Details);

        assert!(d.begin_submission());
        assert_eq!(d.last_error(), None);
        d.submission_succeeded("ok", Some("vr-1".into()));
        assert_eq!(d.step(), Step::Proof);
        assert!(!d.begin_submission());
    }

    #[test]
    fn steps_are_ordered_forward() {
        assert!(Step::Details < Step::Proof);
        assert!(Step::Proof < Step::Confirmation);
        assert_eq!(Step::Proof.to_string(), "proof");
    }

    #[test]
    fn notices_are_deduplicated() {
        let mut d = draft(Vec::new());
        assert!(d.push_notice("methods unavailable".into()));
        assert!(!d.push_notice("methods unavailable".into()));
        assert_eq!(d.notices().len(), 1);
    }
}
