// ── Domain model ──
//
// Canonical types for the visit-request flow. Wire shapes live in
// `soko_api::models`; `crate::convert` maps between the two.

pub mod draft;
pub mod payment;
pub mod proof;

pub use draft::{Step, SubmissionStatus, VisitRequestDraft};
pub use payment::{
    BankTarget, ConfigurationGap, CryptoTarget, MobileMoneyTarget, NOT_CONFIGURED, PaymentMethod,
    PaymentSettings, PaymentTarget, TargetField,
};
pub use proof::PaymentProof;
