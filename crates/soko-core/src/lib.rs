//! Visit-request flow and payment domain for soko.
//!
//! This crate sits between `soko-api` and its consumers (the CLI, or any
//! other front end) and owns the one piece of real behavior in the
//! system: taking a prospective buyer from "I want to see this listing"
//! to "the backend has my request and my proof of payment".
//!
//! - **[`VisitRequestFlow`]**: Guarded, multi-step submission flow.
//!   [`open()`](VisitRequestFlow::open) creates a fresh draft and prefetches
//!   active payment methods plus payment settings in the background;
//!   [`submit()`](VisitRequestFlow::submit) sends at most one request per
//!   draft and records every outcome on the draft instead of returning
//!   errors.
//!
//! - **Seams** ([`backend`]): [`SessionProvider`],
//!   [`PaymentSettingsProvider`], and [`VisitBackend`] traits. The HTTP
//!   implementation is `soko_api::MarketplaceClient`; tests inject fakes.
//!
//! - **[`MethodCache`]**: Last known active-method set, shared across
//!   flows so a new dialog has something to show while the fetch runs.
//!
//! - **Domain model** ([`model`]): [`PaymentMethod`],
//!   [`VisitRequestDraft`], [`PaymentSettings`], [`PaymentProof`].

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod flow;
pub mod model;
pub mod store;
pub mod tracking;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{PaymentSettingsProvider, SessionProvider, StaticSession, VisitBackend};
pub use config::{ClientConfig, DEFAULT_VISIT_FEE, FlowConfig, TlsVerification};
pub use error::{CoreError, GENERIC_SUBMIT_FAILURE};
pub use flow::{FlowContext, SUCCESS_MESSAGE, VisitRequestFlow};
pub use store::MethodCache;

pub use model::{
    BankTarget, ConfigurationGap, CryptoTarget, MobileMoneyTarget, NOT_CONFIGURED, PaymentMethod,
    PaymentProof, PaymentSettings, PaymentTarget, Step, SubmissionStatus, TargetField,
    VisitRequestDraft,
};
