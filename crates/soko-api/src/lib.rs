//! Async client for the soko marketplace backend.
//!
//! Covers the endpoints the visit-request flow depends on:
//!
//! - **Payments**: active payment methods (`GET /api/payment-methods`) and
//!   the admin-configured payment targets (`GET /api/payment-settings`).
//! - **Visit requests**: multipart submission with an optional
//!   proof-of-payment file (`POST /api/visit-requests`), bearer-authenticated.
//! - **View tracking**: fire-and-forget listing view counter
//!   (`POST /api/track-view`).
//!
//! Endpoint groups are implemented as inherent methods on
//! [`MarketplaceClient`] in separate modules; [`client`] owns the transport
//! mechanics and error-body parsing.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod payments;
pub mod transport;
pub mod views;
pub mod visits;

pub use auth::BearerToken;
pub use client::MarketplaceClient;
pub use error::Error;
pub use models::{
    BankAccount, CryptoWallet, MobileMoneyAccount, PaymentMethodStatus, PaymentSettingsResponse,
    ProofUpload, VisitRequestAck, VisitRequestPayload,
};
pub use transport::{TlsMode, TransportConfig};
