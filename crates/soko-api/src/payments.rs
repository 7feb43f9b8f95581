// Payment endpoints
//
// Both are public reads: the active-method list drives the method
// selector, the settings carry the admin-configured payment targets.

use tracing::debug;

use crate::client::MarketplaceClient;
use crate::error::Error;
use crate::models::{PaymentMethodStatus, PaymentSettingsResponse};

impl MarketplaceClient {
    /// List payment methods and their activation flags.
    ///
    /// `GET /api/payment-methods`
    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethodStatus>, Error> {
        let url = self.api_url("payment-methods")?;
        debug!("listing payment methods");
        self.get(url).await
    }

    /// Fetch the platform payment info (phone numbers, bank account,
    /// wallet address, instructions).
    ///
    /// `GET /api/payment-settings`
    pub async fn payment_settings(&self) -> Result<PaymentSettingsResponse, Error> {
        let url = self.api_url("payment-settings")?;
        debug!("fetching payment settings");
        self.get(url).await
    }
}
