// Listing view tracking
//
// Fired once when a listing page loads. Callers are expected to log and
// ignore failures.

use serde_json::json;
use tracing::debug;

use crate::client::MarketplaceClient;
use crate::error::Error;

impl MarketplaceClient {
    /// Record one view of a listing.
    ///
    /// `POST /api/track-view` with `{"listingId": "..."}`
    pub async fn track_view(&self, listing_id: &str) -> Result<(), Error> {
        let url = self.api_url("track-view")?;
        debug!(listing_id, "tracking listing view");
        self.post_json(url, &json!({ "listingId": listing_id }), None)
            .await?;
        Ok(())
    }
}
