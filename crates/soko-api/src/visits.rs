// Visit-request submission
//
// Multipart POST carrying the request fields and an optional
// proof-of-payment image. Requires a bearer token.

use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::auth::BearerToken;
use crate::client::MarketplaceClient;
use crate::error::Error;
use crate::models::{ProofUpload, VisitRequestAck, VisitRequestPayload};

/// Multipart field name for the proof-of-payment file.
pub const PROOF_FIELD: &str = "payment_proof";

impl MarketplaceClient {
    /// Submit a visit request.
    ///
    /// `POST /api/visit-requests` (multipart/form-data, `Authorization: Bearer`)
    ///
    /// A 2xx answer without an `error` field is an acknowledgement. Its
    /// metadata is read leniently: an empty or unparseable body yields
    /// [`VisitRequestAck::default`] rather than an error, since the request
    /// has already been accepted.
    pub async fn submit_visit_request(
        &self,
        token: &BearerToken,
        payload: &VisitRequestPayload,
        proof: Option<&ProofUpload>,
    ) -> Result<VisitRequestAck, Error> {
        let url = self.api_url("visit-requests")?;
        debug!(
            listing_id = %payload.listing_id,
            method = %payload.payment_method,
            has_proof = proof.is_some(),
            "submitting visit request"
        );

        let form = build_form(payload, proof)?;
        let body = self.post_multipart(url, form, token).await?;

        if body.trim().is_empty() {
            return Ok(VisitRequestAck::default());
        }
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => Ok(VisitRequestAck::from_value(&value)),
            Err(e) => {
                warn!(error = %e, "acknowledgement body is not JSON; treating as accepted");
                Ok(VisitRequestAck::default())
            }
        }
    }
}

fn build_form(payload: &VisitRequestPayload, proof: Option<&ProofUpload>) -> Result<Form, Error> {
    let mut form = Form::new();
    for (name, value) in payload.fields() {
        form = form.text(name, value);
    }

    if let Some(proof) = proof {
        let part = Part::bytes(proof.bytes.to_vec())
            .file_name(proof.file_name.clone())
            .mime_str(&proof.content_type)?;
        form = form.part(PROOF_FIELD, part);
    }

    Ok(form)
}
