// Wire types for the marketplace backend.
//
// Field names follow the backend's JSON: the payment-methods endpoint is
// camelCase, payment settings and the visit-request form are snake_case.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry from `GET /api/payment-methods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodStatus {
    pub id: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Mobile-money collection account (MTN MoMo, Airtel Money).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileMoneyAccount {
    pub phone_number: Option<String>,
    pub account_name: Option<String>,
    pub merchant_id: Option<String>,
}

/// Bank-transfer target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAccount {
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub branch_code: Option<String>,
}

/// Crypto receiving wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoWallet {
    pub wallet_address: Option<String>,
    pub network: Option<String>,
}

/// `GET /api/payment-settings`: admin-configured payment targets.
///
/// Every section is optional; an admin who has not configured a method
/// simply leaves it out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSettingsResponse {
    pub mtn_momo: Option<MobileMoneyAccount>,
    pub airtel_money: Option<MobileMoneyAccount>,
    pub equity_bank: Option<BankAccount>,
    pub crypto: Option<CryptoWallet>,
    pub instructions: Option<String>,
}

/// Text fields of a visit-request submission.
///
/// `target` carries the method-specific payment-target fields
/// (`phone_number`, `bank_name`, `wallet_address`, ...) with empty strings
/// for anything the admin has not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRequestPayload {
    pub listing_id: String,
    pub payment_method: String,
    pub visit_fee: u64,
    #[serde(flatten)]
    pub target: BTreeMap<String, String>,
}

impl VisitRequestPayload {
    /// All text fields in submission order.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("listing_id".to_owned(), self.listing_id.clone()),
            ("payment_method".to_owned(), self.payment_method.clone()),
            ("visit_fee".to_owned(), self.visit_fee.to_string()),
        ];
        fields.extend(self.target.iter().map(|(k, v)| (k.clone(), v.clone())));
        fields
    }
}

/// Proof-of-payment file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Successful answer from `POST /api/visit-requests`.
///
/// The backend is loose about this body; every field is optional and an
/// empty 2xx body decodes to the default. Use [`from_value`](Self::from_value)
/// for response bodies: a 2xx without an `error` field is an acceptance no
/// matter how its metadata is shaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitRequestAck {
    pub success: Option<bool>,
    #[serde(alias = "id", alias = "request_id")]
    pub request_id: Option<String>,
    pub message: Option<String>,
    #[serde(alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

impl VisitRequestAck {
    /// Read an acknowledgement field by field, skipping anything that does
    /// not fit the expected shape.
    ///
    /// Ids may be strings or numbers; timestamps without a timezone are
    /// dropped.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |names: &[&str]| names.iter().find_map(|name| value.get(*name));

        let request_id = field(&["requestId", "request_id", "id"]).and_then(|id| match id {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Self {
            success: field(&["success"]).and_then(serde_json::Value::as_bool),
            request_id,
            message: field(&["message"])
                .and_then(serde_json::Value::as_str)
                .map(String::from),
            created_at: field(&["createdAt", "created_at"])
                .and_then(serde_json::Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn payment_method_status_is_camel_case() {
        let parsed: Vec<PaymentMethodStatus> = serde_json::from_value(json!([
            { "id": "mtn_momo", "isActive": true },
            { "id": "crypto" }
        ]))
        .unwrap();
        assert!(parsed[0].is_active);
        assert!(!parsed[1].is_active);
    }

    #[test]
    fn partial_settings_decode() {
        let parsed: PaymentSettingsResponse = serde_json::from_value(json!({
            "mtn_momo": { "phone_number": "+256700000000" },
            "instructions": "Use the listing id as reference"
        }))
        .unwrap();
        let momo = parsed.mtn_momo.unwrap();
        assert_eq!(momo.phone_number.as_deref(), Some("+256700000000"));
        assert_eq!(momo.account_name, None);
        assert_eq!(parsed.equity_bank, None);
    }

    #[test]
    fn payload_flattens_target_fields() {
        let payload = VisitRequestPayload {
            listing_id: "listing-123".into(),
            payment_method: "equity_bank".into(),
            visit_fee: 15000,
            target: BTreeMap::from([
                ("bank_name".to_owned(), "Equity".to_owned()),
                ("branch_code".to_owned(), String::new()),
            ]),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["bank_name"], "Equity");
        assert_eq!(value["branch_code"], "");
        assert_eq!(value["visit_fee"], 15000);

        let names: Vec<String> = payload.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            ["listing_id", "payment_method", "visit_fee", "bank_name", "branch_code"]
        );
    }

    #[test]
    fn ack_accepts_id_alias() {
        let ack: VisitRequestAck =
            serde_json::from_value(json!({ "success": true, "id": "vr-9" })).unwrap();
        assert_eq!(ack.request_id.as_deref(), Some("vr-9"));
        assert_eq!(ack.success, Some(true));
    }

    #[test]
    fn ack_from_value_tolerates_loose_metadata() {
        let ack = VisitRequestAck::from_value(&json!({
            "success": true,
            "id": 42,
            "created_at": "2024-05-01 10:00:00"
        }));
        assert_eq!(ack.success, Some(true));
        assert_eq!(ack.request_id.as_deref(), Some("42"));
        assert_eq!(ack.created_at, None);

        let ack = VisitRequestAck::from_value(&json!({
            "requestId": "vr-1",
            "message": "queued",
            "createdAt": "2024-05-01T10:00:00Z"
        }));
        assert_eq!(ack.request_id.as_deref(), Some("vr-1"));
        assert_eq!(ack.message.as_deref(), Some("queued"));
        assert!(ack.created_at.is_some());

        assert_eq!(
            VisitRequestAck::from_value(&json!(["ok"])),
            VisitRequestAck::default()
        );
    }
}
