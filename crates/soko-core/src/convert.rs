// ── API-to-domain conversions ──
//
// Bridges `soko_api` wire types into canonical domain types. Blank strings
// from the admin settings are treated as "not configured".

use std::str::FromStr;

use tracing::warn;

use soko_api::models::{
    BankAccount, CryptoWallet, MobileMoneyAccount, PaymentMethodStatus, PaymentSettingsResponse,
    VisitRequestPayload,
};

use crate::model::{
    BankTarget, CryptoTarget, MobileMoneyTarget, PaymentMethod, PaymentSettings, PaymentTarget,
};

/// Keep the active, known methods in backend order.
pub fn active_methods(statuses: Vec<PaymentMethodStatus>) -> Vec<PaymentMethod> {
    let mut methods = Vec::new();
    for status in statuses.into_iter().filter(|s| s.is_active) {
        match PaymentMethod::from_str(&status.id) {
            Ok(method) if !methods.contains(&method) => methods.push(method),
            Ok(_) => {}
            Err(_) => warn!(id = %status.id, "ignoring unknown payment method"),
        }
    }
    methods
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl From<MobileMoneyAccount> for MobileMoneyTarget {
    fn from(a: MobileMoneyAccount) -> Self {
        Self {
            phone_number: non_blank(a.phone_number),
            account_name: non_blank(a.account_name),
            merchant_id: non_blank(a.merchant_id),
        }
    }
}

impl From<BankAccount> for BankTarget {
    fn from(a: BankAccount) -> Self {
        Self {
            bank_name: non_blank(a.bank_name),
            account_name: non_blank(a.account_name),
            account_number: non_blank(a.account_number),
            branch_code: non_blank(a.branch_code),
        }
    }
}

impl From<CryptoWallet> for CryptoTarget {
    fn from(w: CryptoWallet) -> Self {
        Self {
            wallet_address: non_blank(w.wallet_address),
            network: non_blank(w.network),
        }
    }
}

impl From<PaymentSettingsResponse> for PaymentSettings {
    fn from(r: PaymentSettingsResponse) -> Self {
        Self {
            mtn_momo: r.mtn_momo.map(Into::into).unwrap_or_default(),
            airtel_money: r.airtel_money.map(Into::into).unwrap_or_default(),
            equity_bank: r.equity_bank.map(Into::into).unwrap_or_default(),
            crypto: r.crypto.map(Into::into).unwrap_or_default(),
            instructions: non_blank(r.instructions),
        }
    }
}

/// Assemble the submission form fields for one draft.
pub fn visit_payload(
    listing_id: &str,
    method: PaymentMethod,
    visit_fee: u64,
    target: &PaymentTarget,
) -> VisitRequestPayload {
    VisitRequestPayload {
        listing_id: listing_id.to_owned(),
        payment_method: method.to_string(),
        visit_fee,
        target: target.form_fields(),
    }
}
