// ── Payment methods and targets ──

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Shown in place of a payment-target field the admin has not set.
pub const NOT_CONFIGURED: &str = "Not configured";

/// Closed set of payment methods a visit fee can be paid with.
///
/// The string form (`mtn_momo`, `airtel_money`, ...) is the wire id used by
/// the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    MtnMomo,
    AirtelMoney,
    EquityBank,
    Crypto,
    Wallet,
}

impl PaymentMethod {
    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::MtnMomo => "MTN Mobile Money",
            Self::AirtelMoney => "Airtel Money",
            Self::EquityBank => "Equity Bank",
            Self::Crypto => "Crypto",
            Self::Wallet => "Wallet",
        }
    }
}

// ── Targets ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileMoneyTarget {
    pub phone_number: Option<String>,
    pub account_name: Option<String>,
    pub merchant_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTarget {
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub branch_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTarget {
    pub wallet_address: Option<String>,
    pub network: Option<String>,
}

/// Admin-configured payment details, read-only to the flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub mtn_momo: MobileMoneyTarget,
    pub airtel_money: MobileMoneyTarget,
    pub equity_bank: BankTarget,
    pub crypto: CryptoTarget,
    pub instructions: Option<String>,
}

impl PaymentSettings {
    /// Where money for `method` should be sent.
    pub fn target_for(&self, method: PaymentMethod) -> PaymentTarget {
        match method {
            PaymentMethod::MtnMomo => PaymentTarget::MobileMoney(self.mtn_momo.clone()),
            PaymentMethod::AirtelMoney => PaymentTarget::MobileMoney(self.airtel_money.clone()),
            PaymentMethod::EquityBank => PaymentTarget::BankTransfer(self.equity_bank.clone()),
            PaymentMethod::Crypto => PaymentTarget::Crypto(self.crypto.clone()),
            PaymentMethod::Wallet => PaymentTarget::Wallet,
        }
    }

    /// Required target fields missing for `method`, if any.
    pub fn gap_for(&self, method: PaymentMethod) -> Option<ConfigurationGap> {
        let missing = self.target_for(method).missing_fields();
        if missing.is_empty() {
            None
        } else {
            Some(ConfigurationGap { method, missing })
        }
    }
}

/// One displayable / submittable target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetField {
    /// Form field name sent to the backend.
    pub name: &'static str,
    pub label: &'static str,
    pub value: Option<String>,
    /// Whether an unset value counts as a configuration gap.
    pub required: bool,
}

impl TargetField {
    fn new(name: &'static str, label: &'static str, value: Option<&String>, required: bool) -> Self {
        Self {
            name,
            label,
            value: value.cloned(),
            required,
        }
    }

    /// The value, or [`NOT_CONFIGURED`].
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or(NOT_CONFIGURED)
    }
}

/// Payment target resolved for one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentTarget {
    MobileMoney(MobileMoneyTarget),
    BankTransfer(BankTarget),
    Crypto(CryptoTarget),
    /// Paid from the buyer's platform wallet; nothing to configure.
    Wallet,
}

impl PaymentTarget {
    pub fn fields(&self) -> Vec<TargetField> {
        match self {
            Self::MobileMoney(t) => vec![
                TargetField::new("phone_number", "Phone number", t.phone_number.as_ref(), true),
                TargetField::new("account_name", "Account name", t.account_name.as_ref(), false),
                TargetField::new("merchant_id", "Merchant ID", t.merchant_id.as_ref(), false),
            ],
            Self::BankTransfer(t) => vec![
                TargetField::new("bank_name", "Bank name", t.bank_name.as_ref(), true),
                TargetField::new("account_name", "Account name", t.account_name.as_ref(), true),
                TargetField::new(
                    "account_number",
                    "Account number",
                    t.account_number.as_ref(),
                    true,
                ),
                TargetField::new("branch_code", "Branch code", t.branch_code.as_ref(), false),
            ],
            Self::Crypto(t) => vec![TargetField::new(
                "wallet_address",
                "Wallet address",
                t.wallet_address.as_ref(),
                true,
            )],
            Self::Wallet => Vec::new(),
        }
    }

    /// Labels of required fields that are not configured.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|f| f.required && f.value.is_none())
            .map(|f| f.label)
            .collect()
    }

    /// Form fields for submission; unset values become empty strings.
    pub fn form_fields(&self) -> BTreeMap<String, String> {
        self.fields()
            .into_iter()
            .map(|f| (f.name.to_owned(), f.value.unwrap_or_default()))
            .collect()
    }
}

/// A selected method lacks admin-configured target details.
///
/// Not a hard failure: the flow still submits, but the gap has to be shown
/// to the user instead of passing empty fields off as valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationGap {
    pub method: PaymentMethod,
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ConfigurationGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .missing
            .iter()
            .map(|label| label.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}: {fields} {}", self.method.label(), NOT_CONFIGURED.to_lowercase())
    }
}
