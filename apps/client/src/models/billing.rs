use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    pub value: i64,
}

impl Default for Amount {
    fn default() -> Self {
        Amount {
            currency: "KRW".to_string(),
            value: 0,
        }
    }
}

/// Body of `POST /payments/saveAmount`: stashes the expected charge before
/// the payment widget runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAmount {
    pub order_id: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPayment {
    pub payment_key: String,
    pub order_id: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayment {
    pub payment_key: String,
    pub cancel_reason: String,
}

/// Verdict returned by the verify and confirm endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerdict {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
