//! Billing store — the payment handshake around the external payment widget:
//! stash the expected amount, verify it, confirm the charge, cancel if asked.

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use tracing::error;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::models::{Amount, CancelPayment, ConfirmPayment, PaymentVerdict, SaveAmount};

#[derive(Default)]
struct BillingState {
    amount: Amount,
    plan_name: String,
}

#[derive(Clone)]
pub struct BillingStore {
    client: ApiClient,
    state: Arc<Mutex<BillingState>>,
}

impl BillingStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(BillingState::default())),
        }
    }

    pub fn set_plan(&self, plan_name: &str, amount: Amount) {
        let mut state = self.state.lock().expect("billing state poisoned");
        state.plan_name = plan_name.to_string();
        state.amount = amount;
    }

    pub fn plan_name(&self) -> String {
        self.state
            .lock()
            .expect("billing state poisoned")
            .plan_name
            .clone()
    }

    pub fn amount(&self) -> Amount {
        self.state
            .lock()
            .expect("billing state poisoned")
            .amount
            .clone()
    }

    /// Stores the expected charge server-side before the widget runs, so the
    /// confirm step can detect tampering.
    pub async fn save_amount(&self, save: &SaveAmount) -> Result<StatusCode, ApiError> {
        let response = self
            .post_json("/payments/saveAmount", serde_json::to_value(save)?)
            .await?;
        Ok(response.status())
    }

    pub async fn verify_amount(&self, save: &SaveAmount) -> Result<PaymentVerdict, ApiError> {
        self.post_json("/payments/verifyAmount", serde_json::to_value(save)?)
            .await?
            .json()
            .await
    }

    pub async fn confirm(&self, confirm: &ConfirmPayment) -> Result<PaymentVerdict, ApiError> {
        self.post_json("/payments/confirm", serde_json::to_value(confirm)?)
            .await?
            .json()
            .await
    }

    pub async fn cancel(&self, cancel: &CancelPayment) -> Result<StatusCode, ApiError> {
        let response = self
            .post_json("/payments/cancel", serde_json::to_value(cancel)?)
            .await?;
        Ok(response.status())
    }

    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<crate::http::ApiResponse, ApiError> {
        let result = async {
            self.client
                .post(path)
                .json(body)
                .send()
                .await?
                .error_for_status()
                .await
        }
        .await;
        if let Err(e) = &result {
            error!("payment call {path} failed: {e}");
        }
        result
    }
}
