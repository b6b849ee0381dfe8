//! Payment webhook stub. Every request is treated as a successful payment;
//! nothing is validated or stored.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentData {
    pub id: String,
    pub final_amount: u64,
    pub amount_after_fees: u64,
    pub currency: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEvent {
    pub action: String,
    pub data: PaymentData,
}

impl PaymentEvent {
    pub fn mock() -> Self {
        Self {
            action: "payment.succeeded".to_string(),
            data: PaymentData {
                id: "mock-payment-id".to_string(),
                final_amount: 1000,
                amount_after_fees: 950,
                currency: "USD".to_string(),
                user_id: "mock-user-id".to_string(),
            },
        }
    }
}

pub fn handle_event(event: &PaymentEvent) {
    if event.action == "payment.succeeded" {
        let data = &event.data;
        info!(
            payment_id = %data.id,
            user_id = %data.user_id,
            amount = data.final_amount,
            after_fees = data.amount_after_fees,
            currency = %data.currency,
            "payment succeeded"
        );
    }
}

pub async fn receive() -> (StatusCode, &'static str) {
    handle_event(&PaymentEvent::mock());
    (StatusCode::OK, "OK")
}
