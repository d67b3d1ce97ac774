use std::time::Duration;

use async_trait::async_trait;
use loja_db::models::PaymentStatus;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::services::payment::{CheckoutPreference, GatewayError, PaymentGateway};

const API_BASE: &str = "https://api.mercadopago.com";
const CURRENCY_ID: &str = "BRL";

#[derive(Clone)]
pub struct MercadoPago {
    client: Client,
    access_token: String,
}

impl MercadoPago {
    pub fn new(access_token: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            client,
            access_token,
        }
    }
}

#[derive(Deserialize)]
struct PreferenceResponse {
    id: Option<String>,
    init_point: Option<String>,
}

#[derive(Deserialize)]
struct PaymentResponse {
    status: Option<String>,
}

#[async_trait]
impl PaymentGateway for MercadoPago {
    async fn create_preference(
        &self,
        title: &str,
        price_cents: i64,
        payer_email: &str,
    ) -> Result<CheckoutPreference, GatewayError> {
        let body = json!({
            "items": [
                {
                    "title": title,
                    "quantity": 1,
                    "currency_id": CURRENCY_ID,
                    "unit_price": price_cents as f64 / 100.0,
                }
            ],
            "payer": { "email": payer_email }
        });

        let resp: PreferenceResponse = self
            .client
            .post(format!("{API_BASE}/checkout/preferences"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        match (resp.id, resp.init_point) {
            (Some(id), Some(init_point)) => Ok(CheckoutPreference { id, init_point }),
            _ => Err(GatewayError::MalformedResponse),
        }
    }

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatus, GatewayError> {
        let resp: PaymentResponse = self
            .client
            .get(format!("{API_BASE}/v1/payments/{payment_id}"))
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .json()
            .await?;

        match resp.status {
            Some(status) => Ok(PaymentStatus::parse(&status)),
            None => Err(GatewayError::MalformedResponse),
        }
    }
}
