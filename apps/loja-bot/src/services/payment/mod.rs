use async_trait::async_trait;
use loja_db::models::PaymentStatus;
use thiserror::Error;

pub mod mercado_pago;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway answered but the response is missing the expected fields.
    #[error("Não foi possível criar a preferência de pagamento.")]
    MalformedResponse,
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPreference {
    /// Gateway-assigned transaction identifier.
    pub id: String,
    /// Redirect URL the buyer opens to complete payment.
    pub init_point: String,
}

/// Seam to the external payment gateway. One best-effort call per
/// operation, no retries.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a single-line-item payment request (quantity one, fixed
    /// currency) and return the redirect URL plus transaction identifier.
    async fn create_preference(
        &self,
        title: &str,
        price_cents: i64,
        payer_email: &str,
    ) -> Result<CheckoutPreference, GatewayError>;

    /// Query the current status of a transaction by its identifier.
    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatus, GatewayError>;
}
