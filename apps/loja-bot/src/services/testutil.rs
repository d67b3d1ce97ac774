//! In-memory stand-ins for the trait seams, shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use loja_db::models::{NewPurchase, PaymentStatus, Product, Purchase};

use crate::services::notifier::Notify;
use crate::services::payment::{CheckoutPreference, GatewayError, PaymentGateway};
use crate::services::store::Store;

pub fn product(key: &str, file_url: Option<&str>) -> Product {
    Product {
        product_key: key.to_string(),
        title: "E-book de teste".to_string(),
        price_cents: 4990,
        file_url: file_url.map(str::to_string),
        message_id: 1,
        image_url: None,
        created_at: Utc::now(),
    }
}

#[derive(Clone, Default)]
pub struct MockStore {
    pub products: Arc<Mutex<HashMap<String, Product>>>,
    pub purchases: Arc<Mutex<Vec<Purchase>>>,
    pub status_writes: Arc<Mutex<Vec<(String, PaymentStatus)>>>,
}

impl MockStore {
    pub fn add_product(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.product_key.clone(), product);
    }

    pub fn add_pending(&self, payment_id: &str, buyer_id: i64, product_key: &str) {
        self.purchases.lock().unwrap().push(Purchase {
            payment_id: payment_id.to_string(),
            buyer_id,
            product_key: product_key.to_string(),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }
}

#[async_trait]
impl Store for MockStore {
    async fn product_by_key(&self, key: &str) -> Result<Option<Product>> {
        Ok(self.products.lock().unwrap().get(key).cloned())
    }

    async fn insert_pending(&self, purchase: &NewPurchase) -> Result<()> {
        self.purchases.lock().unwrap().push(Purchase {
            payment_id: purchase.payment_id.clone(),
            buyer_id: purchase.buyer_id,
            product_key: purchase.product_key.clone(),
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        Ok(())
    }

    async fn pending_purchases(&self) -> Result<Vec<Purchase>> {
        Ok(self
            .purchases
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status.is_pending())
            .cloned()
            .collect())
    }

    async fn set_status(&self, payment_id: &str, status: &PaymentStatus) -> Result<()> {
        self.status_writes
            .lock()
            .unwrap()
            .push((payment_id.to_string(), status.clone()));
        let mut purchases = self.purchases.lock().unwrap();
        if let Some(purchase) = purchases.iter_mut().find(|p| p.payment_id == payment_id) {
            purchase.status = status.clone();
            purchase.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// Gateway double. Statuses are configured per payment id; a lookup for an
/// unconfigured id fails, which the reconciler must tolerate per entry.
#[derive(Clone, Default)]
pub struct MockGateway {
    pub preference: Arc<Mutex<Option<CheckoutPreference>>>,
    pub preference_calls: Arc<Mutex<Vec<(String, i64, String)>>>,
    pub statuses: Arc<Mutex<HashMap<String, PaymentStatus>>>,
    pub status_calls: Arc<Mutex<Vec<String>>>,
}

impl MockGateway {
    pub fn with_preference(id: &str, init_point: &str) -> Self {
        let gateway = Self::default();
        *gateway.preference.lock().unwrap() = Some(CheckoutPreference {
            id: id.to_string(),
            init_point: init_point.to_string(),
        });
        gateway
    }

    pub fn report_status(&self, payment_id: &str, status: PaymentStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(payment_id.to_string(), status);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_preference(
        &self,
        title: &str,
        price_cents: i64,
        payer_email: &str,
    ) -> Result<CheckoutPreference, GatewayError> {
        self.preference_calls.lock().unwrap().push((
            title.to_string(),
            price_cents,
            payer_email.to_string(),
        ));
        self.preference
            .lock()
            .unwrap()
            .clone()
            .ok_or(GatewayError::MalformedResponse)
    }

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatus, GatewayError> {
        self.status_calls
            .lock()
            .unwrap()
            .push(payment_id.to_string());
        self.statuses
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or(GatewayError::MalformedResponse)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(i64, String)>>>,
}

#[async_trait]
impl Notify for RecordingNotifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}
