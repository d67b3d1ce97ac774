use anyhow::Result;
use async_trait::async_trait;
use loja_db::models::{NewProduct, NewPurchase, PaymentStatus, Product, ProductPatch, Purchase};
use loja_db::repositories::{ProductRepository, PurchaseRepository};
use loja_db::sqlx::PgPool;

/// The slice of persistent state the purchase flows touch: product lookups,
/// pending-ledger inserts and the reconciliation loop's reads and writes.
/// A trait so cycle behavior is testable without a database.
#[async_trait]
pub trait Store: Send + Sync {
    async fn product_by_key(&self, key: &str) -> Result<Option<Product>>;
    async fn insert_pending(&self, purchase: &NewPurchase) -> Result<()>;
    async fn pending_purchases(&self) -> Result<Vec<Purchase>>;
    async fn set_status(&self, payment_id: &str, status: &PaymentStatus) -> Result<()>;
}

#[derive(Clone)]
pub struct PgStore {
    products: ProductRepository,
    purchases: PurchaseRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            purchases: PurchaseRepository::new(pool),
        }
    }

    // Admin-side operations stay on the concrete type; only the purchase
    // flows go through the `Store` trait.

    pub async fn insert_product(&self, product: &NewProduct) -> Result<()> {
        self.products.insert(product).await
    }

    pub async fn update_product(&self, key: &str, patch: &ProductPatch) -> Result<()> {
        self.products.update(key, patch).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn product_by_key(&self, key: &str) -> Result<Option<Product>> {
        self.products.get_by_key(key).await
    }

    async fn insert_pending(&self, purchase: &NewPurchase) -> Result<()> {
        self.purchases.insert_pending(purchase).await
    }

    async fn pending_purchases(&self) -> Result<Vec<Purchase>> {
        self.purchases.find_pending().await
    }

    async fn set_status(&self, payment_id: &str, status: &PaymentStatus) -> Result<()> {
        self.purchases.set_status(payment_id, status).await
    }
}
