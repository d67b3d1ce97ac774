use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::models::{NewPurchase, PaymentStatus, Purchase};

#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_purchase(row: &PgRow) -> Purchase {
        Purchase {
            payment_id: row.try_get::<String, _>("payment_id").unwrap_or_default(),
            buyer_id: row.try_get::<i64, _>("buyer_id").unwrap_or_default(),
            product_key: row.try_get::<String, _>("product_key").unwrap_or_default(),
            status: PaymentStatus::parse(
                &row.try_get::<String, _>("status").unwrap_or_default(),
            ),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .unwrap_or_else(|_| Utc::now()),
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .unwrap_or_else(|_| Utc::now()),
        }
    }

    pub async fn insert_pending(&self, purchase: &NewPurchase) -> Result<()> {
        sqlx::query(
            "INSERT INTO purchases (payment_id, buyer_id, product_key, status) \
             VALUES ($1, $2, $3, 'pending')",
        )
        .bind(&purchase.payment_id)
        .bind(purchase.buyer_id)
        .bind(&purchase.product_key)
        .execute(&self.pool)
        .await
        .context("Failed to insert pending purchase")?;
        Ok(())
    }

    /// The reconciliation loop's read filter. Matches the literal `pending`
    /// status only, so any other value removes a row from future polling.
    pub async fn find_pending(&self) -> Result<Vec<Purchase>> {
        let rows = sqlx::query("SELECT * FROM purchases WHERE status = 'pending' ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch pending purchases")?;
        Ok(rows.iter().map(Self::row_to_purchase).collect())
    }

    pub async fn set_status(&self, payment_id: &str, status: &PaymentStatus) -> Result<()> {
        sqlx::query("UPDATE purchases SET status = $2, updated_at = now() WHERE payment_id = $1")
            .bind(payment_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .context("Failed to update purchase status")?;
        Ok(())
    }
}
