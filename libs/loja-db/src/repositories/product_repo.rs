use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::{NewProduct, Product, ProductPatch};

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, product: &NewProduct) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (product_key, title, price_cents, file_url, message_id, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&product.product_key)
        .bind(&product.title)
        .bind(product.price_cents)
        .bind(&product.file_url)
        .bind(product.message_id)
        .bind(&product.image_url)
        .execute(&self.pool)
        .await
        .context("Failed to insert product")?;
        Ok(())
    }

    pub async fn get_by_key(&self, key: &str) -> Result<Option<Product>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE product_key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch product by key")
    }

    /// Partial overwrite: `None` fields keep their stored value.
    pub async fn update(&self, key: &str, patch: &ProductPatch) -> Result<()> {
        sqlx::query(
            "UPDATE products SET \
                 title = COALESCE($2, title), \
                 price_cents = COALESCE($3, price_cents), \
                 file_url = COALESCE($4, file_url), \
                 image_url = COALESCE($5, image_url) \
             WHERE product_key = $1",
        )
        .bind(key)
        .bind(&patch.title)
        .bind(patch.price_cents)
        .bind(&patch.file_url)
        .bind(&patch.image_url)
        .execute(&self.pool)
        .await
        .context("Failed to update product")?;
        Ok(())
    }
}
