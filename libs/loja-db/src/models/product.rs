use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A purchasable item as posted in the public channel. The `product_key`
/// is the short alphanumeric key rendered into the post footer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_key: String,
    pub title: String,
    pub price_cents: i64,
    pub file_url: Option<String>,
    pub message_id: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_key: String,
    pub title: String,
    pub price_cents: i64,
    pub file_url: String,
    pub message_id: i32,
    pub image_url: Option<String>,
}

/// Partial overwrite for the edit command. `None` fields keep their
/// stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price_cents: Option<i64>,
    pub file_url: Option<String>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price_cents.is_none()
            && self.file_url.is_none()
            && self.image_url.is_none()
    }
}
