use anyhow::{bail, Result};
use rand::Rng;

use crate::services::store::Store;

const KEY_LENGTH: usize = 10;
const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_KEY_ATTEMPTS: usize = 5;

/// Unchecked random sample from the 36-symbol alphabet.
pub fn random_product_key() -> String {
    let mut rng = rand::rng();
    (0..KEY_LENGTH)
        .map(|_| KEY_ALPHABET[rng.random_range(0..KEY_ALPHABET.len())] as char)
        .collect()
}

/// Picks a product key that is not already taken. Collisions over a 36^10
/// space are unlikely but real, so each candidate is checked against the
/// store before use.
pub async fn allocate_product_key<S: Store>(store: &S) -> Result<String> {
    for _ in 0..MAX_KEY_ATTEMPTS {
        let key = random_product_key();
        if store.product_by_key(&key).await?.is_none() {
            return Ok(key);
        }
    }
    bail!("could not allocate a unique product key after {MAX_KEY_ATTEMPTS} attempts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testutil::MockStore;

    #[test]
    fn keys_are_ten_uppercase_alphanumerics() {
        for _ in 0..200 {
            let key = random_product_key();
            assert_eq!(key.len(), KEY_LENGTH);
            assert!(key
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn allocation_returns_an_unused_key() {
        let store = MockStore::default();
        let key = allocate_product_key(&store).await.unwrap();
        assert_eq!(key.len(), KEY_LENGTH);
        assert!(store.products.lock().unwrap().get(&key).is_none());
    }
}
