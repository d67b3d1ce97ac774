use anyhow::Result;
use loja_db::models::{NewPurchase, Product};
use tracing::info;

use crate::services::notifier::Notify;
use crate::services::payment::PaymentGateway;
use crate::services::store::Store;

/// Final leg of the purchase initiation flow, entered once the buyer has
/// supplied an email address: create the gateway preference, hand the
/// redirect URL to the buyer, record the pending ledger entry. A gateway
/// failure aborts before anything is written.
pub async fn complete_checkout<G, S, N>(
    gateway: &G,
    store: &S,
    notifier: &N,
    buyer_id: i64,
    product: &Product,
    payer_email: &str,
) -> Result<()>
where
    G: PaymentGateway,
    S: Store,
    N: Notify,
{
    let preference = gateway
        .create_preference(&product.title, product.price_cents, payer_email)
        .await?;

    info!(
        "Created payment preference {} for product {} (buyer {})",
        preference.id, product.product_key, buyer_id
    );

    notifier
        .send_text(
            buyer_id,
            &format!(
                "Sua compra foi iniciada! Acesse o link para pagamento: {}",
                preference.init_point
            ),
        )
        .await?;

    store
        .insert_pending(&NewPurchase {
            payment_id: preference.id,
            buyer_id,
            product_key: product.product_key.clone(),
        })
        .await?;

    Ok(())
}
