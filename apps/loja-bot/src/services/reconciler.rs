use std::time::Duration;

use anyhow::Result;
use loja_db::models::{PaymentStatus, Purchase};
use tracing::{error, info};

use crate::services::notifier::Notify;
use crate::services::payment::PaymentGateway;
use crate::services::store::Store;

/// Background task that periodically reconciles local purchase status with
/// the gateway's authoritative status. Spawned once after the bot identity
/// check and runs for the process lifetime; a restart resumes from current
/// ledger contents.
pub struct Reconciler<S, G, N> {
    store: S,
    gateway: G,
    notifier: N,
    interval: Duration,
}

impl<S, G, N> Reconciler<S, G, N>
where
    S: Store,
    G: PaymentGateway,
    N: Notify,
{
    pub fn new(store: S, gateway: G, notifier: N, interval: Duration) -> Self {
        Self {
            store,
            gateway,
            notifier,
            interval,
        }
    }

    pub async fn start(&self) {
        info!(
            "Starting payment reconciler (interval: {}s)...",
            self.interval.as_secs()
        );
        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            if let Err(e) = self.run_cycle().await {
                error!("Payment reconciliation cycle failed: {e:#}");
            }
        }
    }

    /// One polling cycle over every ledger entry still in `pending`.
    /// Failures are isolated per entry so one bad gateway lookup cannot
    /// starve the rest of the batch.
    pub async fn run_cycle(&self) -> Result<()> {
        let pending = self.store.pending_purchases().await?;

        for purchase in pending {
            if let Err(e) = self.reconcile_entry(&purchase).await {
                error!(
                    "Failed to reconcile payment {}: {e:#}",
                    purchase.payment_id
                );
            }
        }

        Ok(())
    }

    async fn reconcile_entry(&self, purchase: &Purchase) -> Result<()> {
        let status = self.gateway.payment_status(&purchase.payment_id).await?;

        // Overwrite unconditionally, even when unchanged. Anything other
        // than the literal `pending` drops the row from future cycles.
        self.store.set_status(&purchase.payment_id, &status).await?;

        match &status {
            PaymentStatus::Approved => {
                self.notifier
                    .send_text(
                        purchase.buyer_id,
                        "Seu pagamento foi aprovado e seu produto será entregue em breve.",
                    )
                    .await?;

                let delivery = self
                    .store
                    .product_by_key(&purchase.product_key)
                    .await?
                    .and_then(|p| p.file_url);

                match delivery {
                    Some(file_url) => {
                        self.notifier
                            .send_text(
                                purchase.buyer_id,
                                &format!("Aqui está o link do seu produto: {file_url}"),
                            )
                            .await?;
                    }
                    None => {
                        self.notifier
                            .send_text(
                                purchase.buyer_id,
                                "Desculpe, houve um erro ao recuperar o produto.",
                            )
                            .await?;
                    }
                }
            }
            PaymentStatus::Rejected | PaymentStatus::Cancelled => {
                self.notifier
                    .send_text(
                        purchase.buyer_id,
                        &format!(
                            "Seu pagamento foi {status}. Por favor, tente novamente ou entre em contato com o suporte.",
                        ),
                    )
                    .await?;
            }
            other => {
                info!(
                    "Payment {} reported status '{}', keeping quiet",
                    purchase.payment_id,
                    other.as_str()
                );
            }
        }

        Ok(())
    }
}
