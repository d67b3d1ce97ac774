use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId};
use tracing::{error, info, warn};

use crate::bot::keyboards::BUY_CALLBACK;
use crate::bot::listing::extract_product_key;
use crate::services::checkout::complete_checkout;
use crate::services::notifier::TelegramNotifier;
use crate::services::prompts::EMAIL_PROMPT_TIMEOUT;
use crate::services::store::Store;
use crate::state::AppState;

/// Purchase initiation flow. Each press runs as its own handler task, so a
/// buyer who never answers the email prompt stalls only their own flow.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    info!("Received callback: {:?}", q.data);

    if q.data.as_deref() != Some(BUY_CALLBACK) {
        return Ok(());
    }

    // Acknowledge before any blocking work so Telegram does not time the
    // interaction out. Everything after this reaches the buyer via DM.
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let buyer = ChatId(q.from.id.0 as i64);

    let Some(post) = q.message.as_ref().and_then(|m| m.regular_message()) else {
        warn!("Buy press on an inaccessible message (buyer {})", buyer.0);
        let _ = bot
            .send_message(buyer, "Não foi possível encontrar a chave do produto no rodapé.")
            .await;
        return Ok(());
    };

    let post_text = post.text().or_else(|| post.caption()).unwrap_or_default();
    let Some(key) = extract_product_key(post_text) else {
        let _ = bot
            .send_message(buyer, "Erro ao extrair a chave do produto do rodapé.")
            .await;
        return Ok(());
    };

    let product = match state.store.product_by_key(key).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            let _ = bot.send_message(buyer, "Produto não encontrado.").await;
            return Ok(());
        }
        Err(e) => {
            error!("Product lookup for key {key} failed: {e:#}");
            let _ = bot
                .send_message(buyer, "Ocorreu um erro ao processar seu pedido.")
                .await;
            return Ok(());
        }
    };

    // Collect the payer email over DM. The receiver resolves when the
    // message handler routes the buyer's next private text back here.
    let pending_email = state.prompts.register(buyer.0).await;
    if bot
        .send_message(buyer, "Digite seu e-mail para pagamento:")
        .await
        .is_err()
    {
        // Buyer never opened a private chat with the bot.
        state.prompts.cancel(buyer.0).await;
        warn!("Could not DM buyer {} for email prompt", buyer.0);
        return Ok(());
    }

    let email = match tokio::time::timeout(EMAIL_PROMPT_TIMEOUT, pending_email).await {
        Ok(Ok(email)) => email,
        Ok(Err(_)) => {
            // Prompt replaced by a newer buy press; that flow takes over.
            return Ok(());
        }
        Err(_) => {
            state.prompts.cancel(buyer.0).await;
            let _ = bot
                .send_message(
                    buyer,
                    "Tempo esgotado. Toque em \"Comprar agora\" novamente para recomeçar.",
                )
                .await;
            return Ok(());
        }
    };

    let notifier = TelegramNotifier::new(bot.clone());
    if let Err(e) = complete_checkout(
        &state.gateway,
        &state.store,
        &notifier,
        buyer.0,
        &product,
        email.trim(),
    )
    .await
    {
        error!("Checkout failed for buyer {} on {key}: {e:#}", buyer.0);
        let _ = bot
            .send_message(buyer, format!("Ocorreu um erro ao processar seu pedido: {e}"))
            .await;
    }

    Ok(())
}
