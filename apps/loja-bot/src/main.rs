use dotenvy::dotenv;
use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

mod bot;
mod config;
mod services;
mod state;

use crate::config::Config;
use crate::services::payment::mercado_pago::MercadoPago;
use crate::services::prompts::EmailPrompts;
use crate::services::store::PgStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting Loja Bot...");

    let config = Config::from_env()?;
    let pool = loja_db::connect(&config.database_url).await?;

    let store = PgStore::new(pool);
    let gateway = MercadoPago::new(config.mp_access_token.clone());

    let bot = Bot::new(&config.bot_token);

    let state = AppState {
        config: std::sync::Arc::new(config),
        store,
        gateway,
        prompts: EmailPrompts::default(),
    };

    let (_tx, rx) = tokio::sync::broadcast::channel(1);

    bot::run_bot(bot, rx, state).await;
    Ok(())
}
