use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use teloxide::types::ChatId;

const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60;

/// Process configuration, loaded once at startup and passed by reference
/// into every component. Admin commands are only honored inside
/// `admin_chat_id`; product posts land in `public_chat_id`.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
    pub mp_access_token: String,
    pub admin_chat_id: ChatId,
    pub public_chat_id: ChatId,
    pub reconcile_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let mp_access_token =
            env::var("MP_ACCESS_TOKEN").context("MP_ACCESS_TOKEN must be set")?;

        let admin_chat_id = parse_chat_id("ADMIN_CHAT_ID")?;
        let public_chat_id = parse_chat_id("PUBLIC_CHAT_ID")?;

        let reconcile_interval = env::var("RECONCILE_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS));

        Ok(Self {
            bot_token,
            database_url,
            mp_access_token,
            admin_chat_id,
            public_chat_id,
            reconcile_interval,
        })
    }
}

fn parse_chat_id(var: &str) -> Result<ChatId> {
    let raw = env::var(var).with_context(|| format!("{var} must be set"))?;
    let id: i64 = raw
        .parse()
        .with_context(|| format!("{var} must be a numeric chat id, got '{raw}'"))?;
    Ok(ChatId(id))
}
