use std::sync::Arc;

use crate::config::Config;
use crate::services::payment::mercado_pago::MercadoPago;
use crate::services::prompts::EmailPrompts;
use crate::services::store::PgStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: PgStore,
    pub gateway: MercadoPago,
    pub prompts: EmailPrompts,
}
