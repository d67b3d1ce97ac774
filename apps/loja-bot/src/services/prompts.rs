use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, RwLock};

/// How long a purchase flow waits for the buyer's email reply before the
/// prompt expires.
pub const EMAIL_PROMPT_TIMEOUT: Duration = Duration::from_secs(300);

/// One open free-form-input request per user. A purchase flow registers a
/// token and suspends on the receiver; the message handler resolves it with
/// the buyer's next private message. Registering again replaces any older
/// token for the same user, which wakes the stale flow with a closed
/// channel.
#[derive(Clone, Default)]
pub struct EmailPrompts {
    inner: Arc<RwLock<HashMap<i64, oneshot::Sender<String>>>>,
}

impl EmailPrompts {
    pub async fn register(&self, user_id: i64) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        self.inner.write().await.insert(user_id, tx);
        rx
    }

    /// Routes a private message into the waiting flow. Returns `true` when
    /// the message was consumed by an open prompt.
    pub async fn resolve(&self, user_id: i64, text: &str) -> bool {
        match self.inner.write().await.remove(&user_id) {
            Some(tx) => tx.send(text.to_string()).is_ok(),
            None => false,
        }
    }

    pub async fn cancel(&self, user_id: i64) {
        self.inner.write().await.remove(&user_id);
    }
}
