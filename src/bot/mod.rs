mod relay;
pub use relay::{Bot, MESSAGE_CHAR_LIMIT, chunk_reply};
mod store;
pub use store::ConversationStore;

use std::time::Duration;

use anyhow::Result;

use crate::core::AppConfig;
use crate::health;

/// Server-side long poll window for `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;

/// How long to back off after a failed poll before trying again.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Run the bot until the process is terminated: spawn the liveness
/// responder, then long poll Telegram and dispatch updates one at a time.
///
/// Updates are handled sequentially, so the conversation store and the
/// active model never see concurrent mutation.
pub async fn run(host: String, config: AppConfig) -> Result<()> {
    let port = config.port;
    tokio::spawn(async move {
        if let Err(err) = health::serve(host, port).await {
            tracing::error!("Health server exited: {err:#}");
        }
    });

    tracing::info!("Bot started with model: {}", config.model.id);

    let mut bot = Bot::new(config);
    let mut offset = 0i64;
    loop {
        let updates = match bot.telegram().get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(err) => {
                tracing::error!("getUpdates failed: {err:#}");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            bot.handle_update(&update).await;
        }
    }
}
