use anyhow::Result;

use crate::core::AppConfig;
use crate::nim::{self, ChatMessage, ModelPolicy, Role};
use crate::telegram::{Client, Command, Update};

use super::store::ConversationStore;

/// Telegram caps messages at 4096 characters; longer replies are split.
pub const MESSAGE_CHAR_LIMIT: usize = 4096;

/// How many stored turns accompany each completion request, counting the
/// just-appended user turn.
const CONTEXT_TURNS: usize = 10;

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// One relay instance: the Telegram client, per-user histories, and the
/// active model. All mutation happens from the sequential dispatch loop.
pub struct Bot {
    config: AppConfig,
    telegram: Client,
    store: ConversationStore,
    /// Active model, shared across all users. Mutated only by `/model`.
    model: &'static ModelPolicy,
}

impl Bot {
    pub fn new(config: AppConfig) -> Self {
        let telegram = Client::new(&config.telegram_api_url, &config.telegram_token);
        let model = config.model;
        Self {
            config,
            telegram,
            store: ConversationStore::new(),
            model,
        }
    }

    pub fn telegram(&self) -> &Client {
        &self.telegram
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn active_model(&self) -> &'static ModelPolicy {
        self.model
    }

    /// Dispatch one update. Failures are logged and swallowed so a single
    /// bad exchange cannot stop the poll loop.
    pub async fn handle_update(&mut self, update: &Update) {
        let Some(message) = &update.message else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let Some(user) = &message.from else {
            return;
        };

        let outcome = match Command::parse(text) {
            Some(Command::Start) => self.handle_start(user.id, message.chat.id).await,
            Some(Command::Reset) => self.handle_reset(user.id, message.chat.id).await,
            Some(Command::Model) => self.handle_model(message.chat.id).await,
            None => self.handle_message(user.id, message.chat.id, text).await,
        };

        if let Err(err) = outcome {
            tracing::error!("Failed to handle update {}: {err:#}", update.update_id);
        }
    }

    async fn handle_start(&mut self, user_id: i64, chat_id: i64) -> Result<()> {
        self.store.reset(user_id);
        let greeting = format!(
            "👋 Hello! I'm powered by **{}** via NVIDIA NIM.\n\n\
             Just send me any message to chat!\n\
             Use /reset to clear conversation history.\n\
             Use /model to switch between Kimi K2.5 and GLM-5.",
            self.model.id
        );
        self.telegram.send_markdown(chat_id, &greeting).await
    }

    async fn handle_reset(&mut self, user_id: i64, chat_id: i64) -> Result<()> {
        self.store.reset(user_id);
        self.telegram
            .send_message(chat_id, "🔄 Conversation reset!")
            .await
    }

    async fn handle_model(&mut self, chat_id: i64) -> Result<()> {
        self.model = self.model.next();
        let notice = format!("✅ Switched to **{}**!", self.model.display_name);
        self.telegram.send_markdown(chat_id, &notice).await
    }

    /// One full exchange: access check, history append, completion call,
    /// reply delivery.
    async fn handle_message(&mut self, user_id: i64, chat_id: i64, text: &str) -> Result<()> {
        if self.config.allowed_user_id != 0 && user_id != self.config.allowed_user_id {
            return self.telegram.send_message(chat_id, "⛔ Unauthorized.").await;
        }

        self.store.append(user_id, Role::User, text);

        // Best effort; a missing typing indicator is not worth failing over
        if let Err(err) = self.telegram.send_chat_action(chat_id, "typing").await {
            tracing::debug!("send_chat_action failed: {err:#}");
        }

        let messages = context_messages(&self.store, user_id);
        let reply = match nim::completion(
            &messages,
            self.model,
            &self.config.nim_api_url,
            &self.config.nim_api_key,
        )
        .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("Completion failed: {err:#}");
                // The appended user turn stays in history; no rollback
                let notice = format!("❌ Error: {err:#}");
                return self.telegram.send_message(chat_id, &notice).await;
            }
        };

        self.store.append(user_id, Role::Assistant, &reply);

        for chunk in chunk_reply(&reply, MESSAGE_CHAR_LIMIT) {
            self.telegram.send_message(chat_id, &chunk).await?;
        }

        Ok(())
    }
}

/// The outbound transcript for one completion request: the fixed system
/// instruction plus the most recent stored turns.
fn context_messages(store: &ConversationStore, user_id: i64) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::new(Role::System, SYSTEM_PROMPT)];
    messages.extend_from_slice(store.context_window(user_id, CONTEXT_TURNS));
    messages
}

/// Split a reply into consecutive chunks of at most `limit` characters.
/// Counts code points, not bytes, matching the limit Telegram enforces.
pub fn chunk_reply(reply: &str, limit: usize) -> Vec<String> {
    if reply.chars().count() <= limit {
        return vec![reply.to_string()];
    }
    let chars: Vec<char> = reply.chars().collect();
    chars
        .chunks(limit)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
