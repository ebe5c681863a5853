//! The concrete dispatcher: forward/copy/send against the Bot API.

use {
    async_trait::async_trait,
    teloxide::{
        payloads::ForwardMessageSetters,
        prelude::*,
        types::{ChatId, MessageId, ThreadId},
    },
};

use {
    relaygram_common::{ChatRef, MessageKey, MessageRef, ThreadKey, UserId},
    relaygram_relay::{DeliveryError, Dispatcher},
};

/// Sends, forwards, and copies messages through one bot connection.
#[derive(Clone)]
pub struct TelegramDispatcher {
    bot: Bot,
}

impl TelegramDispatcher {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Dispatcher for TelegramDispatcher {
    async fn forward(
        &self,
        to: ChatRef,
        source: MessageRef,
        thread: Option<ThreadKey>,
    ) -> Result<MessageKey, DeliveryError> {
        let mut req = self.bot.forward_message(
            ChatId(to.0),
            ChatId(source.chat.0),
            MessageId(source.id.0),
        );
        if let Some(thread) = thread {
            req = req.message_thread_id(ThreadId(MessageId(thread.0)));
        }
        let forwarded = req
            .await
            .map_err(|e| DeliveryError::new("forward message", e))?;
        Ok(MessageKey(forwarded.id.0))
    }

    async fn copy(&self, to: UserId, source: MessageRef) -> Result<MessageKey, DeliveryError> {
        let copied = self
            .bot
            .copy_message(ChatId(to.0), ChatId(source.chat.0), MessageId(source.id.0))
            .await
            .map_err(|e| DeliveryError::new("copy message", e))?;
        Ok(MessageKey(copied.0))
    }

    async fn send(&self, to: ChatRef, text: &str) -> Result<MessageKey, DeliveryError> {
        let sent = self
            .bot
            .send_message(ChatId(to.0), text)
            .await
            .map_err(|e| DeliveryError::new("send message", e))?;
        Ok(MessageKey(sent.id.0))
    }
}
