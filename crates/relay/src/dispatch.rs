//! The message-transport contract.

use async_trait::async_trait;

use relaygram_common::{ChatRef, MessageKey, MessageRef, ThreadKey, UserId};

/// Opaque delivery failure from the platform (network error, blocked user,
/// rate limit, timeout; the core treats them all the same).
#[derive(Debug, thiserror::Error)]
#[error("delivery failed: {context}: {source}")]
pub struct DeliveryError {
    context: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl DeliveryError {
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Sends, forwards, and copies messages on the chat platform.
///
/// The router never constructs platform payloads; it only asks for these
/// three capabilities and records or resolves the returned identities.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Forward `source` into `to`, optionally into a forum thread. Returns
    /// the forwarded message's identity in the destination chat.
    async fn forward(
        &self,
        to: ChatRef,
        source: MessageRef,
        thread: Option<ThreadKey>,
    ) -> Result<MessageKey, DeliveryError>;

    /// Copy `source` to a user's private chat (no "forwarded from" header).
    async fn copy(&self, to: UserId, source: MessageRef) -> Result<MessageKey, DeliveryError>;

    /// Send plain text into a chat.
    async fn send(&self, to: ChatRef, text: &str) -> Result<MessageKey, DeliveryError>;
}
