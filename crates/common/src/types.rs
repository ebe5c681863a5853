//! Platform-assigned identity newtypes.
//!
//! Telegram hands out `i64` user/chat ids and `i32` message ids; these
//! wrappers keep the routing core from mixing them up. They serialize as
//! bare numbers so they can sit directly in config files and SQLite columns.

use serde::{Deserialize, Serialize};

/// Stable, platform-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// A chat (private conversation, group, or channel) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatRef(pub i64);

/// A message identifier, unique within its chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageKey(pub i32);

/// A forum-topic (thread) identifier within a group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadKey(pub i32);

/// Fully-qualified message reference: which message in which chat.
///
/// This is what the dispatcher needs to forward or copy a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat: ChatRef,
    pub id: MessageKey,
}

impl MessageRef {
    #[must_use]
    pub fn new(chat: ChatRef, id: MessageKey) -> Self {
        Self { chat, id }
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ChatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_transparent() {
        let user = UserId(42);
        assert_eq!(serde_json::to_string(&user).unwrap(), "42");
        let back: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn message_ref_fields() {
        let r = MessageRef::new(ChatRef(-100123), MessageKey(7));
        assert_eq!(r.chat, ChatRef(-100123));
        assert_eq!(r.id, MessageKey(7));
    }
}
