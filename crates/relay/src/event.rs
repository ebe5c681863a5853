//! Inbound-event classification.
//!
//! A raw platform message is resolved into a tagged [`InboundEvent`] exactly
//! once, by an ordered match. This keeps the command / topic-label / free-text
//! fall-through explicit: a literal text that happens to equal a topic label
//! is a selection, everything below the label arm is relay material.

use relaygram_common::{ChatRef, MessageKey, MessageRef, UserId};

use crate::{router::RelayConfig, topic::Topic};

/// Platform-neutral view of one inbound message, built by the front-end.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub chat: ChatRef,
    pub id: MessageKey,
    /// Sender, when the platform exposes one (channel posts may not).
    pub sender: Option<UserId>,
    /// Best-effort display name of the sender.
    pub sender_name: Option<String>,
    pub text: Option<String>,
    /// Identity of the message this one replies to, if any.
    pub reply_to: Option<MessageKey>,
    /// True for a one-on-one chat with the bot.
    pub is_private: bool,
}

impl RawMessage {
    fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.chat, self.id)
    }
}

/// One inbound event, resolved once per message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `/start` from a private chat.
    Register {
        user: UserId,
        name: Option<String>,
    },
    /// `/broadcast` from the administrator. `template` is the replied-to
    /// message to fan out; its absence is the router's `MissingReplyTarget`.
    BroadcastRequest { template: Option<MessageRef> },
    /// A private message exactly matching a topic label.
    TopicSelected { user: UserId, topic: Topic },
    /// Any other private message, treated as relay material.
    UserText { user: UserId, message: MessageRef },
    /// A reply posted in the destination group.
    DestinationReply {
        replied_to: MessageKey,
        reply: MessageRef,
    },
    /// A private reply from the administrator.
    AdminPrivateReply {
        replied_to: MessageKey,
        reply: MessageRef,
    },
    /// Outside the relay's concern (group chatter that replies to nothing,
    /// unknown chats, senderless posts).
    Ignored,
}

/// Resolve a raw message into its event, in precedence order.
#[must_use]
pub fn classify(raw: &RawMessage, config: &RelayConfig) -> InboundEvent {
    // Destination-group surface: only replies matter there.
    if raw.chat == config.group {
        return match raw.reply_to {
            Some(replied_to) => InboundEvent::DestinationReply {
                replied_to,
                reply: raw.message_ref(),
            },
            None => InboundEvent::Ignored,
        };
    }

    if !raw.is_private {
        return InboundEvent::Ignored;
    }

    let Some(user) = raw.sender else {
        return InboundEvent::Ignored;
    };

    let text = raw.text.as_deref().unwrap_or("");

    if is_command(text, "start") {
        return InboundEvent::Register {
            user,
            name: raw.sender_name.clone(),
        };
    }

    // Only the administrator owns `/broadcast`; from anyone else it is
    // ordinary text and falls through to the relay path.
    if user == config.admin && is_command(text, "broadcast") {
        return InboundEvent::BroadcastRequest {
            template: raw
                .reply_to
                .map(|id| MessageRef::new(raw.chat, id)),
        };
    }

    if user == config.admin
        && let Some(replied_to) = raw.reply_to
    {
        return InboundEvent::AdminPrivateReply {
            replied_to,
            reply: raw.message_ref(),
        };
    }

    if let Some(topic) = Topic::from_label(text) {
        return InboundEvent::TopicSelected { user, topic };
    }

    InboundEvent::UserText {
        user,
        message: raw.message_ref(),
    }
}

/// True when `text` is the bot command `name`, with or without a `@botname`
/// suffix or trailing arguments.
fn is_command(text: &str, name: &str) -> bool {
    let Some(rest) = text.strip_prefix('/') else {
        return false;
    };
    let token = rest.split_whitespace().next().unwrap_or("");
    let bare = token.split('@').next().unwrap_or("");
    bare == name
}
