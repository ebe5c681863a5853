//! Inbound update handling: teloxide `Message` → routing event → response.

use std::sync::Arc;

use {
    teloxide::{
        payloads::SendMessageSetters,
        prelude::*,
        types::{ChatKind, KeyboardButton, KeyboardMarkup},
    },
    tracing::{debug, error, warn},
};

use {
    relaygram_common::{ChatRef, MessageKey, UserId},
    relaygram_relay::{Error, RawMessage, Response, Router, Topic, event},
};

/// Handle a single inbound Telegram message (called from the polling loop).
pub async fn handle_message(msg: Message, bot: &Bot, router: &Arc<Router>) -> anyhow::Result<()> {
    let raw = to_raw_message(&msg);
    let event = event::classify(&raw, router.config());
    debug!(chat_id = msg.chat.id.0, ?event, "classified inbound message");

    let response = match router.handle(event).await {
        Ok(response) => response,
        Err(Error::ForwardFailed { source }) => {
            // Not retried; tell the sender their message went nowhere.
            error!(chat_id = msg.chat.id.0, error = %source, "delivery failed");
            Response::Text("Sorry, your message could not be delivered. Please try again.".into())
        },
        Err(e) => {
            error!(chat_id = msg.chat.id.0, error = %e, "routing failed");
            return Ok(());
        },
    };

    match response {
        Response::Menu { text, options } => {
            let req = bot
                .send_message(msg.chat.id, text)
                .reply_markup(topic_keyboard(&options));
            if let Err(e) = req.await {
                warn!(chat_id = msg.chat.id.0, "failed to send menu: {e}");
            }
        },
        Response::Text(text) => {
            if let Err(e) = bot.send_message(msg.chat.id, text).await {
                warn!(chat_id = msg.chat.id.0, "failed to send reply: {e}");
            }
        },
        Response::Silent => {},
    }

    Ok(())
}

/// Persistent one-row reply keyboard with the valid topic labels.
fn topic_keyboard(options: &[Topic]) -> KeyboardMarkup {
    let row: Vec<KeyboardButton> = options
        .iter()
        .map(|topic| KeyboardButton::new(topic.label()))
        .collect();
    let mut keyboard = KeyboardMarkup::new(vec![row]);
    keyboard.resize_keyboard = true;
    keyboard
}

/// Platform-neutral view of one teloxide message for classification.
fn to_raw_message(msg: &Message) -> RawMessage {
    let sender = msg.from.as_ref().map(|u| UserId(u.id.0 as i64));
    let sender_name = msg.from.as_ref().and_then(|u| {
        let first = &u.first_name;
        let last = u.last_name.as_deref().unwrap_or("");
        let name = format!("{first} {last}").trim().to_string();
        if name.is_empty() { u.username.clone() } else { Some(name) }
    });

    RawMessage {
        chat: ChatRef(msg.chat.id.0),
        id: MessageKey(msg.id.0),
        sender,
        sender_name,
        text: msg.text().map(str::to_owned),
        reply_to: msg.reply_to_message().map(|m| MessageKey(m.id.0)),
        is_private: matches!(msg.chat.kind, ChatKind::Private(_)),
    }
}
