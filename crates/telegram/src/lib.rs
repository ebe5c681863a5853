//! Telegram front-end for the relay core.
//!
//! Uses the teloxide library to receive updates via manual long polling,
//! translate them into routing events, and perform the dispatcher's
//! forward/copy/send capabilities against the Bot API.

pub mod bot;
pub mod handlers;
pub mod outbound;

pub use {
    bot::{connect, start_polling},
    outbound::TelegramDispatcher,
};
