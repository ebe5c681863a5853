//! Configuration loading, validation, and env substitution.
//!
//! Config files: `relaygram.toml`, `relaygram.yaml`, or `relaygram.json`,
//! searched in `./` then `~/.config/relaygram/`.
//!
//! Supports `${ENV_VAR}` substitution in the raw file text, so the bot token
//! can stay out of the file itself.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{RelaySection, RelaygramConfig, StorageConfig, TelegramConfig, ThreadsConfig},
};
