//! Config schema types.

use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use relaygram_common::{ChatRef, ThreadKey, UserId};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaygramConfig {
    pub telegram: TelegramConfig,
    pub relay: RelaySection,
    pub storage: StorageConfig,
}

impl RelaygramConfig {
    /// Reject configs that cannot possibly run: the bot needs credentials,
    /// an administrator, and a destination group.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telegram.token.expose_secret().is_empty() {
            anyhow::bail!("telegram.token is not set (hint: token = \"${{TELEGRAM_BOT_TOKEN}}\")");
        }
        if self.relay.admin_id == 0 {
            anyhow::bail!("relay.admin_id is not set");
        }
        if self.relay.group_chat_id == 0 {
            anyhow::bail!("relay.group_chat_id is not set");
        }
        Ok(())
    }
}

/// Telegram credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Routing configuration: who the administrator is, where forwards land,
/// and the optional per-topic forum threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySection {
    pub admin_id: i64,
    pub group_chat_id: i64,
    pub threads: ThreadsConfig,
}

impl RelaySection {
    #[must_use]
    pub fn admin(&self) -> UserId {
        UserId(self.admin_id)
    }

    #[must_use]
    pub fn group(&self) -> ChatRef {
        ChatRef(self.group_chat_id)
    }
}

/// Per-topic forum-thread ids inside the destination group. A topic without
/// a thread forwards into the bare group.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadsConfig {
    pub admin_support: Option<i32>,
    pub sponsorship: Option<i32>,
    pub report_scam: Option<i32>,
}

impl ThreadsConfig {
    #[must_use]
    pub fn admin_support(&self) -> Option<ThreadKey> {
        self.admin_support.map(ThreadKey)
    }

    #[must_use]
    pub fn sponsorship(&self) -> Option<ThreadKey> {
        self.sponsorship.map(ThreadKey)
    }

    #[must_use]
    pub fn report_scam(&self) -> Option<ThreadKey> {
        self.report_scam.map(ThreadKey)
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("relaygram.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = RelaygramConfig::default();
        assert!(cfg.telegram.token.expose_secret().is_empty());
        assert_eq!(cfg.relay.admin_id, 0);
        assert_eq!(cfg.storage.database_path, PathBuf::from("relaygram.db"));
        assert!(cfg.relay.threads.report_scam().is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let cfg: RelaygramConfig = toml::from_str(
            r#"
            [telegram]
            token = "123:ABC"

            [relay]
            admin_id = 1
            group_chat_id = -100

            [relay.threads]
            report_scam = 42
            "#,
        )
        .unwrap();
        assert_eq!(cfg.telegram.token.expose_secret(), "123:ABC");
        assert_eq!(cfg.relay.admin(), UserId(1));
        assert_eq!(cfg.relay.group(), ChatRef(-100));
        assert_eq!(cfg.relay.threads.report_scam(), Some(ThreadKey(42)));
        assert_eq!(cfg.relay.threads.sponsorship(), None);
        // default section untouched
        assert_eq!(cfg.storage.database_path, PathBuf::from("relaygram.db"));
    }

    #[test]
    fn validate_rejects_incomplete_config() {
        let mut cfg = RelaygramConfig::default();
        assert!(cfg.validate().is_err());

        cfg.telegram.token = Secret::new("123:ABC".into());
        assert!(cfg.validate().is_err());

        cfg.relay.admin_id = 1;
        cfg.relay.group_chat_id = -100;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = TelegramConfig {
            token: Secret::new("123:ABC".into()),
        };
        let debug = format!("{cfg:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("123:ABC"));
    }
}
